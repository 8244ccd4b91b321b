//! Shared plumbing for the vendo front-end binaries.

pub mod config;
pub mod prompt;

pub use config::MachineConfig;
pub use prompt::Prompt;

/// Run a remote call with the standard front-end reconnect policy.
///
/// With a backend URL, a connectivity failure waits for the health
/// endpoint and retries once (with user-visible feedback); without one
/// (in-memory demo mode) the result passes through untouched.
///
/// # Errors
/// Whatever the call (or its single retry) returns.
pub async fn call_with_reconnect<T, F>(url: Option<&str>, mut op: F) -> vendo_core::Result<T>
where
    F: AsyncFnMut() -> vendo_core::Result<T>,
{
    match url {
        Some(url) => {
            vendo_remote::retry_once_after_reconnect(url, async || {
                let result = op().await;
                if let Err(e) = &result
                    && e.is_connectivity()
                {
                    println!("Connection lost, reconnecting...");
                }
                result
            })
            .await
        }
        None => op().await,
    }
}

/// Initialize logging for a front-end process.
///
/// Respects `RUST_LOG`; defaults to `info` for the vendo crates so mode
/// changes and sync traffic are visible without drowning the prompts.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}
