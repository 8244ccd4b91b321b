//! Line-oriented prompting over async stdin.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Reads user answers one line at a time.
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print a message and read one trimmed line.
    ///
    /// # Errors
    /// Fails if stdin closes or cannot be read.
    pub async fn ask(&mut self, message: &str) -> anyhow::Result<String> {
        println!("{message}");
        let line = self
            .lines
            .next_line()
            .await
            .context("reading from stdin")?
            .context("stdin closed")?;
        Ok(line.trim().to_string())
    }

    /// Prompt until the answer parses as a signed amount.
    ///
    /// # Errors
    /// Fails if stdin closes or cannot be read.
    pub async fn ask_i64(&mut self, message: &str) -> anyhow::Result<i64> {
        loop {
            let answer = self.ask(message).await?;
            match answer.parse() {
                Ok(value) => return Ok(value),
                Err(_) => println!("Please enter a whole number."),
            }
        }
    }

    /// Prompt until the answer parses as a decimal dollar amount.
    ///
    /// # Errors
    /// Fails if stdin closes or cannot be read.
    pub async fn ask_dollars(&mut self, message: &str) -> anyhow::Result<f64> {
        loop {
            let answer = self.ask(message).await?;
            match answer.parse() {
                Ok(value) => return Ok(value),
                Err(_) => println!("Please enter an amount like 1.50."),
            }
        }
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self::new()
    }
}
