use crate::payment::{CardDetails, PaymentProcessor, PaymentToken};
use std::sync::{Arc, Mutex, MutexGuard};
use vendo_core::{Error, Money, Result};

#[derive(Debug, Default)]
struct PaymentState {
    tokens: Vec<PaymentToken>,
    charges: Vec<(PaymentToken, Money)>,
    fail_next_token: Option<Error>,
    fail_next_charge: Option<Error>,
}

/// In-memory payment processor issuing random tokens and recording charges.
#[derive(Debug, Clone, Default)]
pub struct MockPayment {
    state: Arc<Mutex<PaymentState>>,
}

impl MockPayment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PaymentState> {
        self.state.lock().expect("mock payment state poisoned")
    }

    /// Every charge made so far, in order.
    #[must_use]
    pub fn charges(&self) -> Vec<(PaymentToken, Money)> {
        self.lock().charges.clone()
    }

    /// Number of tokens issued so far.
    #[must_use]
    pub fn tokens_issued(&self) -> usize {
        self.lock().tokens.len()
    }

    /// Make the next token creation fail with `error`.
    pub fn fail_next_token(&self, error: Error) {
        self.lock().fail_next_token = Some(error);
    }

    /// Make the next charge fail with `error`.
    pub fn fail_next_charge(&self, error: Error) {
        self.lock().fail_next_charge = Some(error);
    }
}

impl PaymentProcessor for MockPayment {
    async fn create_token(&self, _card: &CardDetails) -> Result<PaymentToken> {
        let mut state = self.lock();
        if let Some(error) = state.fail_next_token.take() {
            return Err(error);
        }
        let token = PaymentToken::new(format!("tok_{}", uuid::Uuid::new_v4().simple()));
        state.tokens.push(token.clone());
        Ok(token)
    }

    async fn charge(&self, token: &PaymentToken, amount: Money) -> Result<()> {
        let mut state = self.lock();
        if let Some(error) = state.fail_next_charge.take() {
            return Err(error);
        }
        state.charges.push((token.clone(), amount));
        Ok(())
    }
}
