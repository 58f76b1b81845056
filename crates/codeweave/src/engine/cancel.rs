use std::future;

use tokio::sync::watch;

use crate::error::CodeweaveError;

/// Owner side of a cancellation flag.
#[derive(Debug)]
pub struct CancellationSource {
    sender: watch::Sender<bool>,
}

impl CancellationSource {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    /// Returns a token observing this source.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            receiver: self.sender.subscribe(),
        }
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a cancellation flag, checked between steps of
/// long-running operations.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    receiver: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Returns a token that is never cancelled.
    pub fn none() -> Self {
        let (_, receiver) = watch::channel(false);
        Self { receiver }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// # Errors
    ///
    /// Returns [`CodeweaveError::Cancelled`] once cancellation was requested.
    pub fn check(&self) -> Result<(), CodeweaveError> {
        if self.is_cancelled() {
            return Err(CodeweaveError::Cancelled);
        }
        Ok(())
    }

    /// Completes once cancellation is requested; never completes if the
    /// source is dropped first.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            future::pending::<()>().await;
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_token_observes_source() {
        let source = CancellationSource::new();
        let token = source.token();
        assert!(token.check().is_ok());

        source.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(CodeweaveError::Cancelled)));
        assert!(CancellationToken::none().check().is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiters() {
        let source = CancellationSource::new();
        let token = source.token();
        let waiter = tokio::spawn(async move { token.cancelled().await });

        source.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }
}
