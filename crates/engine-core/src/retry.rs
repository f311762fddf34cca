use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Shutdown was requested while waiting between attempts.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("retry cancelled")]
pub struct Cancelled;

/// Retries an operation forever with a fixed pause between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    delay: Duration,
}

impl RetryPolicy {
    pub fn fixed(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Executes the operation until it succeeds or `cancel` fires.
    ///
    /// `on_error` sees each error together with the zero-based attempt that
    /// produced it, before the pause.
    pub async fn run<F, Fut, T, E, OnError>(
        &self,
        mut op: F,
        mut on_error: OnError,
        cancel: &CancellationToken,
    ) -> Result<T, Cancelled>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        OnError: FnMut(&E, usize),
    {
        let mut attempt = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(Cancelled);
            }

            match op().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    on_error(&err, attempt);
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(Cancelled),
                        _ = sleep(self.delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }
}
