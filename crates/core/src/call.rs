use crate::error::{GSheetError, Result};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation applied to one remote operation.
///
/// The deadline covers the whole operation, including any token refresh it
/// triggers. Dropping the in-flight request on cancellation aborts the
/// underlying HTTP exchange.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub deadline: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    /// Options with no deadline and no cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the operation to `deadline`.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Abort the operation when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Fill in `deadline` when none was given.
    #[must_use]
    pub fn or_deadline(mut self, deadline: Option<Duration>) -> Self {
        if self.deadline.is_none() {
            self.deadline = deadline;
        }
        self
    }

    /// Drive `fut` to completion under these options.
    ///
    /// # Errors
    ///
    /// Returns `GSheetError::Cancelled` or `GSheetError::Deadline` when the
    /// operation is cut short, otherwise whatever `fut` returns.
    pub async fn run<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let bounded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout(deadline, fut)
                    .await
                    .map_err(|_| GSheetError::Deadline {
                        operation,
                        deadline,
                    })?,
                None => fut.await,
            }
        };

        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => Err(GSheetError::Cancelled { operation }),
                    result = bounded => result,
                }
            }
            None => bounded.await,
        }
    }
}
