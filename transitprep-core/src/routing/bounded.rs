use std::future::Future;
use std::time::Duration;

use log::warn;

use crate::Error;

/// Run `work` as a spawned task and wait for it at most `deadline`.
///
/// On deadline the task is detached, not cancelled: it keeps running, holds
/// its connection until the remote side answers, and its result is dropped.
///
/// # Errors
///
/// [`Error::Timeout`] when the deadline fires first, [`Error::Task`] when the
/// task panicked, otherwise whatever `work` returned.
pub async fn bounded<T, F>(operation: &'static str, deadline: Duration, work: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(work);
    match tokio::time::timeout(deadline, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(Error::Task(join_error.to_string())),
        Err(_) => {
            warn!("{operation} exceeded {deadline:?}, abandoning it");
            Err(Error::Timeout {
                operation,
                deadline,
            })
        }
    }
}
