use futures_util::future::{select, Either};
use std::future::Future;
use std::pin::pin;

/// The deadline fired before the operation completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed;

/// Race `operation` against `deadline`.
///
/// Whichever future loses is dropped before this returns, so a timer-backed
/// deadline is always cleared, on success and on timeout alike. Ties go to the
/// operation.
pub async fn run_bounded<F, D>(operation: F, deadline: D) -> Result<F::Output, Elapsed>
where
    F: Future,
    D: Future<Output = ()>,
{
    let operation = pin!(operation);
    let deadline = pin!(deadline);

    match select(operation, deadline).await {
        Either::Left((output, _deadline)) => Ok(output),
        Either::Right(((), _operation)) => Err(Elapsed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::pin::Pin;
    use std::rc::Rc;
    use std::task::{Context, Poll};
    use std::time::Duration;
    use tokio::time::{sleep, Sleep};

    /// Deadline that records whether it fired and whether it was dropped.
    struct TrackedDeadline {
        sleep: Pin<Box<Sleep>>,
        fired: Rc<Cell<bool>>,
        dropped: Rc<Cell<bool>>,
    }

    impl TrackedDeadline {
        fn new(after: Duration) -> (Self, Rc<Cell<bool>>, Rc<Cell<bool>>) {
            let fired = Rc::new(Cell::new(false));
            let dropped = Rc::new(Cell::new(false));
            let deadline = Self {
                sleep: Box::pin(sleep(after)),
                fired: fired.clone(),
                dropped: dropped.clone(),
            };
            (deadline, fired, dropped)
        }
    }

    impl Future for TrackedDeadline {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            match self.sleep.as_mut().poll(cx) {
                Poll::Ready(()) => {
                    self.fired.set(true);
                    Poll::Ready(())
                }
                Poll::Pending => Poll::Pending,
            }
        }
    }

    impl Drop for TrackedDeadline {
        fn drop(&mut self) {
            self.dropped.set(true);
        }
    }

    #[tokio::test]
    async fn test_operation_wins() {
        let (deadline, fired, dropped) = TrackedDeadline::new(Duration::from_secs(5));
        let result = run_bounded(async { 42 }, deadline).await;

        assert_eq!(result, Ok(42));
        assert!(dropped.get(), "deadline must be cleared on success");
        assert!(!fired.get());
    }

    #[tokio::test]
    async fn test_deadline_wins() {
        let (deadline, fired, dropped) = TrackedDeadline::new(Duration::from_millis(20));
        let result = run_bounded(std::future::pending::<()>(), deadline).await;

        assert_eq!(result, Err(Elapsed));
        assert!(fired.get());
        assert!(dropped.get());
    }

    #[tokio::test]
    async fn test_deadline_never_fires_after_return() {
        let (deadline, fired, _dropped) = TrackedDeadline::new(Duration::from_millis(30));
        let result = run_bounded(
            async {
                sleep(Duration::from_millis(5)).await;
                "done"
            },
            deadline,
        )
        .await;
        assert_eq!(result, Ok("done"));

        sleep(Duration::from_millis(60)).await;
        assert!(!fired.get());
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<Result<(), &str>, Elapsed> =
            run_bounded(async { Err("refused") }, sleep(Duration::from_secs(5))).await;
        assert_eq!(result, Ok(Err("refused")));
    }
}
