//! Cooperative cancellation for a fixed-size pool of workers.
//!
//! Mirrors a `WaitGroup` paired with a cancel-on-first-error signal: any
//! worker can call [`ErrorContext::cancel`] to stop the rest early, and
//! [`ErrorContext::wait`] blocks until every worker has checked in, returning
//! whichever error (if any) was recorded first.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

struct Inner<E> {
    remaining: usize,
    err: Option<Arc<E>>,
}

pub struct ErrorContext<E> {
    inner: Mutex<Inner<E>>,
    condvar: Condvar,
}

impl<E> ErrorContext<E> {
    /// Create a context for `workers` participants, none of which have
    /// reported in yet.
    pub fn new(workers: usize) -> Self {
        ErrorContext {
            inner: Mutex::new(Inner {
                remaining: workers,
                err: None,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Record `err` as the cancellation cause if none has been recorded yet.
    /// Returns `true` if this call is the one that set it.
    pub fn cancel(&self, err: E) -> bool {
        let mut inner = self.inner.lock();
        if inner.err.is_some() {
            return false;
        }
        inner.err = Some(Arc::new(err));
        true
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.lock().err.is_some()
    }

    /// The first recorded error, if any.
    pub fn err(&self) -> Option<Arc<E>> {
        self.inner.lock().err.clone()
    }

    /// Signal that one worker has finished (successfully or not).
    pub fn worker_done(&self) {
        let mut inner = self.inner.lock();
        debug_assert!(inner.remaining > 0, "worker_done called more times than there are workers");
        inner.remaining = inner.remaining.saturating_sub(1);
        if inner.remaining == 0 {
            self.condvar.notify_all();
        }
    }

    /// Block until every worker has called `worker_done`, then return
    /// whichever error was recorded first, if any.
    pub fn wait(&self) -> Option<Arc<E>> {
        let mut inner = self.inner.lock();
        while inner.remaining > 0 {
            self.condvar.wait(&mut inner);
        }
        inner.err.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn wait_returns_none_when_all_workers_succeed() {
        let ctx = Arc::new(ErrorContext::<String>::new(4));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ctx = Arc::clone(&ctx);
                thread::spawn(move || ctx.worker_done())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert!(ctx.wait().is_none());
    }

    #[test]
    fn first_error_wins_and_is_idempotent() {
        let ctx = ErrorContext::new(2);
        assert!(ctx.cancel("first".to_string()));
        assert!(!ctx.cancel("second".to_string()));
        assert_eq!(ctx.err().map(|e| (*e).clone()), Some("first".to_string()));
    }

    #[test]
    fn cancellation_is_visible_before_wait_returns() {
        let ctx = Arc::new(ErrorContext::<&'static str>::new(1));
        assert!(!ctx.is_cancelled());
        ctx.cancel("boom");
        assert!(ctx.is_cancelled());
        ctx.worker_done();
        assert_eq!(ctx.wait().map(|e| *e), Some("boom"));
    }
}
