//! Cooperative cancellation and wall-clock deadline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared stop signal polled by engines at iteration boundaries.
///
/// Cloning shares the same flag.
#[derive(Debug, Clone)]
pub struct SearchControl {
    cancel: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl SearchControl {
    /// A control that stops only when cancelled.
    pub fn unbounded() -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// A control that stops after `budget` from now.
    pub fn with_budget(budget: Option<Duration>) -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
            deadline: budget.map(|b| Instant::now() + b),
        }
    }

    /// Uses an externally owned cancellation flag.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Whether the deadline has passed.
    pub fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Whether an engine should stop and return its best-so-far result.
    pub fn should_stop(&self) -> bool {
        self.is_cancelled() || self.deadline_passed()
    }
}

impl Default for SearchControl {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_runs() {
        let control = SearchControl::unbounded();
        assert!(!control.should_stop());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let control = SearchControl::unbounded();
        let other = control.clone();
        other.cancel();
        assert!(control.should_stop());
        assert!(control.is_cancelled());
    }

    #[test]
    fn test_zero_budget_stops_immediately() {
        let control = SearchControl::with_budget(Some(Duration::ZERO));
        assert!(control.deadline_passed());
        assert!(control.should_stop());
        assert!(!control.is_cancelled());
    }

    #[test]
    fn test_external_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let control = SearchControl::unbounded().with_cancel_flag(Arc::clone(&flag));
        flag.store(true, Ordering::Relaxed);
        assert!(control.should_stop());
    }
}
