use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation latch for one run.
///
/// Clones share the same latch. Once cancelled it stays cancelled; a new run
/// gets a new flag instead of clearing an old one, so a stale run can never
/// observe a re-armed flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch the flag. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Whether both handles refer to the same latch.
    pub fn same_run(&self, other: &CancellationFlag) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let flag = CancellationFlag::new();
        let clone = flag.clone();
        assert!(!clone.is_cancelled());
        flag.cancel();
        flag.cancel();
        assert!(clone.is_cancelled());
        assert!(flag.same_run(&clone));
    }

    #[test]
    fn fresh_flags_are_independent() {
        let old = CancellationFlag::new();
        old.cancel();
        let fresh = CancellationFlag::new();
        assert!(!fresh.is_cancelled());
        assert!(!fresh.same_run(&old));
    }
}
