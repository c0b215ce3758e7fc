use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Cooperative cancellation for long-running fits.
///
/// Backends check the flag between epochs (or generations). Clones share the
/// same flag, so a controller thread can cancel a fit running elsewhere.
#[derive(Debug, Clone, Default)]
pub struct TrainingControl {
    cancelled: Arc<AtomicBool>,
}

impl TrainingControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let control = TrainingControl::new();
        let remote = control.clone();
        assert!(!control.is_cancelled());
        remote.cancel();
        assert!(control.is_cancelled());
    }
}
