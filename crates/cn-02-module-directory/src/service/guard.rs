//! Single-slot run guard: at most one reconciliation at a time.

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Idle,
    Running,
}

/// `{Idle, Running}` slot. The check and the transition happen under one lock.
#[derive(Debug)]
pub(crate) struct SyncSlot {
    state: Mutex<SlotState>,
}

impl SyncSlot {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Idle),
        }
    }

    /// Claim the slot. `None` if a run is already in progress.
    pub(crate) fn try_start(&self) -> Option<RunningGuard<'_>> {
        let mut state = self.state.lock();
        match *state {
            SlotState::Running => None,
            SlotState::Idle => {
                *state = SlotState::Running;
                Some(RunningGuard { slot: self })
            }
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        *self.state.lock() == SlotState::Running
    }
}

/// Returns the slot to idle on drop, including when the owning future is
/// cancelled.
pub(crate) struct RunningGuard<'a> {
    slot: &'a SyncSlot,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        *self.slot.state.lock() = SlotState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_is_exclusive_until_guard_drops() {
        let slot = SyncSlot::new();
        let guard = slot.try_start();
        assert!(guard.is_some());
        assert!(slot.is_running());
        assert!(slot.try_start().is_none());

        drop(guard);
        assert!(!slot.is_running());
        assert!(slot.try_start().is_some());
    }
}
