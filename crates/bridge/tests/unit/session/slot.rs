//! # Result Slot Tests

use guestlink_core::StepResult;
use guestlink_core::session::ResultSlot;

#[test]
fn test_new_slot_is_empty() {
    let mut slot = ResultSlot::<StepResult>::new();
    assert!(slot.is_empty());
    assert_eq!(slot.take(), None);
}

#[test]
fn test_take_once() {
    let mut slot = ResultSlot::default();
    assert_eq!(slot.put(StepResult::Sleep { ticks: 5 }), None);
    assert_eq!(slot.peek(), Some(&StepResult::Sleep { ticks: 5 }));
    assert_eq!(slot.take(), Some(StepResult::Sleep { ticks: 5 }));
    assert_eq!(slot.take(), None);
    assert!(slot.is_empty());
}

#[test]
fn test_put_returns_undrained_value() {
    let mut slot = ResultSlot::new();
    slot.put(StepResult::Continue);
    assert_eq!(
        slot.put(StepResult::SynchronizedCall),
        Some(StepResult::Continue)
    );
    assert_eq!(slot.take(), Some(StepResult::SynchronizedCall));
}
