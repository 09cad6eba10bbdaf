use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use guestlink_core::common::GuestError;
use guestlink_core::session::{Guest, GuestFactory, StepResult};
use mockall::mock;

mock! {
    pub Interp {}
    impl Guest for Interp {
        fn start(&mut self) -> Result<bool, GuestError>;
        fn step(&mut self, synchronized: bool) -> Result<StepResult, GuestError>;
        fn on_signal(&mut self, payload: &[u8]) -> Result<(), GuestError>;
        fn close(&mut self);
    }
}

/// A guest that starts successfully and tolerates being closed.
pub fn started_guest() -> MockInterp {
    let mut guest = MockInterp::new();
    guest.expect_start().returning(|| Ok(true));
    guest.expect_close().return_const(());
    guest
}

/// A started guest whose every step returns `result`.
pub fn stepping_guest(result: StepResult) -> MockInterp {
    let mut guest = started_guest();
    guest.expect_step().returning(move |_| Ok(result.clone()));
    guest
}

/// Factory handing out the given guests in order, then failing.
pub fn factory_of(guests: Vec<MockInterp>) -> impl GuestFactory<Guest = MockInterp> {
    let mut queue = VecDeque::from(guests);
    move || -> Result<MockInterp, GuestError> {
        queue
            .pop_front()
            .ok_or_else(|| GuestError::Image("no more guests".to_owned()))
    }
}

/// Factory whose construction always fails, counting attempts.
pub fn failing_factory(attempts: Arc<Mutex<u32>>) -> impl GuestFactory<Guest = MockInterp> {
    move || -> Result<MockInterp, GuestError> {
        *attempts.lock().unwrap() += 1;
        Err(GuestError::Image("firmware.bin: bad header".to_owned()))
    }
}
