use std::cell::Cell;
use std::rc::Rc;

/// The single in-flight request slot. Everything runs on one event loop,
/// so a shared cell is all the coordination needed.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Rc<Cell<bool>>);

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.0.get()
    }

    /// Claims the slot, or returns `None` if a request is already outstanding.
    pub fn try_acquire(&self) -> Option<InFlightGuard> {
        if self.0.replace(true) {
            return None;
        }
        Some(InFlightGuard(self.0.clone()))
    }
}

/// Holds the slot until dropped, whichever way the request ends.
#[derive(Debug)]
#[must_use = "the slot is released as soon as the guard is dropped"]
pub struct InFlightGuard(Rc<Cell<bool>>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
