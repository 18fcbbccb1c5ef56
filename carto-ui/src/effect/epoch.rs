use std::cell::Cell;
use std::rc::Rc;

/// Monotonic generation counter shared with in-flight continuations
#[derive(Debug, Clone, Default)]
pub struct EpochCounter(Rc<Cell<u64>>);

impl EpochCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate every token handed out so far
    pub fn advance(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn token(&self) -> EpochToken {
        EpochToken {
            counter: Rc::clone(&self.0),
            epoch: self.0.get(),
        }
    }
}

/// Snapshot of an [`EpochCounter`] taken when async work starts
#[derive(Debug, Clone)]
pub struct EpochToken {
    counter: Rc<Cell<u64>>,
    epoch: u64,
}

impl EpochToken {
    pub fn is_current(&self) -> bool {
        self.counter.get() == self.epoch
    }
}
