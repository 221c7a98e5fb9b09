use std::fmt;

/// Identifier of a worker slot, handed out by `Dispatcher::register_worker`
/// in registration order starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<SlotId> for usize {
    fn from(id: SlotId) -> Self {
        id.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error a work unit may return from `execute`.
pub type UnitError = Box<dyn std::error::Error + Send + Sync>;

pub type UnitResult = Result<(), UnitError>;

/// One unit of work bound to a worker slot, run exactly once per cycle on
/// that slot's thread.
///
/// The dispatcher never synchronizes state a unit reaches outside itself;
/// units sharing mutable state must bring their own locks or atomics.
/// Returning `Err` or panicking marks the slot failed for the cycle without
/// stalling the barrier.
pub trait WorkUnit: Send {
    fn execute(&mut self, slot: SlotId) -> UnitResult;
}

impl<F> WorkUnit for F
where
    F: FnMut(SlotId) -> UnitResult + Send,
{
    fn execute(&mut self, slot: SlotId) -> UnitResult {
        self(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_work_units() {
        let mut calls = Vec::new();
        {
            let mut unit = |slot: SlotId| -> UnitResult {
                calls.push(slot.index());
                Ok(())
            };
            unit.execute(SlotId(2)).unwrap();
            unit.execute(SlotId(2)).unwrap();
        }
        assert_eq!(calls, vec![2, 2]);
    }

    #[test]
    fn slot_id_displays_its_index() {
        assert_eq!(SlotId(7).to_string(), "7");
        assert_eq!(usize::from(SlotId(7)), 7);
    }
}
