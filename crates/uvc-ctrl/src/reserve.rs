//! Fallible reservation used by discovery.
//!
//! Every buffer built while walking a device's units goes through a
//! [`Reserve`] so that an allocation failure aborts setup instead of the
//! process.

use std::collections::TryReserveError;

pub(crate) trait Reserve {
    fn reserve<T>(&mut self, vec: &mut Vec<T>, additional: usize) -> Result<(), TryReserveError>;
}

/// Reserve from the global allocator.
pub(crate) struct Heap;

impl Reserve for Heap {
    fn reserve<T>(&mut self, vec: &mut Vec<T>, additional: usize) -> Result<(), TryReserveError> {
        vec.try_reserve_exact(additional)
    }
}

/// Succeed for a fixed number of reservations, then fail every one after.
#[cfg(test)]
pub(crate) struct FailAfter(pub usize);

#[cfg(test)]
impl Reserve for FailAfter {
    fn reserve<T>(&mut self, vec: &mut Vec<T>, additional: usize) -> Result<(), TryReserveError> {
        match self.0.checked_sub(1) {
            Some(left) => {
                self.0 = left;
                vec.try_reserve_exact(additional)
            }
            // Capacity overflow is the only failure that can be produced on demand.
            None => Vec::<u8>::new().try_reserve(usize::MAX),
        }
    }
}
