use super::layout::{CharRecord, LineRecord};

/// Records that can be handed out again after being returned to a [`RecordPool`].
pub trait Recycle: Default {
    /// Restores the freshly constructed state while keeping allocations.
    fn reset(&mut self);
}

/// Free list of reusable records.
///
/// `acquire` always returns a reset record; `release` never frees memory.
pub struct RecordPool<T: Recycle> {
    free: Vec<T>,
}

impl<T: Recycle> Default for RecordPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Recycle> RecordPool<T> {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self { free: Vec::new() }
    }

    /// Takes an idle record, or creates one if none is left.
    pub fn acquire(&mut self) -> T {
        match self.free.pop() {
            Some(mut record) => {
                record.reset();
                record
            }
            None => T::default(),
        }
    }

    /// Returns `record` for later reuse.
    pub fn release(&mut self, record: T) {
        self.free.push(record);
    }

    /// Moves every record of `records` back into the pool, leaving it empty.
    pub fn release_all(&mut self, records: &mut Vec<T>) {
        self.free.append(records);
    }

    /// Number of idle records.
    pub fn available(&self) -> usize {
        self.free.len()
    }
}

/// The two pools shared by every render object of a [`crate::TextSystem`].
#[derive(Default)]
pub struct RecordPools {
    pub chars: RecordPool<CharRecord>,
    pub lines: RecordPool<LineRecord>,
}

impl RecordPools {
    /// Creates empty pools.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        value: u32,
        history: Vec<u32>,
    }

    impl Recycle for Counter {
        fn reset(&mut self) {
            self.value = 0;
            self.history.clear();
        }
    }

    #[test]
    fn test_acquire_resets_recycled_records() {
        let mut pool = RecordPool::<Counter>::new();
        let mut record = pool.acquire();
        record.value = 5;
        record.history.extend([1, 2, 3]);
        let capacity = record.history.capacity();
        pool.release(record);

        let record = pool.acquire();
        assert_eq!(record.value, 0);
        assert!(record.history.is_empty());
        assert_eq!(record.history.capacity(), capacity);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_release_all_drains_vec() {
        let mut pool = RecordPool::<Counter>::new();
        let mut records: Vec<_> = (0..4).map(|_| pool.acquire()).collect();
        pool.release_all(&mut records);

        assert!(records.is_empty());
        assert_eq!(pool.available(), 4);
    }
}
