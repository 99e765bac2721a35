//! Partitioning of entries into bounded transactions.

use crate::error::{SyncError, SyncResult};
use crate::flatten::FlatEntry;
use kvsync_protocol::{Operation, MAX_OPS_PER_TRANSACTION};

/// An ordered group of operations submitted as one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    operations: Vec<Operation>,
}

impl Batch {
    /// Returns the operations of the batch.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Consumes the batch and returns its operations.
    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    /// Returns the number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if the batch has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Splits entries into batches no larger than the transaction capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlanner {
    capacity: usize,
}

impl BatchPlanner {
    /// Creates a planner with the given capacity.
    ///
    /// The capacity must be between 1 and the store's transaction limit.
    pub fn new(capacity: usize) -> SyncResult<Self> {
        if capacity == 0 || capacity > MAX_OPS_PER_TRANSACTION {
            return Err(SyncError::InvalidConfig(format!(
                "batch capacity must be between 1 and {}, got {}",
                MAX_OPS_PER_TRANSACTION, capacity
            )));
        }
        Ok(Self { capacity })
    }

    /// Returns the batch capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Turns every entry into a `set` operation and partitions them.
    pub fn plan(&self, entries: &[FlatEntry]) -> Vec<Batch> {
        self.plan_operations(
            entries
                .iter()
                .map(|e| Operation::set(e.path.as_str(), e.value.as_bytes()))
                .collect(),
        )
    }

    /// Partitions operations greedily, preserving their order.
    ///
    /// No operations yields no batches.
    pub fn plan_operations(&self, operations: Vec<Operation>) -> Vec<Batch> {
        let mut batches = Vec::with_capacity(operations.len().div_ceil(self.capacity));
        let mut rest = operations.into_iter().peekable();

        while rest.peek().is_some() {
            batches.push(Batch {
                operations: rest.by_ref().take(self.capacity).collect(),
            });
        }

        batches
    }
}

impl Default for BatchPlanner {
    fn default() -> Self {
        Self {
            capacity: MAX_OPS_PER_TRANSACTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<FlatEntry> {
        (0..n)
            .map(|i| FlatEntry::new(format!("key/{:04}", i), i.to_string()))
            .collect()
    }

    #[test]
    fn default_capacity_is_store_limit() {
        assert_eq!(BatchPlanner::default().capacity(), 64);
    }

    #[test]
    fn splits_150_entries() {
        let batches = BatchPlanner::default().plan(&entries(150));
        let sizes: Vec<_> = batches.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![64, 64, 22]);
    }

    #[test]
    fn zero_entries_zero_batches() {
        assert!(BatchPlanner::default().plan(&[]).is_empty());
    }

    #[test]
    fn exact_multiple_has_no_trailing_batch() {
        let planner = BatchPlanner::new(10).unwrap();
        let sizes: Vec<_> = planner.plan(&entries(30)).iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![10, 10, 10]);
    }

    #[test]
    fn preserves_order_and_content() {
        let input = entries(7);
        let planner = BatchPlanner::new(3).unwrap();
        let batches = planner.plan(&input);

        let ops: Vec<Operation> = batches.into_iter().flat_map(Batch::into_operations).collect();
        assert_eq!(ops.len(), input.len());
        for (op, entry) in ops.iter().zip(&input) {
            assert_eq!(op.path, entry.path);
            assert_eq!(op.value, entry.value.as_bytes());
        }
    }

    #[test]
    fn rejects_invalid_capacity() {
        assert!(matches!(
            BatchPlanner::new(0),
            Err(SyncError::InvalidConfig(_))
        ));
        assert!(matches!(
            BatchPlanner::new(65),
            Err(SyncError::InvalidConfig(_))
        ));
        assert!(BatchPlanner::new(1).is_ok());
    }
}
