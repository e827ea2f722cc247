use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Collection, Namespace};
use crate::repository::traits::RecordStore;

/// Keeps each collection as serialized JSON in memory, so records take the same
/// serde round trip as on disk. Single-threaded.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    collections: RefCell<HashMap<Namespace, String>>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed write operations (a pair counts once).
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Makes every following write fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.get() {
            return Err(Error::Storage(io::Error::other("store is read-only")));
        }
        Ok(())
    }
}

impl RecordStore for MemoryRecordStore {
    fn read_all<T: Collection>(&self) -> Result<Vec<T>> {
        match self.collections.borrow().get(&T::NAMESPACE) {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_all<T: Collection>(&self, records: &[T]) -> Result<()> {
        self.check_writable()?;
        let json = serde_json::to_string(records)?;
        self.collections.borrow_mut().insert(T::NAMESPACE, json);
        self.writes.set(self.writes.get() + 1);
        debug!("wrote {} records to {}", records.len(), T::NAMESPACE);
        Ok(())
    }

    fn write_pair<A: Collection, B: Collection>(&self, first: &[A], second: &[B]) -> Result<()> {
        self.check_writable()?;
        let first_json = serde_json::to_string(first)?;
        let second_json = serde_json::to_string(second)?;
        let mut collections = self.collections.borrow_mut();
        collections.insert(A::NAMESPACE, first_json);
        collections.insert(B::NAMESPACE, second_json);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn write_triple<A: Collection, B: Collection, C: Collection>(
        &self,
        first: &[A],
        second: &[B],
        third: &[C],
    ) -> Result<()> {
        self.check_writable()?;
        let first_json = serde_json::to_string(first)?;
        let second_json = serde_json::to_string(second)?;
        let third_json = serde_json::to_string(third)?;
        let mut collections = self.collections.borrow_mut();
        collections.insert(A::NAMESPACE, first_json);
        collections.insert(B::NAMESPACE, second_json);
        collections.insert(C::NAMESPACE, third_json);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
