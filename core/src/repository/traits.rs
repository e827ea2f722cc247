use tracing::warn;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Collection, Identified};

/// Whole-collection persistence keyed by namespace.
///
/// Every mutation reads the full collection, changes it in memory and writes the
/// full collection back. There is no locking: two processes writing the same
/// namespace lose updates, the last writer wins.
pub trait RecordStore {
    /// Returns an empty collection for a namespace that was never written.
    fn read_all<T: Collection>(&self) -> Result<Vec<T>>;

    fn write_all<T: Collection>(&self, records: &[T]) -> Result<()>;

    /// Persists two collections as one commit: neither is replaced unless both
    /// were serialized and staged.
    fn write_pair<A: Collection, B: Collection>(&self, first: &[A], second: &[B]) -> Result<()>;

    /// Same guarantee as [`write_pair`](RecordStore::write_pair) for three collections.
    fn write_triple<A: Collection, B: Collection, C: Collection>(
        &self,
        first: &[A],
        second: &[B],
        third: &[C],
    ) -> Result<()>;

    fn append<T: Collection>(&self, record: T) -> Result<()> {
        let mut records = self.read_all::<T>()?;
        records.push(record);
        self.write_all(&records)
    }

    fn find_by_id<T: Identified>(&self, id: &Uuid) -> Result<Option<T>> {
        Ok(self.read_all::<T>()?.into_iter().find(|r| r.id() == *id))
    }

    /// Replaces the element with the same id. Returns `false` without writing if none matches.
    fn replace_by_id<T: Identified>(&self, record: T) -> Result<bool> {
        let mut records = self.read_all::<T>()?;
        match records.iter().position(|r| r.id() == record.id()) {
            Some(pos) => {
                records[pos] = record;
                self.write_all(&records)?;
                Ok(true)
            }
            None => {
                warn!("replace in {}: id {} not found", T::NAMESPACE, record.id());
                Ok(false)
            }
        }
    }

    /// Removes the element with `id`. Returns `false` without writing if none matches.
    fn delete_by_id<T: Identified>(&self, id: &Uuid) -> Result<bool> {
        let mut records = self.read_all::<T>()?;
        let initial_len = records.len();
        records.retain(|r| r.id() != *id);

        if records.len() == initial_len {
            warn!("delete in {}: id {} not found", T::NAMESPACE, id);
            return Ok(false);
        }

        self.write_all(&records)?;
        Ok(true)
    }
}
