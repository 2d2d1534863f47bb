//! Record sources: where list screens get their collection snapshots.
//!
//! The query engine only ever sees a `Vec` of records. Whether that came
//! from the `SQLite` store or from in-memory fixtures is decided here.

use std::collections::HashMap;

use crate::model::{Entity, EntityKind};
use crate::storage::{self, Storage};

/// Read access to ordered collection snapshots.
pub trait RecordSource {
    type Error: std::error::Error;

    /// Every record of type `R`, in the collection's own order.
    fn fetch_collection<R: Entity>(&self) -> Result<Vec<R>, Self::Error>;
}

impl RecordSource for Storage {
    type Error = storage::StorageError;

    fn fetch_collection<R: Entity>(&self) -> storage::Result<Vec<R>> {
        self.fetch_all()
    }
}

/// Collections held in memory as serialized bodies, keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    collections: HashMap<EntityKind, Vec<serde_json::Value>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends records to their kind's collection.
    pub fn extend<R: Entity>(&mut self, records: &[R]) -> serde_json::Result<()> {
        let bodies = records
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<_>>>()?;
        self.collections.entry(R::KIND).or_default().extend(bodies);
        Ok(())
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.collections.get(&kind).map_or(0, Vec::len)
    }
}

impl RecordSource for MemorySource {
    type Error = serde_json::Error;

    fn fetch_collection<R: Entity>(&self) -> serde_json::Result<Vec<R>> {
        self.collections
            .get(&R::KIND)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .map(|body| serde_json::from_value(body.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::fixtures;
    use crate::model::{Drone, Order};

    #[test]
    fn memory_source_round_trips_in_order() {
        let mut source = MemorySource::new();
        let drones = fixtures::drones();
        source.extend(&drones).unwrap();

        let loaded: Vec<Drone> = source.fetch_collection().unwrap();
        assert_eq!(loaded, drones);
        assert_eq!(source.count(EntityKind::Drone), drones.len());
    }

    #[test]
    fn missing_collection_is_empty() {
        let source = MemorySource::new();
        let orders: Vec<Order> = source.fetch_collection().unwrap();
        assert!(orders.is_empty());
    }

    #[test]
    fn storage_and_memory_agree() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path()).unwrap();
        let orders = fixtures::orders();
        storage.insert_all(&orders).unwrap();

        let mut memory = MemorySource::new();
        memory.extend(&orders).unwrap();

        let from_db: Vec<Order> = storage.fetch_collection().unwrap();
        let from_memory: Vec<Order> = memory.fetch_collection().unwrap();
        assert_eq!(from_db, from_memory);
    }
}
