//! Typed CRUD repository contract and the in-memory reference backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{Entity, StoreError};

/// Typed CRUD operations over one entity kind.
///
/// Predicate queries take a plain closure so backends can stay storage
/// agnostic; the in-memory backend scans, a relational backend may translate
/// common predicates into queries.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Fetches a record by id.
    async fn get(&self, id: Uuid) -> Result<Option<T>, StoreError>;

    /// Returns every record, ordered by id for stable iteration.
    async fn all(&self) -> Result<Vec<T>, StoreError>;

    /// Inserts a new record. Fails with [`StoreError::Duplicate`] if the id
    /// is already present.
    async fn add(&self, entity: T) -> Result<T, StoreError>;

    /// Replaces an existing record. Fails with [`StoreError::NotFound`] if
    /// the id is absent.
    async fn update(&self, entity: T) -> Result<T, StoreError>;

    /// Deletes a record by id. Deleting an absent id is a no-op.
    async fn remove(&self, id: Uuid) -> Result<(), StoreError>;

    /// Whether a record with this id exists.
    async fn exists(&self, id: Uuid) -> Result<bool, StoreError>;

    /// First record matching the predicate, in id order.
    async fn first_where(
        &self,
        predicate: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> Result<Option<T>, StoreError>;

    /// Every record matching the predicate, in id order.
    async fn all_where(
        &self,
        predicate: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> Result<Vec<T>, StoreError>;
}

/// In-memory [`Repository`] backend.
#[derive(Debug, Default)]
pub struct MemoryRepository<T> {
    records: RwLock<HashMap<Uuid, T>>,
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn get(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<T>, StoreError> {
        let mut records: Vec<T> = self.records.read().await.values().cloned().collect();
        records.sort_by_key(Entity::id);
        Ok(records)
    }

    async fn add(&self, entity: T) -> Result<T, StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&entity.id()) {
            return Err(StoreError::Duplicate(entity.id()));
        }
        records.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, StoreError> {
        let mut records = self.records.write().await;
        if !records.contains_key(&entity.id()) {
            return Err(StoreError::NotFound(entity.id()));
        }
        records.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        self.records.write().await.remove(&id);
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.records.read().await.contains_key(&id))
    }

    async fn first_where(
        &self,
        predicate: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> Result<Option<T>, StoreError> {
        Ok(self.all_where(predicate).await?.into_iter().next())
    }

    async fn all_where(
        &self,
        predicate: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> Result<Vec<T>, StoreError> {
        let guard = self.records.read().await;
        let mut matches: Vec<T> = Vec::new();
        for e in guard.values() {
            if predicate(e) {
                matches.push(e.clone());
            }
        }
        drop(guard);
        matches.sort_by_key(Entity::id);
        Ok(matches)
    }
}
