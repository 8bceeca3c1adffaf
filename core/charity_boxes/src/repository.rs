//! # Repository
//!
//! The persistence contract the operations are written against, plus an
//! in-memory implementation.
//!
//! | Method            | Miss behaviour            |
//! |-------------------|---------------------------|
//! | `find_*`          | `Ok(None)`                |
//! | `save_*`          | upsert                    |
//! | `delete_*`        | no-op                     |
//! | `*_exists`        | `Ok(false)`               |
//! | `list_*`          | ordered by id             |
//!
//! Implementations report their own failures as [`Error::Storage`](crate::Error::Storage).

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::collection_box::CollectionBox;
use crate::error::Result;
use crate::fundraising_event::FundraisingEvent;
use crate::types::{BoxId, EventId};

#[async_trait]
pub trait Repository: Send {
    async fn find_box(&mut self, id: BoxId) -> Result<Option<CollectionBox>>;
    async fn save_box(&mut self, collection_box: &CollectionBox) -> Result<()>;
    async fn delete_box(&mut self, id: BoxId) -> Result<()>;
    async fn box_exists(&mut self, id: BoxId) -> Result<bool>;
    async fn list_boxes(&mut self) -> Result<Vec<CollectionBox>>;

    async fn find_event(&mut self, id: EventId) -> Result<Option<FundraisingEvent>>;
    async fn save_event(&mut self, event: &FundraisingEvent) -> Result<()>;
    async fn delete_event(&mut self, id: EventId) -> Result<()>;
    async fn event_exists(&mut self, id: EventId) -> Result<bool>;
    async fn list_events(&mut self) -> Result<Vec<FundraisingEvent>>;
}

/// Repository kept entirely in process memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryRepository {
    boxes: BTreeMap<BoxId, CollectionBox>,
    events: BTreeMap<EventId, FundraisingEvent>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn find_box(&mut self, id: BoxId) -> Result<Option<CollectionBox>> {
        Ok(self.boxes.get(&id).cloned())
    }

    async fn save_box(&mut self, collection_box: &CollectionBox) -> Result<()> {
        self.boxes
            .insert(collection_box.id(), collection_box.clone());
        Ok(())
    }

    async fn delete_box(&mut self, id: BoxId) -> Result<()> {
        self.boxes.remove(&id);
        Ok(())
    }

    async fn box_exists(&mut self, id: BoxId) -> Result<bool> {
        Ok(self.boxes.contains_key(&id))
    }

    async fn list_boxes(&mut self) -> Result<Vec<CollectionBox>> {
        Ok(self.boxes.values().cloned().collect())
    }

    async fn find_event(&mut self, id: EventId) -> Result<Option<FundraisingEvent>> {
        Ok(self.events.get(&id).cloned())
    }

    async fn save_event(&mut self, event: &FundraisingEvent) -> Result<()> {
        self.events.insert(event.id(), event.clone());
        Ok(())
    }

    async fn delete_event(&mut self, id: EventId) -> Result<()> {
        self.events.remove(&id);
        Ok(())
    }

    async fn event_exists(&mut self, id: EventId) -> Result<bool> {
        Ok(self.events.contains_key(&id))
    }

    async fn list_events(&mut self) -> Result<Vec<FundraisingEvent>> {
        Ok(self.events.values().cloned().collect())
    }
}
