use chrono::Utc;
use tracing::debug;

use crate::error::{Error, Result};
use crate::timetable::Event;

/// Authoritative in-memory collection of scheduled events for one editing
/// session, plus the "currently edited event" selection.
///
/// The store is pure CRUD: it never computes conflicts or colors. All
/// mutations are atomic; a rejected operation leaves the collection
/// untouched.
#[derive(Debug, Default)]
pub struct Store {
    events: Vec<Event>,
    selected_id: Option<String>,
    next_seq: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a session-unique event id.
    pub fn mint_id(&mut self) -> String {
        self.next_seq += 1;
        format!("event-{}-{}", Utc::now().timestamp_millis(), self.next_seq)
    }

    /// Insert a new event. The id must not collide with a stored one.
    pub fn add(&mut self, event: Event) -> Result<()> {
        if self.events.iter().any(|e| e.id == event.id) {
            return Err(Error::DuplicateId(event.id));
        }
        debug!(id = %event.id, title = %event.title, "event added");
        self.events.push(event);
        Ok(())
    }

    /// Replace the stored event with the same id wholesale.
    pub fn update(&mut self, event: Event) -> Result<()> {
        match self.events.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => {
                debug!(id = %event.id, "event updated");
                *slot = event;
                Ok(())
            }
            None => Err(Error::NotFound(event.id)),
        }
    }

    /// Remove an event. Deleting an unknown id is a no-op, so callers can
    /// retry deletes safely; returns whether anything was removed. Removing
    /// the selected event clears the selection.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        let removed = self.events.len() < before;
        if removed {
            debug!(id, "event deleted");
            if self.selected_id.as_deref() == Some(id) {
                self.selected_id = None;
            }
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Snapshot of the collection, sorted by start time. Mutations must go
    /// through `add`/`update`/`delete`, never through the returned copy.
    pub fn list(&self) -> Vec<Event> {
        let mut events = self.events.clone();
        events.sort_by(|a, b| a.start.cmp(&b.start));
        events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    // ── Selection ──

    pub fn select(&mut self, id: &str) {
        if self.get(id).is_some() {
            self.selected_id = Some(id.to_string());
        }
    }

    pub fn selected(&self) -> Option<&Event> {
        self.selected_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = None;
    }
}
