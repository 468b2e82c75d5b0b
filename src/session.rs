use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::palette;
use crate::timetable::week::{self, EventAttributes};
use crate::timetable::{ConflictReport, ConflictSummary, Event, Store};

/// Raw notification from the calendar surface for a drop, move or resize.
///
/// Only the named fields survive deserialization; whatever else rides
/// along on the drag payload is dropped at this boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub start: NaiveDateTime,
    #[serde(default)]
    pub end: Option<NaiveDateTime>,
    #[serde(default, rename = "extendedProps")]
    pub extended_props: ExtendedProps,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtendedProps {
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub professor: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default, rename = "class")]
    pub cohort: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// Fully specified fields from the edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventForm {
    pub title: String,
    pub weekday: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub professor: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default, rename = "class")]
    pub cohort: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl EventForm {
    fn attributes(&self) -> EventAttributes {
        EventAttributes {
            room: self.room.clone(),
            professor: self.professor.clone(),
            semester: self.semester.clone(),
            cohort: self.cohort.clone(),
            kind: self.kind.clone(),
        }
    }
}

/// A render-ready event: type-derived colors unless conflicted, in which
/// case the fixed conflict palette plus a description take over. Never
/// stored; produced fresh from the current snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DecoratedEvent {
    #[serde(flatten)]
    pub event: Event,
    #[serde(rename = "conflictInfo", skip_serializing_if = "Option::is_none")]
    pub conflict_info: Option<String>,
}

/// An event plus its conflict description, for the click/edit panel.
#[derive(Debug, Clone)]
pub struct EventDetails {
    pub event: Event,
    pub conflict_info: Option<String>,
}

/// The engine facade for one editing session.
///
/// Owns the store and a conflict report that is recomputed after every
/// committed mutation, so the report always reflects the snapshot the
/// mutation produced. Failed mutations leave both untouched.
#[derive(Debug, Default)]
pub struct TimetableSession {
    store: Store,
    conflicts: ConflictReport,
}

impl TimetableSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Drag/resize notifications ──

    /// A card was dragged in from the side panel: snap its times, mint an
    /// id unless the payload carries one, derive colors, commit and select
    /// it. Returns the committed event for the edit panel.
    pub fn on_external_item_dropped(&mut self, payload: EventPayload) -> Result<Event> {
        let start = week::snap_to_half_hour(payload.start);
        let end = match payload.end {
            Some(end) => week::snap_to_half_hour(end),
            None => start + Duration::hours(1),
        };
        week::validate_range(start, end)?;

        let id = match payload.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => self.store.mint_id(),
        };
        let event = assemble(id, payload.title, start, end, payload.extended_props);

        self.store.add(event.clone())?;
        self.store.select(&event.id);
        self.refresh_conflicts();
        Ok(event)
    }

    pub fn on_event_moved(&mut self, payload: EventPayload) -> Result<Event> {
        self.commit_geometry(payload)
    }

    pub fn on_event_resized(&mut self, payload: EventPayload) -> Result<Event> {
        self.commit_geometry(payload)
    }

    /// Snap the reported boundaries (end first, then start, as the resize
    /// handle can move either edge), rebuild the event from the payload
    /// and commit the update.
    fn commit_geometry(&mut self, payload: EventPayload) -> Result<Event> {
        let id = payload
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::Validation("event id is required for move/resize".into()))?;
        if self.store.get(&id).is_none() {
            return Err(Error::NotFound(id));
        }

        let end = week::snap_to_half_hour(match payload.end {
            Some(end) => end,
            None => payload.start + Duration::hours(1),
        });
        let start = week::snap_to_half_hour(payload.start);
        week::validate_range(start, end)?;

        let event = assemble(id, payload.title, start, end, payload.extended_props);
        self.store.update(event.clone())?;
        self.refresh_conflicts();
        Ok(event)
    }

    /// Look up the clicked event and, when conflicted, its description.
    pub fn on_event_clicked(&self, id: &str) -> Option<EventDetails> {
        let event = self.store.get(id)?.clone();
        let conflict_info = self.conflicts.describe(id);
        Some(EventDetails { event, conflict_info })
    }

    // ── Form-driven CRUD ──

    pub fn add_event(&mut self, form: &EventForm) -> Result<Event> {
        let title = non_blank_title(&form.title)?;
        let id = self.store.mint_id();
        let event = week::build_event(
            id,
            title,
            &form.weekday,
            &form.start_time,
            &form.end_time,
            form.attributes(),
        )?;
        self.store.add(event.clone())?;
        self.refresh_conflicts();
        Ok(event)
    }

    pub fn update_event(&mut self, id: &str, form: &EventForm) -> Result<Event> {
        if self.store.get(id).is_none() {
            return Err(Error::NotFound(id.to_string()));
        }
        let title = non_blank_title(&form.title)?;
        let event = week::build_event(
            id,
            title,
            &form.weekday,
            &form.start_time,
            &form.end_time,
            form.attributes(),
        )?;
        self.store.update(event.clone())?;
        self.refresh_conflicts();
        Ok(event)
    }

    /// Idempotent; deleting an id that is not present changes nothing.
    pub fn delete_event(&mut self, id: &str) -> bool {
        let removed = self.store.delete(id);
        if removed {
            self.refresh_conflicts();
        }
        removed
    }

    // ── Outbound views ──

    /// The decorated snapshot handed to the calendar surface for rendering.
    pub fn events(&self) -> Vec<DecoratedEvent> {
        self.store
            .list()
            .into_iter()
            .map(|mut event| {
                let conflict_info = self.conflicts.describe(&event.id);
                if conflict_info.is_some() {
                    let colors = &palette::current().conflict;
                    event.background_color = colors.bg.clone();
                    event.border_color = colors.border.clone();
                    event.text_color = colors.text.clone();
                }
                DecoratedEvent { event, conflict_info }
            })
            .collect()
    }

    pub fn conflict_summary(&self) -> ConflictSummary {
        self.conflicts.summary()
    }

    // ── Selection ──

    pub fn select(&mut self, id: &str) {
        self.store.select(id);
    }

    pub fn selected(&self) -> Option<&Event> {
        self.store.selected()
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    fn refresh_conflicts(&mut self) {
        self.conflicts = ConflictReport::detect(&self.store.list());
        debug!(
            conflicted = self.conflicts.conflicted_ids().len(),
            events = self.store.len(),
            "conflicts recomputed"
        );
    }
}

fn assemble(
    id: String,
    title: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    props: ExtendedProps,
) -> Event {
    let mut event = Event {
        id,
        title,
        start,
        end,
        room: props.room,
        professor: props.professor,
        semester: props.semester,
        cohort: props.cohort,
        kind: props.kind,
        background_color: String::new(),
        border_color: String::new(),
        text_color: String::new(),
    };
    event.apply_colors();
    event
}

fn non_blank_title(title: &str) -> Result<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("a title is required".into()));
    }
    Ok(trimmed)
}
