//! Conflict-detection and normalization engine for a weekly class
//! timetable editor.
//!
//! The calendar surface (drag, resize, rendering) lives outside this
//! crate; it reports raw interactions through [`session::TimetableSession`]
//! and renders whatever decorated snapshot the session hands back. All
//! events live on one fixed Monday-Friday reference week with half-hour
//! slot boundaries; overlapping events that share a room, professor or
//! semester are flagged and repainted with the conflict palette.

pub mod error;
pub mod palette;
pub mod session;
pub mod timetable;

pub use error::{Error, Result};
pub use palette::EventColors;
pub use session::{DecoratedEvent, EventForm, EventPayload, TimetableSession};
pub use timetable::{ConflictKind, ConflictRecord, ConflictReport, ConflictSummary, Event, Store};
