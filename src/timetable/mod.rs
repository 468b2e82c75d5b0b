pub mod conflict;
pub mod event;
pub mod store;
pub mod week;

pub use conflict::{ConflictKind, ConflictRecord, ConflictReport, ConflictSummary};
pub use event::Event;
pub use store::Store;
pub use week::EventAttributes;
