use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::palette;

/// A scheduled class session on the fixed reference week.
///
/// The three color fields are derived from `kind` and are overwritten on
/// every commit; values supplied by callers are never kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(default, rename = "class", skip_serializing_if = "Option::is_none")]
    pub cohort: Option<String>,
    /// Modality tag, e.g. "Teórica" or "Prática". May be empty.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(rename = "backgroundColor", default)]
    pub background_color: String,
    #[serde(rename = "borderColor", default)]
    pub border_color: String,
    #[serde(rename = "textColor", default)]
    pub text_color: String,
}

impl Event {
    /// Recompute the display colors from the current `kind`. Total; never
    /// fails, never inspects the previous color values.
    pub fn apply_colors(&mut self) {
        let colors = palette::colors_for(&self.kind);
        self.background_color = colors.bg;
        self.border_color = colors.border;
        self.text_color = colors.text;
    }

    pub fn room(&self) -> Option<&str> {
        constrained(&self.room)
    }

    pub fn professor(&self) -> Option<&str> {
        constrained(&self.professor)
    }

    pub fn semester(&self) -> Option<&str> {
        constrained(&self.semester)
    }

    pub fn cohort(&self) -> Option<&str> {
        constrained(&self.cohort)
    }

    /// Half-open interval overlap on the same calendar date. Touching
    /// endpoints do not overlap.
    pub fn overlaps(&self, other: &Event) -> bool {
        self.start.date() == other.start.date()
            && self.start < other.end
            && other.start < self.end
    }

    pub fn time_display(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// A resource field participates in conflicts only when it is present and
/// non-blank after trimming.
fn constrained(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
