use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;

use crate::timetable::Event;

/// One of the independent resource axes along which two overlapping events
/// can collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Room,
    Professor,
    Semester,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::Room => write!(f, "room"),
            ConflictKind::Professor => write!(f, "professor"),
            ConflictKind::Semester => write!(f, "semester"),
        }
    }
}

/// One side of a detected collision: `event_id` clashes with
/// `with_event_id` over the shared resource `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictRecord {
    pub event_id: String,
    pub kind: ConflictKind,
    pub value: String,
    pub with_event_id: String,
}

/// Distinct conflicting resource values per dimension, for banner display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConflictSummary {
    pub total: usize,
    pub rooms: Vec<String>,
    pub professors: Vec<String>,
    pub semesters: Vec<String>,
}

/// Every conflict in one snapshot of the event set.
///
/// Rebuilt from scratch after each store mutation; holds no state of its
/// own beyond the scan result, so recomputing it for the same snapshot is
/// idempotent. The scan is a plain O(n²) pairwise pass, which is fine for
/// the tens of events a weekly timetable holds.
#[derive(Debug, Default)]
pub struct ConflictReport {
    by_event: HashMap<String, Vec<ConflictRecord>>,
}

impl ConflictReport {
    pub fn detect(events: &[Event]) -> Self {
        let mut by_event: HashMap<String, Vec<ConflictRecord>> = HashMap::new();

        for i in 0..events.len() {
            for j in (i + 1)..events.len() {
                let (a, b) = (&events[i], &events[j]);
                if !a.overlaps(b) {
                    continue;
                }
                // A pair can collide on several dimensions at once; every
                // applicable one is recorded, attributed to both sides.
                for (kind, value) in colliding_dimensions(a, b) {
                    push_pair(&mut by_event, a, b, kind, value);
                }
            }
        }

        Self { by_event }
    }

    pub fn is_conflicted(&self, id: &str) -> bool {
        self.by_event.contains_key(id)
    }

    pub fn records_for(&self, id: &str) -> &[ConflictRecord] {
        self.by_event.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn conflicted_ids(&self) -> BTreeSet<&str> {
        self.by_event.keys().map(String::as_str).collect()
    }

    /// Human-readable description of one event's conflicts, grouped by
    /// dimension with distinct values, e.g.
    /// "Sala A101 ocupada • Prof. Silva em choque".
    pub fn describe(&self, id: &str) -> Option<String> {
        let records = self.by_event.get(id)?;

        let distinct = |kind: ConflictKind| -> Vec<&str> {
            let mut seen = BTreeSet::new();
            records
                .iter()
                .filter(|r| r.kind == kind)
                .filter(|r| seen.insert(r.value.as_str()))
                .map(|r| r.value.as_str())
                .collect()
        };

        let mut parts = Vec::new();
        let rooms = distinct(ConflictKind::Room);
        if !rooms.is_empty() {
            parts.push(format!("Sala {} ocupada", rooms.join(", ")));
        }
        let professors = distinct(ConflictKind::Professor);
        if !professors.is_empty() {
            parts.push(format!("Prof. {} em choque", professors.join(", ")));
        }
        let semesters = distinct(ConflictKind::Semester);
        if !semesters.is_empty() {
            parts.push(format!("Semestre {} em choque", semesters.join(", ")));
        }

        Some(parts.join(" \u{2022} "))
    }

    pub fn summary(&self) -> ConflictSummary {
        let mut rooms = BTreeSet::new();
        let mut professors = BTreeSet::new();
        let mut semesters = BTreeSet::new();

        for record in self.by_event.values().flatten() {
            match record.kind {
                ConflictKind::Room => rooms.insert(record.value.clone()),
                ConflictKind::Professor => professors.insert(record.value.clone()),
                ConflictKind::Semester => semesters.insert(record.value.clone()),
            };
        }

        ConflictSummary {
            total: self.by_event.len(),
            rooms: rooms.into_iter().collect(),
            professors: professors.into_iter().collect(),
            semesters: semesters.into_iter().collect(),
        }
    }
}

/// Resource predicates for one time-overlapping pair. A dimension applies
/// only when both sides constrain it; the semester dimension additionally
/// skips pairs with the same title, so two sections of one course sharing
/// a semester are not flagged against each other.
fn colliding_dimensions(a: &Event, b: &Event) -> Vec<(ConflictKind, String)> {
    let mut hits = Vec::new();

    if let (Some(ra), Some(rb)) = (a.room(), b.room()) {
        if ra == rb {
            hits.push((ConflictKind::Room, ra.to_string()));
        }
    }
    if let (Some(pa), Some(pb)) = (a.professor(), b.professor()) {
        if pa == pb {
            hits.push((ConflictKind::Professor, pa.to_string()));
        }
    }
    if let (Some(sa), Some(sb)) = (a.semester(), b.semester()) {
        if sa == sb && a.title.trim() != b.title.trim() {
            hits.push((ConflictKind::Semester, sa.to_string()));
        }
    }

    hits
}

fn push_pair(
    by_event: &mut HashMap<String, Vec<ConflictRecord>>,
    a: &Event,
    b: &Event,
    kind: ConflictKind,
    value: String,
) {
    by_event.entry(a.id.clone()).or_default().push(ConflictRecord {
        event_id: a.id.clone(),
        kind,
        value: value.clone(),
        with_event_id: b.id.clone(),
    });
    by_event.entry(b.id.clone()).or_default().push(ConflictRecord {
        event_id: b.id.clone(),
        kind,
        value,
        with_event_id: a.id.clone(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    struct Spec<'a> {
        id: &'a str,
        title: &'a str,
        day: u32,
        start: (u32, u32),
        end: (u32, u32),
        room: Option<&'a str>,
        professor: Option<&'a str>,
        semester: Option<&'a str>,
    }

    impl Default for Spec<'_> {
        fn default() -> Self {
            Self {
                id: "e",
                title: "Cálculo I",
                day: 6,
                start: (8, 30),
                end: (9, 30),
                room: None,
                professor: None,
                semester: None,
            }
        }
    }

    fn event(spec: Spec) -> Event {
        Event {
            id: spec.id.into(),
            title: spec.title.into(),
            start: at(spec.day, spec.start.0, spec.start.1),
            end: at(spec.day, spec.end.0, spec.end.1),
            room: spec.room.map(Into::into),
            professor: spec.professor.map(Into::into),
            semester: spec.semester.map(Into::into),
            cohort: None,
            kind: String::new(),
            background_color: String::new(),
            border_color: String::new(),
            text_color: String::new(),
        }
    }

    #[test]
    fn different_days_never_conflict() {
        let a = event(Spec {
            id: "a",
            room: Some("A101"),
            professor: Some("Silva"),
            ..Default::default()
        });
        let b = event(Spec {
            id: "b",
            title: "Algoritmos",
            day: 7,
            room: Some("A101"),
            professor: Some("Silva"),
            ..Default::default()
        });

        let report = ConflictReport::detect(&[a, b]);
        assert!(report.conflicted_ids().is_empty());
    }

    #[test]
    fn room_conflict_flags_both_sides() {
        let a = event(Spec {
            id: "a",
            room: Some("A101"),
            ..Default::default()
        });
        let b = event(Spec {
            id: "b",
            title: "Algoritmos",
            start: (9, 0),
            end: (10, 0),
            room: Some("A101"),
            ..Default::default()
        });

        let report = ConflictReport::detect(&[a, b]);
        assert!(report.is_conflicted("a"));
        assert!(report.is_conflicted("b"));

        let records = report.records_for("a");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ConflictKind::Room);
        assert_eq!(records[0].value, "A101");
        assert_eq!(records[0].with_event_id, "b");
    }

    #[test]
    fn touching_endpoints_are_not_a_conflict() {
        let a = event(Spec {
            id: "a",
            room: Some("A101"),
            ..Default::default()
        });
        let b = event(Spec {
            id: "b",
            title: "Algoritmos",
            start: (9, 30),
            end: (10, 30),
            room: Some("A101"),
            ..Default::default()
        });

        let report = ConflictReport::detect(&[a, b]);
        assert!(report.conflicted_ids().is_empty());
    }

    #[test]
    fn same_course_sections_share_a_semester_quietly() {
        let a = event(Spec {
            id: "a",
            semester: Some("3"),
            ..Default::default()
        });
        let b = event(Spec {
            id: "b",
            semester: Some("3"),
            ..Default::default()
        });

        let report = ConflictReport::detect(&[a, b]);
        assert!(!report.is_conflicted("a"));

        let c = event(Spec {
            id: "c",
            title: "Algoritmos",
            semester: Some(" 3 "),
            ..Default::default()
        });
        let a = event(Spec {
            id: "a",
            semester: Some("3"),
            ..Default::default()
        });
        let report = ConflictReport::detect(&[a, c]);
        assert!(report.is_conflicted("a"));
        assert_eq!(report.records_for("a")[0].kind, ConflictKind::Semester);
        assert_eq!(report.records_for("a")[0].value, "3");
    }

    #[test]
    fn one_pair_can_hit_several_dimensions() {
        let a = event(Spec {
            id: "a",
            room: Some("A101"),
            professor: Some("Silva"),
            ..Default::default()
        });
        let b = event(Spec {
            id: "b",
            title: "Algoritmos",
            start: (9, 0),
            end: (10, 0),
            room: Some("A101"),
            professor: Some("Silva"),
            ..Default::default()
        });

        let report = ConflictReport::detect(&[a, b]);
        let kinds: Vec<_> = report.records_for("a").iter().map(|r| r.kind).collect();
        assert!(kinds.contains(&ConflictKind::Room));
        assert!(kinds.contains(&ConflictKind::Professor));
    }

    #[test]
    fn blank_resources_never_participate() {
        let a = event(Spec {
            id: "a",
            room: Some(""),
            professor: Some("  "),
            ..Default::default()
        });
        let b = event(Spec {
            id: "b",
            title: "Algoritmos",
            room: Some(""),
            professor: Some("  "),
            ..Default::default()
        });

        let report = ConflictReport::detect(&[a, b]);
        assert!(report.conflicted_ids().is_empty());
    }

    #[test]
    fn detection_is_order_independent() {
        let a = event(Spec {
            id: "a",
            room: Some("A101"),
            ..Default::default()
        });
        let b = event(Spec {
            id: "b",
            title: "Algoritmos",
            start: (9, 0),
            end: (10, 0),
            room: Some("A101"),
            ..Default::default()
        });

        let forward = ConflictReport::detect(&[a.clone(), b.clone()]);
        let backward = ConflictReport::detect(&[b, a]);
        assert_eq!(forward.conflicted_ids(), backward.conflicted_ids());
        assert_eq!(forward.summary(), backward.summary());
    }

    #[test]
    fn describe_groups_by_dimension() {
        let a = event(Spec {
            id: "a",
            room: Some("A101"),
            professor: Some("Silva"),
            ..Default::default()
        });
        let b = event(Spec {
            id: "b",
            title: "Algoritmos",
            start: (9, 0),
            end: (10, 0),
            room: Some("A101"),
            professor: Some("Silva"),
            ..Default::default()
        });

        let report = ConflictReport::detect(&[a, b]);
        let text = report.describe("a").unwrap();
        assert_eq!(text, "Sala A101 ocupada \u{2022} Prof. Silva em choque");
        assert!(report.describe("ghost").is_none());
    }

    #[test]
    fn summary_counts_events_and_distinct_values() {
        let a = event(Spec {
            id: "a",
            room: Some("A101"),
            ..Default::default()
        });
        let b = event(Spec {
            id: "b",
            title: "Algoritmos",
            start: (9, 0),
            end: (10, 0),
            room: Some("A101"),
            ..Default::default()
        });
        let c = event(Spec {
            id: "c",
            title: "Física I",
            day: 7,
            ..Default::default()
        });

        let report = ConflictReport::detect(&[a, b, c]);
        let summary = report.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.rooms, vec!["A101".to_string()]);
        assert!(summary.professors.is_empty());
        assert!(summary.semesters.is_empty());
    }
}
