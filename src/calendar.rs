use crate::error::ValidationError;
use crate::time::TimeSlot;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use itertools::Itertools;
use log::trace;

/// A range selected, dragged or resized in the calendar widget
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Span {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Span {
        Span { start, end }
    }
}

/// Whether the widget may offer `span` for selection.
/// A span has to stay within one local calendar day, or run up to exactly
/// local midnight at the end of its start day.
///
/// # Examples
/// ```
/// use chrono::DateTime;
/// use chrono::Utc;
/// use treffpunkt::calendar::{selection_allowed, Span};
///
/// let at = |seconds| DateTime::from_timestamp(seconds, 0).unwrap();
///
/// assert!(selection_allowed(&Span::new(at(3600), at(7200)), &Utc));
/// assert!(selection_allowed(&Span::new(at(79_200), at(86_400)), &Utc));
/// assert!(!selection_allowed(&Span::new(at(79_200), at(90_000)), &Utc));
/// ```
pub fn selection_allowed<Tz: TimeZone>(span: &Span, tz: &Tz) -> bool {
    let start = span.start.with_timezone(tz).naive_local();
    let end = span.end.with_timezone(tz).naive_local();

    start.date() == end.date()
        || (end.time() == NaiveTime::MIN && start.date().succ_opt() == Some(end.date()))
}

/// A slot in the organizer's draft with the id the widget knows it by
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DraftSlot {
    pub id: u64,
    pub slot: TimeSlot,
}

/// The organizer's slot list while the proposal is being built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotDraft {
    slots: Vec<DraftSlot>,
    next_id: u64,
}

impl SlotDraft {
    pub fn new() -> SlotDraft {
        SlotDraft::default()
    }

    /// Adds the selected range, returning its id
    pub fn select(&mut self, span: Span) -> Result<u64, ValidationError> {
        let slot = TimeSlot::new(span.start, span.end)?;
        let id = self.next_id;
        self.next_id += 1;

        trace!("draft slot {} selected: {}", id, slot);
        self.slots.push(DraftSlot { id, slot });

        Ok(id)
    }

    /// Drops the slot the widget reported clicked
    pub fn remove(&mut self, id: u64) -> Option<TimeSlot> {
        let index = self.slots.iter().position(|draft| draft.id == id)?;
        Some(self.slots.remove(index).slot)
    }

    /// A drag or resize: the old slot goes away and the new range is added
    /// at the end under a fresh id.
    pub fn edit(&mut self, id: u64, span: Span) -> Result<u64, ValidationError> {
        // Validate first so a bad edit leaves the old slot in place
        TimeSlot::new(span.start, span.end)?;
        self.remove(id);
        self.select(span)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn drafts(&self) -> &[DraftSlot] {
        &self.slots
    }

    /// The slots in the order they were added
    pub fn slots(&self) -> Vec<TimeSlot> {
        self.slots.iter().map(|draft| draft.slot).collect_vec()
    }
}

/// Grid resolution of the calendar widget
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SlotDuration {
    Sixty,
    #[default]
    Thirty,
    Fifteen,
    Ten,
    Five,
}

impl SlotDuration {
    pub fn minutes(self) -> u32 {
        match self {
            SlotDuration::Sixty => 60,
            SlotDuration::Thirty => 30,
            SlotDuration::Fifteen => 15,
            SlotDuration::Ten => 10,
            SlotDuration::Five => 5,
        }
    }

    /// Minutes between axis labels at this resolution
    pub fn label_interval(self) -> u32 {
        match self {
            SlotDuration::Sixty | SlotDuration::Thirty | SlotDuration::Fifteen => 60,
            SlotDuration::Ten | SlotDuration::Five => 10,
        }
    }

    /// The duration button steps 60 -> 30 -> 15 -> 10 -> 5 -> 60
    pub fn next(self) -> SlotDuration {
        match self {
            SlotDuration::Sixty => SlotDuration::Thirty,
            SlotDuration::Thirty => SlotDuration::Fifteen,
            SlotDuration::Fifteen => SlotDuration::Ten,
            SlotDuration::Ten => SlotDuration::Five,
            SlotDuration::Five => SlotDuration::Sixty,
        }
    }
}
