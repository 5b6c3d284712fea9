use crate::aggregate::AggregateSlot;
use crate::calendar::SlotDraft;
use crate::error::{DocumentError, FlowError, StoreError, ValidationError};
use crate::group::{group_by_day, DayGroup};
use crate::response::{self, Confirm, Responses, Submission};
use crate::score::{score_all, ScoredSlot};
use crate::store::{Document, DocumentStore};
use crate::time::TimeSlot;
use crate::vote::{AnswerSheet, Vote};
use chrono::TimeZone;
use log::info;
use serde::{Deserialize, Serialize};

/// Collection proposals are stored in
pub const PROPOSALS: &str = "times";

/// The organizer's candidate slots and everything answered so far
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    #[serde(rename = "times")]
    pub slots: Vec<TimeSlot>,
    #[serde(default, skip_serializing_if = "Responses::is_empty")]
    pub responses: Responses,
}

impl Proposal {
    pub fn new(slots: Vec<TimeSlot>) -> Proposal {
        Proposal {
            slots,
            responses: Responses::new(),
        }
    }

    /// Decodes a stored document.
    /// Any slot or answer missing `start`, `end` or `value`, or ending before
    /// it starts, rejects the whole document.
    pub fn from_document(document: Document) -> Result<Proposal, DocumentError> {
        Ok(serde_json::from_value(document)?)
    }

    pub fn to_document(&self) -> Result<Document, DocumentError> {
        Ok(serde_json::to_value(self)?)
    }

    /// A fresh answer sheet over this proposal's slots
    pub fn answer_sheet(&self) -> AnswerSheet {
        AnswerSheet::new(&self.slots)
    }

    pub fn aggregate(&self) -> Vec<AggregateSlot> {
        self.responses.aggregate()
    }

    /// Everything the respond/view page shows, with days taken in `tz`
    pub fn view<Tz: TimeZone>(&self, tz: &Tz) -> ProposalView {
        ProposalView {
            days: group_by_day(&self.slots, tz),
            rows: self
                .responses
                .iter()
                .map(|(name, answers)| RespondentRow {
                    name: name.to_string(),
                    votes: answers.iter().map(|answer| answer.value).collect(),
                })
                .collect(),
            totals: score_all(&self.aggregate()),
        }
    }
}

/// One respondent's votes in the order they answered
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RespondentRow {
    pub name: String,
    pub votes: Vec<Vote>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProposalView {
    pub days: Vec<DayGroup>,
    pub rows: Vec<RespondentRow>,
    pub totals: Vec<ScoredSlot>,
}

/// Stores the drafted slots as a new proposal and returns its shareable id.
/// The draft is cleared once the proposal exists.
///
/// # Examples
/// ```
/// use chrono::DateTime;
/// use treffpunkt::calendar::{SlotDraft, Span};
/// use treffpunkt::proposal::create;
/// use treffpunkt::store::MemoryStore;
///
/// let store = MemoryStore::new();
/// let mut draft = SlotDraft::new();
/// draft
///     .select(Span::new(
///         DateTime::from_timestamp(32_400, 0).unwrap(),
///         DateTime::from_timestamp(34_200, 0).unwrap(),
///     ))
///     .unwrap();
///
/// let id = create(&store, &mut draft).unwrap();
///
/// assert!(!id.is_empty());
/// assert!(draft.is_empty());
/// ```
pub fn create<S>(store: &S, draft: &mut SlotDraft) -> Result<String, FlowError>
where
    S: DocumentStore + ?Sized,
{
    if draft.is_empty() {
        return Err(ValidationError::NoSlots.into());
    }

    let document = Proposal::new(draft.slots()).to_document()?;
    let id = store.create(PROPOSALS, document)?;

    info!("created proposal {} with {} slots", id, draft.len());
    draft.clear();

    Ok(id)
}

/// Reads and decodes proposal `id`; `Ok(None)` when it does not exist
pub fn load<S>(store: &S, id: &str) -> Result<Option<Proposal>, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let path = crate::store::DocPath::document(PROPOSALS, id)?;

    store
        .get(&path)?
        .map(Proposal::from_document)
        .transpose()
        .map_err(StoreError::from)
}

/// Submits the sheet under its name to proposal `id`.
/// See [`response::submit`].
pub fn respond<S, C>(
    store: &S,
    id: &str,
    sheet: &AnswerSheet,
    confirm: &mut C,
) -> Result<Submission, FlowError>
where
    S: DocumentStore + ?Sized,
    C: Confirm + ?Sized,
{
    response::submit(store, id, sheet.name(), &sheet.answers(), confirm)
}
