use crate::error::ValidationError;
use crate::time::{TimeSlot, Timestamp};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A respondent's answer for one slot.
/// The vote button cycles yes -> maybe -> no -> yes.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Yes,
    #[default]
    No,
    Maybe,
}

impl Vote {
    /// # Examples
    /// ```
    /// use treffpunkt::vote::Vote;
    ///
    /// assert_eq!(Vote::Yes.next(), Vote::Maybe);
    /// assert_eq!(Vote::Maybe.next(), Vote::No);
    /// assert_eq!(Vote::No.next(), Vote::Yes);
    /// ```
    pub fn next(self) -> Vote {
        match self {
            Vote::Yes => Vote::Maybe,
            Vote::Maybe => Vote::No,
            Vote::No => Vote::Yes,
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vote::Yes => write!(f, "yes"),
            Vote::No => write!(f, "no"),
            Vote::Maybe => write!(f, "maybe"),
        }
    }
}

#[derive(Deserialize, Serialize)]
struct AnswerDoc {
    start: Timestamp,
    end: Timestamp,
    value: Vote,
}

/// One stored answer: the slot it refers to and the vote.
/// A missing `start`, `end` or `value` fails deserialization.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[serde(try_from = "AnswerDoc", into = "AnswerDoc")]
pub struct Answer {
    pub slot: TimeSlot,
    pub value: Vote,
}

impl Answer {
    pub fn new(slot: TimeSlot, value: Vote) -> Answer {
        Answer { slot, value }
    }
}

impl TryFrom<AnswerDoc> for Answer {
    type Error = ValidationError;

    fn try_from(doc: AnswerDoc) -> Result<Self, Self::Error> {
        let slot = TimeSlot::new(doc.start.to_datetime()?, doc.end.to_datetime()?)?;
        Ok(Answer::new(slot, doc.value))
    }
}

impl From<Answer> for AnswerDoc {
    fn from(answer: Answer) -> Self {
        AnswerDoc {
            start: answer.slot.start().into(),
            end: answer.slot.end().into(),
            value: answer.value,
        }
    }
}

/// Unsaved answer for one proposal slot, identified by its position
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DraftAnswer {
    pub id: usize,
    pub slot: TimeSlot,
    pub value: Vote,
}

/// The respondent's editing session: a name and one draft answer per slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    name: String,
    drafts: Vec<DraftAnswer>,
}

impl AnswerSheet {
    /// Opens a sheet over the proposal's slots, every answer defaulting to `no`
    pub fn new(slots: &[TimeSlot]) -> AnswerSheet {
        AnswerSheet {
            name: String::new(),
            drafts: slots
                .iter()
                .enumerate()
                .map(|(id, &slot)| DraftAnswer {
                    id,
                    slot,
                    value: Vote::default(),
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn drafts(&self) -> &[DraftAnswer] {
        &self.drafts
    }

    /// Advances the vote of draft `id`, returning the new vote.
    /// Unknown ids leave the sheet untouched.
    pub fn toggle(&mut self, id: usize) -> Option<Vote> {
        let draft = self.drafts.iter_mut().find(|draft| draft.id == id)?;
        draft.value = draft.value.next();
        Some(draft.value)
    }

    /// The answers as they would be persisted
    pub fn answers(&self) -> Vec<Answer> {
        self.drafts
            .iter()
            .map(|draft| Answer::new(draft.slot, draft.value))
            .collect_vec()
    }
}
