use crate::aggregate::{Aggregate, AggregateSlot};
use crate::error::{FlowError, ValidationError};
use crate::proposal::PROPOSALS;
use crate::store::{DocPath, DocumentStore, FieldPath};
use crate::vote::Answer;
use log::{info, trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const RESPONSES_FIELD: &str = "responses";

/// Respondent name -> that respondent's answers, in the order they were given
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[serde(transparent)]
pub struct Responses(BTreeMap<String, Vec<Answer>>);

impl Responses {
    pub fn new() -> Responses {
        Responses::default()
    }

    /// Replaces everything `name` answered before.
    /// Returns the replaced answers, if any.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt::response::Responses;
    /// use treffpunkt::time::TimeSlot;
    /// use treffpunkt::vote::{Answer, Vote};
    ///
    /// let slot = TimeSlot::from_seconds(0, 1800).unwrap();
    /// let mut responses = Responses::new();
    ///
    /// responses.upsert("Ada", vec![Answer::new(slot, Vote::Yes)]);
    /// let old = responses.upsert("Ada", vec![Answer::new(slot, Vote::No)]);
    ///
    /// assert_eq!(old, Some(vec![Answer::new(slot, Vote::Yes)]));
    /// assert_eq!(responses.get("Ada"), Some(&[Answer::new(slot, Vote::No)][..]));
    /// assert_eq!(responses.len(), 1);
    /// ```
    pub fn upsert(&mut self, name: impl Into<String>, answers: Vec<Answer>) -> Option<Vec<Answer>> {
        self.0.insert(name.into(), answers)
    }

    pub fn get(&self, name: &str) -> Option<&[Answer]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Respondents ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Answer])> {
        self.0
            .iter()
            .map(|(name, answers)| (name.as_str(), answers.as_slice()))
    }

    /// Every answer of every respondent
    pub fn answers(&self) -> impl Iterator<Item = &Answer> {
        self.0.values().flatten()
    }

    pub fn aggregate(&self) -> Vec<AggregateSlot> {
        self.answers().aggregate()
    }

    #[cfg(feature = "rayon")]
    pub fn par_aggregate(&self) -> Vec<AggregateSlot> {
        use rayon::prelude::*;

        crate::aggregate::par_aggregate(self.0.par_iter().flat_map(|(_, answers)| answers.par_iter()))
    }
}

impl<S> FromIterator<(S, Vec<Answer>)> for Responses
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, Vec<Answer>)>>(iter: I) -> Self {
        Responses(
            iter.into_iter()
                .map(|(name, answers)| (name.into(), answers))
                .collect(),
        )
    }
}

/// Asks the user to confirm a write before it is issued
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub const CONFIRM_PROMPT: &str = "Are you sure you want to submit?";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Submission {
    Submitted,
    /// The user declined; nothing was written
    Cancelled,
}

/// Stores `answers` as `name`'s complete response to proposal `proposal_id`,
/// replacing whatever that name submitted before.
///
/// An empty name is rejected before anything else happens. Otherwise the user
/// must confirm; declining aborts with no effect. The write is a single
/// update and is not retried.
pub fn submit<S, C>(
    store: &S,
    proposal_id: &str,
    name: &str,
    answers: &[Answer],
    confirm: &mut C,
) -> Result<Submission, FlowError>
where
    S: DocumentStore + ?Sized,
    C: Confirm + ?Sized,
{
    if name.is_empty() {
        return Err(ValidationError::EmptyName.into());
    }

    let path = DocPath::document(PROPOSALS, proposal_id)?;

    if !confirm.confirm(CONFIRM_PROMPT) {
        trace!("submission for {} to {} cancelled", name, path);
        return Ok(Submission::Cancelled);
    }

    let answers = serde_json::to_value(answers).map_err(crate::error::DocumentError::from)?;
    store.update(
        &path,
        vec![(FieldPath::new(vec![RESPONSES_FIELD, name]), answers)],
    )?;

    info!("stored response of {} to {}", name, path);

    Ok(Submission::Submitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::proposal::Proposal;
    use crate::store::{Document, MemoryStore};
    use crate::time::TimeSlot;
    use crate::vote::Vote;
    use serde_json::{json, Value};
    use std::cell::Cell;

    /// Counts writes on top of a memory store
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        updates: Cell<usize>,
    }

    impl DocumentStore for CountingStore {
        fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
            self.inner.get(path)
        }

        fn create(&self, collection: &str, fields: Document) -> Result<String, StoreError> {
            self.inner.create(collection, fields)
        }

        fn update(&self, path: &DocPath, fields: Vec<(FieldPath, Value)>) -> Result<(), StoreError> {
            self.updates.set(self.updates.get() + 1);
            self.inner.update(path, fields)
        }
    }

    fn slot() -> TimeSlot {
        TimeSlot::from_seconds(32_400, 34_200).unwrap()
    }

    fn setup() -> (CountingStore, String) {
        let store = CountingStore::default();
        let id = store
            .create("times", json!({ "times": [serde_json::to_value(slot()).unwrap()] }))
            .unwrap();
        (store, id)
    }

    fn load(store: &CountingStore, id: &str) -> Proposal {
        let path = DocPath::document("times", id).unwrap();
        Proposal::from_document(store.get(&path).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn empty_name_writes_nothing() {
        let (store, id) = setup();
        let mut asked = false;

        let result = submit(
            &store,
            &id,
            "",
            &[Answer::new(slot(), Vote::Yes)],
            &mut |_: &str| {
                asked = true;
                true
            },
        );

        assert_eq!(result, Err(FlowError::Validation(ValidationError::EmptyName)));
        assert_eq!(store.updates.get(), 0);
        assert!(!asked);
    }

    #[test]
    fn declined_confirmation_writes_nothing() {
        let (store, id) = setup();

        let result = submit(
            &store,
            &id,
            "Ada",
            &[Answer::new(slot(), Vote::Yes)],
            &mut |prompt: &str| {
                assert_eq!(prompt, CONFIRM_PROMPT);
                false
            },
        );

        assert_eq!(result, Ok(Submission::Cancelled));
        assert_eq!(store.updates.get(), 0);
        assert!(load(&store, &id).responses.is_empty());
    }

    #[test]
    fn resubmitting_replaces_previous_answers() {
        let (store, id) = setup();
        let mut yes = |_: &str| true;

        submit(&store, &id, "Ada", &[Answer::new(slot(), Vote::Yes)], &mut yes).unwrap();
        submit(&store, &id, "Bob", &[Answer::new(slot(), Vote::Maybe)], &mut yes).unwrap();
        submit(&store, &id, "Ada", &[Answer::new(slot(), Vote::No)], &mut yes).unwrap();

        let proposal = load(&store, &id);
        assert_eq!(proposal.responses.len(), 2);
        assert_eq!(
            proposal.responses.get("Ada"),
            Some(&[Answer::new(slot(), Vote::No)][..])
        );
        assert_eq!(store.updates.get(), 3);
    }

    #[test]
    fn dotted_names_stay_one_respondent() {
        let (store, id) = setup();

        submit(
            &store,
            &id,
            "A. Lovelace",
            &[Answer::new(slot(), Vote::Yes)],
            &mut |_: &str| true,
        )
        .unwrap();

        let proposal = load(&store, &id);
        assert_eq!(proposal.responses.iter().map(|(n, _)| n).collect::<Vec<_>>(), vec!["A. Lovelace"]);
    }

    #[test]
    fn unknown_proposal_propagates() {
        let store = CountingStore::default();

        let result = submit(
            &store,
            "nope",
            "Ada",
            &[Answer::new(slot(), Vote::Yes)],
            &mut |_: &str| true,
        );

        assert_eq!(
            result,
            Err(FlowError::Store(StoreError::NotFound {
                path: "times/nope".to_string()
            }))
        );
    }

    #[test]
    fn proposal_id_with_slash_is_invalid() {
        let (store, _) = setup();

        let result = submit(&store, "a/b", "Ada", &[], &mut |_: &str| true);

        assert!(matches!(
            result,
            Err(FlowError::Validation(ValidationError::InvalidPath { .. }))
        ));
        assert_eq!(store.updates.get(), 0);
    }
}
