use crate::time::TimeSlot;
use crate::vote::{Answer, Vote};
use log::trace;
use serde::Serialize;
use std::collections::BTreeMap;

/// Vote counts for one slot
#[derive(Serialize, Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tally {
    pub yes: u32,
    pub no: u32,
    pub maybe: u32,
}

impl Tally {
    pub fn new(yes: u32, no: u32, maybe: u32) -> Tally {
        Tally { yes, no, maybe }
    }

    pub fn record(&mut self, vote: Vote) {
        match vote {
            Vote::Yes => self.yes += 1,
            Vote::No => self.no += 1,
            Vote::Maybe => self.maybe += 1,
        }
    }

    /// Number of answers counted
    pub fn total(&self) -> u32 {
        self.yes + self.no + self.maybe
    }

    pub fn merge(self, other: Tally) -> Tally {
        Tally {
            yes: self.yes + other.yes,
            no: self.no + other.no,
            maybe: self.maybe + other.maybe,
        }
    }
}

/// All answers given for one exact `(start, end)`
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AggregateSlot {
    #[serde(flatten)]
    pub slot: TimeSlot,
    #[serde(flatten)]
    pub tally: Tally,
}

pub trait Aggregate {
    fn aggregate(self) -> Vec<AggregateSlot>;
}

impl<'a, T> Aggregate for T
where
    T: Iterator<Item = &'a Answer>,
{
    /// Folds answers into one record per distinct slot.
    /// Only slots that were answered at least once show up, and records come
    /// out ordered by `(start, end)` whatever order the answers went in.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt::aggregate::{Aggregate, Tally};
    /// use treffpunkt::time::TimeSlot;
    /// use treffpunkt::vote::{Answer, Vote};
    ///
    /// let early = TimeSlot::from_seconds(0, 1800).unwrap();
    /// let late = TimeSlot::from_seconds(3600, 5400).unwrap();
    ///
    /// let answers = vec![
    ///     Answer::new(late, Vote::Yes),
    ///     Answer::new(early, Vote::Maybe),
    ///     Answer::new(late, Vote::No),
    /// ];
    ///
    /// let aggregate = answers.iter().aggregate();
    ///
    /// assert_eq!(aggregate.len(), 2);
    /// assert_eq!(aggregate[0].slot, early);
    /// assert_eq!(aggregate[0].tally, Tally::new(0, 0, 1));
    /// assert_eq!(aggregate[1].tally, Tally::new(1, 1, 0));
    /// ```
    fn aggregate(self) -> Vec<AggregateSlot> {
        let tallies = self.fold(BTreeMap::new(), |mut acc, answer| {
            acc.entry(answer.slot)
                .or_insert_with(Tally::default)
                .record(answer.value);
            acc
        });

        trace!("aggregated {} distinct slots", tallies.len());

        into_slots(tallies)
    }
}

fn into_slots(tallies: BTreeMap<TimeSlot, Tally>) -> Vec<AggregateSlot> {
    tallies
        .into_iter()
        .map(|(slot, tally)| AggregateSlot { slot, tally })
        .collect()
}

/// Parallel form of [`Aggregate::aggregate`]; same output.
#[cfg(feature = "rayon")]
pub fn par_aggregate<'a, I>(answers: I) -> Vec<AggregateSlot>
where
    I: rayon::iter::IntoParallelIterator<Item = &'a Answer>,
{
    use rayon::prelude::*;

    let tallies = answers
        .into_par_iter()
        .fold(BTreeMap::new, |mut acc: BTreeMap<TimeSlot, Tally>, answer| {
            acc.entry(answer.slot)
                .or_insert_with(Tally::default)
                .record(answer.value);
            acc
        })
        .reduce(BTreeMap::new, |mut left, right| {
            for (slot, tally) in right {
                let merged = left.get(&slot).copied().unwrap_or_default().merge(tally);
                left.insert(slot, merged);
            }
            left
        });

    into_slots(tallies)
}
