use crate::time::TimeSlot;
use chrono::{Datelike, NaiveDate, TimeZone};
use serde::Serialize;
use std::fmt;

/// Slots starting on one local calendar date
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

impl fmt::Display for DayGroup {
    /// `D.M.YYYY`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.day.day(), self.day.month(), self.day.year())
    }
}

/// Buckets slots by the local date of their start in `tz`.
/// Days come out in order of first appearance and each day keeps the slots
/// in the order they were given.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use treffpunkt::group::group_by_day;
/// use treffpunkt::time::TimeSlot;
///
/// let day = 86_400;
/// let slots = vec![
///     TimeSlot::from_seconds(day + 3600, day + 5400).unwrap(),
///     TimeSlot::from_seconds(3600, 5400).unwrap(),
///     TimeSlot::from_seconds(day, day + 1800).unwrap(),
/// ];
///
/// let days = group_by_day(&slots, &Utc);
///
/// assert_eq!(days.len(), 2);
/// assert_eq!(days[0].to_string(), "2.1.1970");
/// assert_eq!(days[0].slots, vec![slots[0], slots[2]]);
/// assert_eq!(days[1].slots, vec![slots[1]]);
/// ```
pub fn group_by_day<'a, I, Tz>(slots: I, tz: &Tz) -> Vec<DayGroup>
where
    I: IntoIterator<Item = &'a TimeSlot>,
    Tz: TimeZone,
{
    slots.into_iter().fold(Vec::new(), |mut days, slot| {
        let day = slot.local_date(tz);

        match days.iter_mut().find(|group: &&mut DayGroup| group.day == day) {
            Some(group) => group.slots.push(*slot),
            None => days.push(DayGroup {
                day,
                slots: vec![*slot],
            }),
        }

        days
    })
}
