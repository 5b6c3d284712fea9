use crate::error::ValidationError;
use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire representation of an instant
/// `seconds` since the Unix epoch plus a sub-second `nanoseconds` part
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanoseconds: u32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanoseconds: u32) -> Timestamp {
        Timestamp {
            seconds,
            nanoseconds,
        }
    }

    /// The whole-second instant of this timestamp.
    /// Sub-second nanoseconds are dropped.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt::time::Timestamp;
    ///
    /// let instant = Timestamp::new(1_700_000_000, 250_000_000).to_datetime().unwrap();
    ///
    /// assert_eq!(instant.timestamp(), 1_700_000_000);
    /// assert_eq!(instant.timestamp_subsec_nanos(), 0);
    /// ```
    pub fn to_datetime(self) -> Result<DateTime<Utc>, ValidationError> {
        DateTime::from_timestamp(self.seconds, 0).ok_or(ValidationError::OutOfRange {
            seconds: self.seconds,
        })
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Timestamp::new(instant.timestamp(), instant.timestamp_subsec_nanos())
    }
}

#[derive(Deserialize, Serialize)]
struct SlotDoc {
    start: Timestamp,
    end: Timestamp,
}

/// Candidate time interval `[start, end)` with whole-second instants.
/// Two slots are the same slot iff both instants are equal; overlap means nothing.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "SlotDoc", into = "SlotDoc")]
pub struct TimeSlot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeSlot {
    /// Construct a new TimeSlot
    /// Both instants are truncated to whole seconds, and the slot must not be empty.
    ///
    /// # Examples
    /// ```
    /// use chrono::DateTime;
    /// use treffpunkt::time::TimeSlot;
    ///
    /// let nine = DateTime::from_timestamp(32_400, 0).unwrap();
    /// let half_past = DateTime::from_timestamp(34_200, 0).unwrap();
    ///
    /// assert!(TimeSlot::new(nine, half_past).is_ok());
    /// assert!(TimeSlot::new(half_past, nine).is_err());
    /// assert!(TimeSlot::new(nine, nine).is_err());
    /// ```
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<TimeSlot, ValidationError> {
        let start = truncate(start)?;
        let end = truncate(end)?;

        if start >= end {
            return Err(ValidationError::EmptySlot {
                start: start.timestamp(),
                end: end.timestamp(),
            });
        }

        Ok(TimeSlot { start, end })
    }

    /// Convenience constructor from Unix seconds
    pub fn from_seconds(start: i64, end: i64) -> Result<TimeSlot, ValidationError> {
        TimeSlot::try_from(SlotDoc {
            start: Timestamp::new(start, 0),
            end: Timestamp::new(end, 0),
        })
    }

    pub fn start(self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(self) -> DateTime<Utc> {
        self.end
    }

    /// The join key between slot lists from different sources.
    /// Exact instant equality; no tolerance window.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt::time::TimeSlot;
    ///
    /// let a = TimeSlot::from_seconds(0, 1800).unwrap();
    /// let b = TimeSlot::from_seconds(0, 1800).unwrap();
    /// let overlapping = TimeSlot::from_seconds(0, 1799).unwrap();
    ///
    /// assert!(a.matches(&b));
    /// assert!(!a.matches(&overlapping));
    /// ```
    pub fn matches(&self, other: &TimeSlot) -> bool {
        self.start == other.start && self.end == other.end
    }

    /// Local calendar date of the slot's start
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.start.with_timezone(tz).date_naive()
    }

    /// `H:MM-H:MM` label in the given time zone
    pub fn display_in<Tz: TimeZone>(&self, tz: &Tz) -> String {
        let start = self.start.with_timezone(tz);
        let end = self.end.with_timezone(tz);
        format!(
            "{}:{:02}-{}:{:02}",
            start.hour(),
            start.minute(),
            end.hour(),
            end.minute()
        )
    }
}

/// Free-standing form of [`TimeSlot::matches`]
pub fn matches(a: &TimeSlot, b: &TimeSlot) -> bool {
    a.matches(b)
}

fn truncate(instant: DateTime<Utc>) -> Result<DateTime<Utc>, ValidationError> {
    Timestamp::from(instant).to_datetime()
}

impl TryFrom<SlotDoc> for TimeSlot {
    type Error = ValidationError;

    fn try_from(doc: SlotDoc) -> Result<Self, Self::Error> {
        TimeSlot::new(doc.start.to_datetime()?, doc.end.to_datetime()?)
    }
}

impl From<TimeSlot> for SlotDoc {
    fn from(slot: TimeSlot) -> Self {
        SlotDoc {
            start: slot.start.into(),
            end: slot.end.into(),
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for TimeSlot {
    // Quarter-hour grid over a couple of days so that fuzzed answers collide often
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let start = i64::from(u.arbitrary::<u8>()?) * 900;
        let length = i64::from(u.int_in_range(1..=8_u8)?) * 900;
        TimeSlot::from_seconds(start, start + length)
            .map_err(|_| arbitrary::Error::IncorrectFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serde_json::json;

    #[test]
    fn deserializes_wire_timestamps() {
        let slot: TimeSlot = serde_json::from_value(json!({
            "start": { "seconds": 32_400, "nanoseconds": 0 },
            "end": { "seconds": 34_200, "nanoseconds": 0 },
        }))
        .unwrap();

        assert_eq!(slot, TimeSlot::from_seconds(32_400, 34_200).unwrap());
    }

    #[test]
    fn sub_second_noise_still_matches() {
        let stored: TimeSlot = serde_json::from_value(json!({
            "start": { "seconds": 60, "nanoseconds": 123_000_000 },
            "end": { "seconds": 120, "nanoseconds": 0 },
        }))
        .unwrap();

        assert!(stored.matches(&TimeSlot::from_seconds(60, 120).unwrap()));
    }

    #[test]
    fn rejects_inverted_slot_on_the_wire() {
        let result: Result<TimeSlot, _> = serde_json::from_value(json!({
            "start": { "seconds": 120, "nanoseconds": 0 },
            "end": { "seconds": 60, "nanoseconds": 0 },
        }));

        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_end() {
        let result: Result<TimeSlot, _> = serde_json::from_value(json!({
            "start": { "seconds": 120, "nanoseconds": 0 },
        }));

        assert!(result.is_err());
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let slot = TimeSlot::from_seconds(0, 60).unwrap();

        assert_eq!(
            serde_json::to_value(slot).unwrap(),
            json!({
                "start": { "seconds": 0, "nanoseconds": 0 },
                "end": { "seconds": 60, "nanoseconds": 0 },
            })
        );
    }

    #[test]
    fn local_date_follows_time_zone() {
        // 1970-01-01 23:30 UTC
        let slot = TimeSlot::from_seconds(84_600, 86_400).unwrap();
        let east = FixedOffset::east_opt(2 * 3600).unwrap();

        assert_eq!(
            slot.local_date(&Utc),
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
        );
        assert_eq!(
            slot.local_date(&east),
            NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()
        );
    }

    #[test]
    fn display_in_pads_minutes() {
        let slot = TimeSlot::from_seconds(9 * 3600, 9 * 3600 + 5 * 60).unwrap();

        assert_eq!(slot.display_in(&Utc), "9:00-9:05");
    }
}
