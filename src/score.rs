use crate::aggregate::{AggregateSlot, Tally};
use crate::time::TimeSlot;
use num::Float;
use serde::Serialize;
use std::fmt;

const RED: [f64; 3] = [239.0, 68.0, 68.0];
const AMBER: [f64; 3] = [234.0, 179.0, 8.0];
const GREEN: [f64; 3] = [34.0, 197.0, 94.0];

/// Consensus score in `[0, 1]`, a maybe counting as half a yes.
/// `None` when nobody answered.
///
/// # Examples
/// ```
/// use treffpunkt::aggregate::Tally;
/// use treffpunkt::score::percentage;
///
/// assert_eq!(percentage(&Tally::new(0, 0, 2)), Some(0.5));
/// assert_eq!(percentage(&Tally::new(2, 0, 0)), Some(1.0));
/// assert_eq!(percentage(&Tally::new(0, 2, 0)), Some(0.0));
/// assert_eq!(percentage(&Tally::new(1, 0, 1)), Some(0.75));
/// assert_eq!(percentage(&Tally::default()), None);
/// ```
pub fn percentage(tally: &Tally) -> Option<f64> {
    let total = tally.total();
    if total == 0 {
        return None;
    }

    Some((f64::from(tally.yes) + f64::from(tally.maybe) / 2.0) / f64::from(total))
}

fn lerp<F: Float>(start: F, end: F, t: F) -> F {
    (F::one() - t) * start + t * end
}

fn channel(value: f64) -> u8 {
    num::clamp(value.round(), 0.0, 255.0) as u8
}

#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    /// Red through amber to green.
    /// Both halves interpolate with the raw percentage as `t`: below 0.5 from
    /// red towards amber, from 0.5 on from amber towards green.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt::score::Rgb;
    ///
    /// assert_eq!(Rgb::from_percentage(0.0), Rgb::new(239, 68, 68));
    /// assert_eq!(Rgb::from_percentage(1.0), Rgb::new(34, 197, 94));
    /// assert_eq!(Rgb::from_percentage(0.5).to_string(), "rgb(134,188,51)");
    /// ```
    pub fn from_percentage(percentage: f64) -> Rgb {
        let (from, to) = if percentage < 0.5 {
            (RED, AMBER)
        } else {
            (AMBER, GREEN)
        };

        Rgb {
            r: channel(lerp(from[0], to[0], percentage)),
            g: channel(lerp(from[1], to[1], percentage)),
            b: channel(lerp(from[2], to[2], percentage)),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Yes count, then `+maybe` when there are maybes
pub fn label(tally: &Tally) -> String {
    if tally.maybe > 0 {
        format!("{}+{}", tally.yes, tally.maybe)
    } else {
        tally.yes.to_string()
    }
}

/// A scored aggregate record, ready for display
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScoredSlot {
    #[serde(flatten)]
    pub slot: TimeSlot,
    #[serde(flatten)]
    pub tally: Tally,
    pub percentage: f64,
    pub color: Rgb,
    pub label: String,
}

impl ScoredSlot {
    /// `None` for a record nobody answered
    pub fn score(aggregate: &AggregateSlot) -> Option<ScoredSlot> {
        let percentage = percentage(&aggregate.tally)?;

        Some(ScoredSlot {
            slot: aggregate.slot,
            tally: aggregate.tally,
            percentage,
            color: Rgb::from_percentage(percentage),
            label: label(&aggregate.tally),
        })
    }
}

/// Scores every answered record, in input order
pub fn score_all(aggregates: &[AggregateSlot]) -> Vec<ScoredSlot> {
    aggregates.iter().filter_map(ScoredSlot::score).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(yes: u32, no: u32, maybe: u32) -> AggregateSlot {
        AggregateSlot {
            slot: TimeSlot::from_seconds(0, 60).unwrap(),
            tally: Tally::new(yes, no, maybe),
        }
    }

    #[test]
    fn half_for_split_votes() {
        assert_eq!(percentage(&Tally::new(1, 1, 0)), Some(0.5));
        assert_eq!(percentage(&Tally::new(1, 2, 1)), Some(0.375));
    }

    #[test]
    fn color_segments_are_kept_apart() {
        // The lower segment never reaches the upper segment's value at 0.5
        let below = Rgb::from_percentage(0.4);
        let at = Rgb::from_percentage(0.5);

        assert_eq!(below, Rgb::new(237, 112, 44));
        assert_eq!(at, Rgb::new(134, 188, 51));
    }

    #[test]
    fn color_at_quarter() {
        // r: .75 * 239 + .25 * 234, g: .75 * 68 + .25 * 179, b: .75 * 68 + .25 * 8
        assert_eq!(Rgb::from_percentage(0.25), Rgb::new(238, 96, 53));
    }

    #[test]
    fn labels() {
        assert_eq!(label(&Tally::new(2, 1, 0)), "2");
        assert_eq!(label(&Tally::new(1, 0, 1)), "1+1");
        assert_eq!(label(&Tally::new(0, 3, 0)), "0");
    }

    #[test]
    fn score_skips_unanswered_records() {
        let scored = score_all(&[record(0, 0, 0), record(1, 0, 1)]);

        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].percentage, 0.75);
        assert_eq!(scored[0].label, "1+1");
    }

    #[test]
    fn scored_slot_serializes_flat() {
        let scored = ScoredSlot::score(&record(2, 0, 0)).unwrap();
        let value = serde_json::to_value(&scored).unwrap();

        assert_eq!(value["yes"], 2);
        assert_eq!(value["start"]["seconds"], 0);
        assert_eq!(value["percentage"], 1.0);
        assert_eq!(value["color"]["g"], 197);
    }

    #[test]
    fn scored_slot_is_one_flat_object() {
        let scored = score_all(&[record(1, 1, 1)]);
        let value = serde_json::to_value(&scored).unwrap();

        let object = value[0].as_object().unwrap();
        let mut keys = object.keys().map(String::as_str).collect::<Vec<_>>();
        keys.sort_unstable();

        assert_eq!(
            keys,
            vec!["color", "end", "label", "maybe", "no", "percentage", "start", "yes"]
        );
        assert_eq!(value[0]["color"], serde_json::json!({ "r": 134, "g": 188, "b": 51 }));
    }
}
