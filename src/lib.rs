pub mod aggregate;
pub mod calendar;
pub mod error;
pub mod group;
pub mod proposal;
pub mod response;
pub mod score;
pub mod store;
pub mod time;
pub mod vote;
pub mod watch;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use aggregate::{Aggregate, AggregateSlot, Tally};
pub use error::{DocumentError, FlowError, StoreError, ValidationError};
pub use proposal::{Proposal, ProposalView};
pub use response::{submit, Responses, Submission};
pub use score::{percentage, Rgb, ScoredSlot};
pub use store::{DocumentStore, MemoryStore};
pub use time::{TimeSlot, Timestamp};
pub use vote::{Answer, AnswerSheet, Vote};
