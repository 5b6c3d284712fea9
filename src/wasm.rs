use crate::proposal::Proposal;
use crate::score::score_all;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Flattened records serialize as maps; they have to reach JS as plain objects
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer)?)
}

/// Scores a stored proposal document for the browser.
/// Takes the document as read from the store and returns the scored slots,
/// ordered by `(start, end)`, each as a flat object
/// `{ start, end, yes, no, maybe, percentage, color, label }`.
#[wasm_bindgen]
pub fn tally(document: JsValue) -> Result<JsValue, JsValue> {
    let proposal: Proposal = serde_wasm_bindgen::from_value(document)?;
    let scored = score_all(&proposal.aggregate());

    to_js(&scored)
}

/// Cycles a vote as the vote button does
#[wasm_bindgen(js_name = nextVote)]
pub fn next_vote(vote: JsValue) -> Result<JsValue, JsValue> {
    let vote: crate::vote::Vote = serde_wasm_bindgen::from_value(vote)?;

    to_js(&vote.next())
}
