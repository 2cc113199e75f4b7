//! Canned responses for targeted and broadcast replies.

mod canned;

pub use canned::{CannedResponses, GLOBAL_FALLBACK_RESPONSE};
