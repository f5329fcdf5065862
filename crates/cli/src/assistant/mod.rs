//! Natural-language front end: intent parsing, slot formatting and chat replies.

pub mod format;
pub mod gemini;
pub mod prompt;
pub mod responder;
pub mod sanitize;

use courtside::protocol::{ChatTurn, IntentReply};
use courtside::transport::BoxFut;

pub use format::{format_duration, format_schedule, format_slots};
pub use gemini::GeminiParser;
pub use responder::{ChatReply, ChatResponder, SlotLookup, VendorLookup};

/// Turns free text into a structured intent.
///
/// Implementations never fail: anything that goes wrong upstream comes back as an
/// [`Intent::Unknown`](courtside::protocol::Intent::Unknown) reply.
pub trait IntentParser: Send + Sync {
	fn parse<'a>(&'a self, text: &'a str, history: &'a [ChatTurn]) -> BoxFut<'a, IntentReply>;
}
