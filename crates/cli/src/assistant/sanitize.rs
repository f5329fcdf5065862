//! Cleanup and validation of language model replies.

use std::sync::LazyLock;

use chrono::NaiveDate;
use courtside::protocol::IntentReply;
use regex_lite::Regex;
use tracing::{debug, warn};

/// Shown when the model answered with something that is not the JSON reply shape.
pub const UNPARSEABLE_REPLY: &str = "Sorry, I had trouble understanding that. Could you rephrase it?";

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").unwrap());
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap());

/// Removes a surrounding markdown code fence, with or without a language tag.
pub fn strip_code_fences(text: &str) -> &str {
	let text = text.trim();
	match FENCE_RE.captures(text).and_then(|c| c.get(1)) {
		Some(inner) => inner.as_str(),
		None => text,
	}
}

/// Parses raw model text into a validated reply; never fails.
pub fn parse_model_output(text: &str) -> IntentReply {
	let body = strip_code_fences(text);
	match serde_json::from_str::<IntentReply>(body) {
		Ok(reply) => sanitize(reply),
		Err(err) => {
			warn!(target = "courtside_cli", error = %err, "model reply is not valid JSON");
			debug!(target = "courtside_cli", raw = body, "raw model reply");
			IntentReply::unknown(UNPARSEABLE_REPLY)
		}
	}
}

/// Drops `date` and `time` values that are not well formed.
pub fn sanitize(mut reply: IntentReply) -> IntentReply {
	reply.date = reply.date.and_then(|d| valid_date(&d));
	reply.time = reply.time.and_then(|t| valid_time(&t));
	reply
}

fn valid_date(raw: &str) -> Option<String> {
	let raw = raw.trim();
	match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
		Ok(date) => Some(date.format("%Y-%m-%d").to_string()),
		Err(_) => {
			debug!(target = "courtside_cli", date = raw, "discarding malformed date");
			None
		}
	}
}

fn valid_time(raw: &str) -> Option<String> {
	let caps = TIME_RE.captures(raw.trim())?;
	let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
	let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
	(hour < 24 && minute < 60).then(|| format!("{hour:02}:{minute:02}"))
}
