//! Natural-language intent contract.
//!
//! The assistant front end asks an external language model to classify a free-text
//! message and answer with an [`IntentReply`]. The reply is untrusted: callers must
//! validate `date` and `time` before use.

use serde::{Deserialize, Serialize};

/// What the user asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Intent {
	CheckAvailability,
	Book,
	Help,
	Greeting,
	#[default]
	Unknown,
}

impl Intent {
	pub fn as_str(&self) -> &'static str {
		match self {
			Intent::CheckAvailability => "check_availability",
			Intent::Book => "book",
			Intent::Help => "help",
			Intent::Greeting => "greeting",
			Intent::Unknown => "unknown",
		}
	}

	/// Intents that need a schedule lookup.
	pub fn wants_schedule(&self) -> bool {
		matches!(self, Intent::CheckAvailability | Intent::Book)
	}
}

impl From<String> for Intent {
	fn from(value: String) -> Self {
		match value.trim().to_ascii_lowercase().as_str() {
			"check_availability" => Intent::CheckAvailability,
			"book" => Intent::Book,
			"help" => Intent::Help,
			"greeting" => Intent::Greeting,
			_ => Intent::Unknown,
		}
	}
}

impl std::fmt::Display for Intent {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Structured reply expected from the language model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentReply {
	#[serde(default)]
	pub intent: Intent,
	/// `YYYY-MM-DD` or absent.
	#[serde(default)]
	pub date: Option<String>,
	/// `HH:MM` or absent.
	#[serde(default)]
	pub time: Option<String>,
	#[serde(default)]
	pub friendly_response: Option<String>,
}

impl IntentReply {
	/// Reply used whenever the upstream parse cannot be trusted.
	pub fn unknown(message: impl Into<String>) -> Self {
		let message = message.into();
		Self {
			intent: Intent::Unknown,
			date: None,
			time: None,
			friendly_response: (!message.is_empty()).then_some(message),
		}
	}

	pub fn message(&self) -> Option<&str> {
		self.friendly_response.as_deref().filter(|m| !m.trim().is_empty())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
	User,
	Assistant,
}

/// One conversation turn passed to the parser as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
	pub role: ChatRole,
	pub content: String,
}

impl ChatTurn {
	pub fn user(content: impl Into<String>) -> Self {
		Self {
			role: ChatRole::User,
			content: content.into(),
		}
	}

	pub fn assistant(content: impl Into<String>) -> Self {
		Self {
			role: ChatRole::Assistant,
			content: content.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unrecognised_intent_becomes_unknown() {
		let reply: IntentReply = serde_json::from_str(r#"{"intent":"cancel_everything","date":null}"#).unwrap();
		assert_eq!(reply.intent, Intent::Unknown);
	}

	#[test]
	fn intent_serializes_snake_case() {
		let json = serde_json::to_string(&Intent::CheckAvailability).unwrap();
		assert_eq!(json, r#""check_availability""#);
	}

	#[test]
	fn full_reply_parses() {
		let reply: IntentReply = serde_json::from_str(
			r#"{"intent":"book","date":"2025-10-10","time":"18:00","friendly_response":"Sure!"}"#,
		)
		.unwrap();
		assert_eq!(reply.intent, Intent::Book);
		assert!(reply.intent.wants_schedule());
		assert_eq!(reply.date.as_deref(), Some("2025-10-10"));
		assert_eq!(reply.message(), Some("Sure!"));
	}

	#[test]
	fn blank_message_is_treated_as_absent() {
		let reply = IntentReply::unknown("");
		assert!(reply.message().is_none());
		assert_eq!(IntentReply::unknown("sorry").message(), Some("sorry"));
	}
}
