//! Intent parsing through the Gemini `generateContent` API.

use std::time::Duration;

use chrono::Local;
use courtside::protocol::{ChatTurn, IntentReply};
use courtside::transport::BoxFut;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::IntentParser;
use super::prompt::build_prompt;
use super::sanitize::parse_model_output;

pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Shown when the model could not be asked at all.
pub const UNAVAILABLE_REPLY: &str = "Sorry, the assistant is unavailable right now. Please try again in a moment.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GeminiParser {
	http: reqwest::Client,
	api_key: Option<String>,
	endpoint: String,
}

impl GeminiParser {
	/// A parser without a key answers every message with an empty `unknown` reply.
	pub fn new(api_key: Option<String>) -> Self {
		let http = reqwest::Client::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.unwrap_or_else(|_| reqwest::Client::new());
		Self {
			http,
			api_key,
			endpoint: GEMINI_ENDPOINT.to_string(),
		}
	}

	pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = endpoint.into();
		self
	}

	pub fn is_enabled(&self) -> bool {
		self.api_key.is_some()
	}

	async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, String> {
		let response = self
			.http
			.post(&self.endpoint)
			.query(&[("key", api_key)])
			.json(&request_body(prompt))
			.send()
			.await
			.map_err(|e| e.to_string())?;

		let status = response.status();
		let body: Value = response.json().await.map_err(|e| e.to_string())?;
		if !status.is_success() {
			let message = body["error"]["message"].as_str().unwrap_or("no error message");
			return Err(format!("HTTP {}: {message}", status.as_u16()));
		}
		candidate_text(&body).ok_or_else(|| "response has no candidate text".to_string())
	}
}

impl IntentParser for GeminiParser {
	fn parse<'a>(&'a self, text: &'a str, history: &'a [ChatTurn]) -> BoxFut<'a, IntentReply> {
		Box::pin(async move {
			let Some(api_key) = &self.api_key else {
				return IntentReply::unknown("");
			};
			let prompt = build_prompt(text, history, Local::now().date_naive());
			match self.generate(api_key, &prompt).await {
				Ok(raw) => {
					let reply = parse_model_output(&raw);
					debug!(target = "courtside_cli", intent = %reply.intent, date = ?reply.date, time = ?reply.time, "parsed message");
					reply
				}
				Err(err) => {
					warn!(target = "courtside_cli", error = %err, "intent parsing failed");
					IntentReply::unknown(UNAVAILABLE_REPLY)
				}
			}
		})
	}
}

fn request_body(prompt: &str) -> Value {
	json!({
		"contents": [{ "parts": [{ "text": prompt }] }],
		"generationConfig": {
			"temperature": 0.7,
			"topP": 0.95,
			"topK": 40,
			"maxOutputTokens": 500
		}
	})
}

fn candidate_text(body: &Value) -> Option<String> {
	let parts = body["candidates"][0]["content"]["parts"].as_array()?;
	let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
	(!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
	use courtside::protocol::Intent;

	use super::*;

	#[tokio::test]
	async fn parser_without_key_is_disabled() {
		let parser = GeminiParser::new(None);
		assert!(!parser.is_enabled());
		let reply = parser.parse("hello", &[]).await;
		assert_eq!(reply.intent, Intent::Unknown);
		assert!(reply.message().is_none());
	}

	#[tokio::test]
	async fn unreachable_service_degrades_to_apology() {
		let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);

		let parser = GeminiParser::new(Some("k".into())).with_endpoint(format!("http://{addr}/generate"));
		let reply = parser.parse("courts friday?", &[]).await;
		assert_eq!(reply.intent, Intent::Unknown);
		assert_eq!(reply.message(), Some(UNAVAILABLE_REPLY));
	}

	#[test]
	fn request_carries_generation_settings() {
		let body = request_body("hi");
		assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
		assert_eq!(body["generationConfig"]["topK"], 40);
		assert_eq!(body["generationConfig"]["maxOutputTokens"], 500);
	}

	#[test]
	fn candidate_text_joins_parts() {
		let body = json!({ "candidates": [{ "content": { "parts": [{ "text": "{\"intent\":" }, { "text": "\"help\"}" }] } }] });
		assert_eq!(candidate_text(&body).as_deref(), Some("{\"intent\":\"help\"}"));
		assert!(candidate_text(&json!({ "candidates": [] })).is_none());
		assert!(candidate_text(&json!({ "promptFeedback": { "blockReason": "SAFETY" } })).is_none());
	}
}
