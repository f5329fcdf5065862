//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;

use crate::client::Client;
use crate::config::ClientConfig;
use crate::retry::RetryPolicy;
use crate::transport::{BoxFut, Transport, TransportError, VendorRequest, VendorResponse};

pub(crate) type Reply = Result<VendorResponse, TransportError>;

/// Answers requests from a fixed script and records what was sent.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
	replies: Mutex<VecDeque<Reply>>,
	sent: Mutex<Vec<VendorRequest>>,
}

impl ScriptedTransport {
	pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
		Self {
			replies: Mutex::new(replies.into_iter().collect()),
			sent: Mutex::new(Vec::new()),
		}
	}

	pub fn sent(&self) -> Vec<VendorRequest> {
		self.sent.lock().clone()
	}
}

impl Transport for ScriptedTransport {
	fn send<'a>(&'a self, request: &'a VendorRequest) -> BoxFut<'a, Reply> {
		Box::pin(async move {
			self.sent.lock().push(request.clone());
			let next = self.replies.lock().pop_front();
			next.unwrap_or_else(|| Err(TransportError::Other("script exhausted".into())))
		})
	}
}

pub(crate) fn fast_config() -> ClientConfig {
	ClientConfig::default()
		.with_base_url("http://vendor.test")
		.with_retry(RetryPolicy::new(3, Duration::from_millis(1)))
		.with_step_delay(Duration::ZERO)
}

pub(crate) fn client(replies: impl IntoIterator<Item = Reply>) -> Client<ScriptedTransport> {
	Client::with_transport(fast_config(), ScriptedTransport::new(replies))
}

pub(crate) fn status(code: u16) -> Reply {
	Ok(VendorResponse::new(code, ""))
}

pub(crate) fn json(code: u16, body: serde_json::Value) -> Reply {
	Ok(VendorResponse::new(code, body.to_string()))
}

pub(crate) fn login_ok(token: &str) -> Reply {
	let body = serde_json::json!({
		"User": { "Member": { "Id": 42, "Email": "ada@example.com", "FirstName": "Ada", "LastName": "Lovelace" } }
	});
	Ok(VendorResponse::new(200, body.to_string()).with_cookie(courtside_protocol::SESSION_COOKIE, token))
}
