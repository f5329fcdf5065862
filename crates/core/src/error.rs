//! Error types for vendor operations.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the vendor.
#[derive(Debug, Error)]
pub enum Error {
	/// No response could be obtained after every retry attempt.
	#[error("Vendor unreachable after {attempts} attempt(s): {reason}")]
	Unreachable { attempts: u32, reason: String },

	/// The vendor answered, but not with a success status.
	#[error("{operation} failed with HTTP {status}")]
	Status {
		operation: &'static str,
		status: u16,
		/// Raw response body, kept for diagnostics.
		body: String,
	},

	/// A success response did not have the structure the operation relies on.
	#[error("Unexpected response from {operation}: {detail}")]
	UnexpectedResponse { operation: &'static str, detail: String },

	/// The session lapsed and the silent re-login did not succeed.
	#[error("Session expired. Log in again.")]
	SessionExpired,

	/// An authenticated operation was attempted without ever logging in.
	#[error("Not logged in")]
	NotLoggedIn,

	/// Caller supplied an unusable value.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// The HTTP client could not be constructed.
	#[error("HTTP client setup failed: {0}")]
	ClientSetup(String),

	/// JSON serialization error while building a request.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	pub(crate) fn unexpected(operation: &'static str, detail: impl Into<String>) -> Self {
		Error::UnexpectedResponse {
			operation,
			detail: detail.into(),
		}
	}

	/// Returns true for failures caused by missing or lapsed authentication.
	pub fn is_auth(&self) -> bool {
		match self {
			Error::SessionExpired | Error::NotLoggedIn => true,
			Error::Status { status, .. } => matches!(status, 401 | 403),
			_ => false,
		}
	}

	/// Returns true when the vendor could not be reached at all.
	pub fn is_unreachable(&self) -> bool {
		matches!(self, Error::Unreachable { .. })
	}

	/// HTTP status carried by the error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Error::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn auth_classification() {
		assert!(Error::SessionExpired.is_auth());
		assert!(Error::NotLoggedIn.is_auth());
		let forbidden = Error::Status {
			operation: "schedule",
			status: 403,
			body: String::new(),
		};
		assert!(forbidden.is_auth());
		assert_eq!(forbidden.status(), Some(403));
		assert!(!Error::unexpected("login", "no member").is_auth());
	}

	#[test]
	fn status_message_names_operation() {
		let err = Error::Status {
			operation: "start booking",
			status: 500,
			body: "boom".into(),
		};
		assert_eq!(err.to_string(), "start booking failed with HTTP 500");
	}
}
