//! Client configuration.

use std::time::Duration;

use courtside_protocol::endpoints::DEFAULT_BASE_URL;
use url::Url;

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// Default club identifier.
pub const DEFAULT_CLUB_ID: u32 = 1;

/// Default facility zone type (courts).
pub const DEFAULT_ZONE_TYPE_ID: u32 = 28;

/// Settings shared by every operation of a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
	/// Portal origin, without trailing slash.
	pub base_url: String,
	pub club_id: u32,
	pub zone_type_id: u32,
	/// Per-request network timeout.
	pub request_timeout: Duration,
	pub retry: RetryPolicy,
	/// Inactivity after which the session is treated as expired.
	pub session_timeout: Duration,
	/// Pause between booking wizard steps.
	pub step_delay: Duration,
	/// Whether the login secret is cached in memory for silent re-login.
	pub refreshable: bool,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			club_id: DEFAULT_CLUB_ID,
			zone_type_id: DEFAULT_ZONE_TYPE_ID,
			request_timeout: Duration::from_secs(30),
			retry: RetryPolicy::default(),
			session_timeout: Duration::from_secs(30 * 60),
			step_delay: Duration::from_millis(500),
			refreshable: true,
		}
	}
}

impl ClientConfig {
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into().trim_end_matches('/').to_string();
		self
	}

	pub fn with_club(mut self, club_id: u32, zone_type_id: u32) -> Self {
		self.club_id = club_id;
		self.zone_type_id = zone_type_id;
		self
	}

	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
		self.retry = retry;
		self
	}

	pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
		self.session_timeout = timeout;
		self
	}

	pub fn with_step_delay(mut self, delay: Duration) -> Self {
		self.step_delay = delay;
		self
	}

	pub fn with_refreshable(mut self, refreshable: bool) -> Self {
		self.refreshable = refreshable;
		self
	}

	/// Checks that the base URL is an absolute http(s) origin.
	pub fn validate(&self) -> Result<()> {
		let url = Url::parse(&self.base_url).map_err(|e| Error::InvalidArgument(format!("base URL '{}': {e}", self.base_url)))?;
		match url.scheme() {
			"http" | "https" => Ok(()),
			other => Err(Error::InvalidArgument(format!("base URL scheme '{other}' is not http(s)"))),
		}
	}

	/// Absolute URL for a vendor path.
	pub fn endpoint(&self, path: &str) -> String {
		format!("{}{}", self.base_url.trim_end_matches('/'), path)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_vendor_portal() {
		let config = ClientConfig::default();
		assert_eq!(config.base_url, "https://statesportcentres.perfectgym.com.au");
		assert_eq!(config.club_id, 1);
		assert_eq!(config.zone_type_id, 28);
		assert_eq!(config.retry.max_retries, 3);
		assert_eq!(config.session_timeout, Duration::from_secs(1800));
		assert!(config.refreshable);
	}

	#[test]
	fn endpoint_joins_without_double_slash() {
		let config = ClientConfig::default().with_base_url("http://127.0.0.1:9000/");
		assert_eq!(config.endpoint("/Api/Users/Logout"), "http://127.0.0.1:9000/Api/Users/Logout");
	}

	#[test]
	fn validate_rejects_non_http_urls() {
		assert!(ClientConfig::default().validate().is_ok());
		assert!(ClientConfig::default().with_base_url("ftp://example.com").validate().is_err());
		assert!(ClientConfig::default().with_base_url("not a url").validate().is_err());
	}
}
