//! Retry executor.
//!
//! Every vendor call goes through [`Client::execute`]. Network failures are retried
//! with linear backoff; a rejected session triggers one silent re-login per
//! remaining attempt; any other status is returned to the caller untouched.

use std::time::Duration;

use tracing::{debug, warn};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::transport::{BoxFut, Transport, TransportError, VendorRequest, VendorResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Total attempts per call, including the first. Zero behaves as one.
	pub max_retries: u32,
	/// Base delay; attempt `n` waits `n * retry_delay` before the next try.
	pub retry_delay: Duration,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_retries: 3,
			retry_delay: Duration::from_secs(1),
		}
	}
}

impl RetryPolicy {
	pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
		Self { max_retries, retry_delay }
	}

	pub fn max_attempts(&self) -> u32 {
		self.max_retries.max(1)
	}

	/// Delay after failed attempt `attempt` (1-based).
	pub fn delay_for(&self, attempt: u32) -> Duration {
		self.retry_delay.saturating_mul(attempt)
	}
}

/// Result of [`Client::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOutcome {
	/// True only for a 2xx response.
	pub succeeded: bool,
	/// Last response received; `None` when the vendor never answered.
	pub response: Option<VendorResponse>,
	pub attempts: u32,
	/// Last network failure, when no response was obtained.
	pub error: Option<TransportError>,
}

impl RetryOutcome {
	pub fn status(&self) -> Option<u16> {
		self.response.as_ref().map(|r| r.status)
	}

	/// Converts to a typed result, naming `operation` in the error.
	pub fn into_result(self, operation: &'static str) -> Result<VendorResponse> {
		match self.response {
			Some(response) if self.succeeded => Ok(response),
			Some(response) => Err(Error::Status {
				operation,
				status: response.status,
				body: response.body,
			}),
			None => Err(Error::Unreachable {
				attempts: self.attempts,
				reason: self.error.map_or_else(|| "no response".to_string(), |e| e.to_string()),
			}),
		}
	}
}

impl<T: Transport> Client<T> {
	/// Sends `request` with retries, re-authenticating on 401/403 when possible.
	pub async fn execute(&mut self, request: VendorRequest) -> RetryOutcome {
		self.run(request, true).await
	}

	pub(crate) async fn run(&mut self, mut request: VendorRequest, reauth: bool) -> RetryOutcome {
		let policy = self.config.retry;
		let max_attempts = policy.max_attempts();
		let mut last_error = None;
		let mut attempt = 0;

		while attempt < max_attempts {
			attempt += 1;
			request.bearer = self.session.token().map(str::to_owned);
			debug!(target = "courtside", method = request.method.as_str(), url = %request.url, attempt, "vendor request");

			match self.transport.send(&request).await {
				Ok(response) => {
					self.session.touch();
					if response.is_success() {
						return RetryOutcome {
							succeeded: true,
							response: Some(response),
							attempts: attempt,
							error: None,
						};
					}

					let renewable = reauth && response.is_auth_failure() && attempt < max_attempts && self.session.can_refresh();
					if renewable {
						warn!(target = "courtside", status = response.status, "session rejected, logging in again");
						if self.refresh().await {
							continue;
						}
					}

					debug!(target = "courtside", status = response.status, attempt, "vendor returned failure status");
					return RetryOutcome {
						succeeded: false,
						response: Some(response),
						attempts: attempt,
						error: None,
					};
				}
				Err(err) => {
					warn!(target = "courtside", attempt, max_attempts, error = %err, "vendor request failed");
					last_error = Some(err);
					if attempt < max_attempts {
						tokio::time::sleep(policy.delay_for(attempt)).await;
					}
				}
			}
		}

		RetryOutcome {
			succeeded: false,
			response: None,
			attempts: attempt,
			error: last_error,
		}
	}

	/// Re-login with the cached secret. Boxed because login itself runs through
	/// [`run`](Self::run).
	fn refresh(&mut self) -> BoxFut<'_, bool> {
		Box::pin(async move {
			let Some(creds) = self.session.refresh_credentials() else {
				return false;
			};
			match self.try_login(&creds.login, &creds.secret).await {
				Ok(_) => true,
				Err(err) => {
					warn!(target = "courtside", error = %err, "re-login after rejected session failed");
					false
				}
			}
		})
	}
}
