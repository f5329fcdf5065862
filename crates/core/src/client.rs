//! The vendor client.
//!
//! Operations are spread over several modules as separate `impl` blocks:
//! login and logout in `auth`, the retry executor in
//! [`retry`](crate::retry), availability in [`schedule`](crate::schedule), and
//! the booking wizard in [`booking`](crate::booking).

use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::transport::{HttpTransport, Transport};

/// Client for a single vendor account.
///
/// Calls take `&mut self`, so one client serves one caller at a time. The session
/// and its cookie jar belong to the client and are never shared.
#[derive(Debug)]
pub struct Client<T = HttpTransport> {
	pub(crate) config: ClientConfig,
	pub(crate) transport: T,
	pub(crate) session: Session,
}

impl Client<HttpTransport> {
	/// Builds a client backed by [`HttpTransport`].
	pub fn new(config: ClientConfig) -> Result<Self> {
		config.validate()?;
		let transport = HttpTransport::new(config.request_timeout)?;
		Ok(Self::with_transport(config, transport))
	}
}

impl<T: Transport> Client<T> {
	pub fn with_transport(config: ClientConfig, transport: T) -> Self {
		let session = Session::new(config.session_timeout, config.refreshable);
		Self {
			config,
			transport,
			session,
		}
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Drops the cached login secret without ending the session.
	pub fn forget_secret(&mut self) {
		self.session.forget_secret();
	}

	/// Makes sure a valid session exists before an authenticated call.
	///
	/// A lapsed session is renewed with the cached secret when one exists. Renewal
	/// failure is reported as [`Error::SessionExpired`]; no session at all is
	/// [`Error::NotLoggedIn`].
	pub async fn ensure_session(&mut self) -> Result<()> {
		if self.session.is_valid() {
			return Ok(());
		}

		let Some(creds) = self.session.refresh_credentials() else {
			return Err(if self.session.is_established() {
				Error::SessionExpired
			} else {
				Error::NotLoggedIn
			});
		};

		info!(target = "courtside", "session lapsed, logging in again");
		match self.try_login(&creds.login, &creds.secret).await {
			Ok(_) => Ok(()),
			Err(err) => {
				warn!(target = "courtside", error = %err, "silent re-login failed");
				Err(Error::SessionExpired)
			}
		}
	}

	/// Waits between booking wizard steps.
	pub(crate) async fn pace(&self) {
		if !self.config.step_delay.is_zero() {
			debug!(target = "courtside", delay_ms = self.config.step_delay.as_millis() as u64, "pausing between wizard steps");
			tokio::time::sleep(self.config.step_delay).await;
		}
	}
}
