//! Login and logout.

use courtside_protocol::{LoginRequest, LoginResponse, SESSION_COOKIE, endpoints};
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::session::Identity;
use crate::transport::{Transport, VendorRequest};

impl<T: Transport> Client<T> {
	/// Logs in, returning false on any failure. The cause is logged.
	pub async fn login(&mut self, login: &str, secret: &str) -> bool {
		match self.try_login(login, secret).await {
			Ok(identity) => {
				info!(target = "courtside", user_id = identity.user_id, name = %identity.display_name(), "logged in");
				true
			}
			Err(err) => {
				warn!(target = "courtside", error = %err, "login failed");
				false
			}
		}
	}

	/// Logs in and establishes the session.
	///
	/// Success needs HTTP 200, a member record under `User.Member`, and the session
	/// cookie. Anything else leaves the session unchanged.
	pub async fn try_login(&mut self, login: &str, secret: &str) -> Result<Identity> {
		let request = VendorRequest::post(self.config.endpoint(endpoints::LOGIN)).json(&LoginRequest::new(login, secret))?;
		let response = self.run(request, false).await.into_result("login")?;
		if response.status != 200 {
			return Err(Error::Status {
				operation: "login",
				status: response.status,
				body: response.body,
			});
		}

		let body: LoginResponse = response
			.json()
			.map_err(|e| Error::unexpected("login", format!("body is not JSON: {e}")))?;
		let Some(member) = body.member() else {
			return Err(Error::unexpected("login", "no User.Member record"));
		};
		let Some(token) = response.cookie(SESSION_COOKIE) else {
			return Err(Error::unexpected("login", format!("no {SESSION_COOKIE} cookie")));
		};

		let identity = Identity::from(member);
		self.session.establish(token.to_string(), identity.clone(), login, secret);
		Ok(identity)
	}

	/// Ends the session. The vendor call is best-effort; local state is always cleared.
	pub async fn logout(&mut self) {
		if self.session.token().is_some() {
			let request = VendorRequest::post(self.config.endpoint(endpoints::LOGOUT));
			let outcome = self.run(request, false).await;
			debug!(target = "courtside", succeeded = outcome.succeeded, status = ?outcome.status(), "logout");
		}
		self.session.clear();
		info!(target = "courtside", "logged out");
	}
}
