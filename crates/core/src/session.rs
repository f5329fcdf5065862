//! Authenticated session state.
//!
//! A session is valid while it holds a token and the last vendor response arrived
//! within the inactivity timeout. Token and identity are set together by a
//! successful login; activity is only recorded once a session exists.

use std::fmt;
use std::time::{Duration, Instant};

use courtside_protocol::Member;
use serde::Serialize;

/// Member the session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
	pub user_id: i64,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
}

impl Identity {
	pub fn display_name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name).trim().to_string()
	}
}

impl From<&Member> for Identity {
	fn from(member: &Member) -> Self {
		Self {
			user_id: member.id,
			email: member.email.clone(),
			first_name: member.first_name.clone(),
			last_name: member.last_name.clone(),
		}
	}
}

/// Login pair kept for silent re-authentication.
#[derive(Clone)]
pub(crate) struct RefreshCredentials {
	pub login: String,
	pub secret: String,
}

impl fmt::Debug for RefreshCredentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RefreshCredentials")
			.field("login", &self.login)
			.field("secret", &"<redacted>")
			.finish()
	}
}

#[derive(Debug)]
pub struct Session {
	token: Option<String>,
	identity: Option<Identity>,
	refresh: Option<RefreshCredentials>,
	last_activity: Option<Instant>,
	timeout: Duration,
	refreshable: bool,
}

impl Session {
	pub fn new(timeout: Duration, refreshable: bool) -> Self {
		Self {
			token: None,
			identity: None,
			refresh: None,
			last_activity: None,
			timeout,
			refreshable,
		}
	}

	pub fn token(&self) -> Option<&str> {
		self.token.as_deref()
	}

	pub fn identity(&self) -> Option<&Identity> {
		self.identity.as_ref()
	}

	pub fn last_activity(&self) -> Option<Instant> {
		self.last_activity
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// True once a login has succeeded, even if the session has since lapsed.
	pub fn is_established(&self) -> bool {
		self.identity.is_some()
	}

	pub fn is_valid(&self) -> bool {
		self.is_valid_at(Instant::now())
	}

	pub fn is_valid_at(&self, now: Instant) -> bool {
		if self.token.is_none() {
			return false;
		}
		self.last_activity.is_some_and(|last| now.saturating_duration_since(last) <= self.timeout)
	}

	/// Whether a lapsed session can be renewed without the caller.
	pub fn can_refresh(&self) -> bool {
		self.refresh.is_some()
	}

	pub(crate) fn refresh_credentials(&self) -> Option<RefreshCredentials> {
		self.refresh.clone()
	}

	pub(crate) fn establish(&mut self, token: String, identity: Identity, login: &str, secret: &str) {
		self.token = Some(token);
		self.identity = Some(identity);
		self.refresh = self.refreshable.then(|| RefreshCredentials {
			login: login.to_string(),
			secret: secret.to_string(),
		});
		self.last_activity = Some(Instant::now());
	}

	/// Records vendor activity. Ignored before the first login.
	pub(crate) fn touch(&mut self) {
		self.touch_at(Instant::now());
	}

	pub(crate) fn touch_at(&mut self, now: Instant) {
		if self.is_established() {
			self.last_activity = Some(now);
		}
	}

	/// Drops the cached secret; the session keeps working until it lapses.
	pub fn forget_secret(&mut self) {
		self.refresh = None;
	}

	/// Resets to the logged-out state, secret included.
	pub fn clear(&mut self) {
		self.token = None;
		self.identity = None;
		self.refresh = None;
		self.last_activity = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn identity() -> Identity {
		Identity {
			user_id: 7,
			email: "ada@example.com".into(),
			first_name: "Ada".into(),
			last_name: "Lovelace".into(),
		}
	}

	#[test]
	fn fresh_session_is_invalid_and_ignores_activity() {
		let mut session = Session::new(Duration::from_secs(60), true);
		assert!(!session.is_valid());
		session.touch();
		assert!(session.last_activity().is_none());
		assert!(!session.is_valid());
	}

	#[test]
	fn established_session_expires_after_inactivity() {
		let mut session = Session::new(Duration::from_secs(60), true);
		session.establish("tok".into(), identity(), "ada@example.com", "pw");
		let start = session.last_activity().unwrap();

		assert!(session.is_valid_at(start));
		assert!(session.is_valid_at(start + Duration::from_secs(60)));
		assert!(!session.is_valid_at(start + Duration::from_secs(61)));

		session.touch_at(start + Duration::from_secs(50));
		assert!(session.is_valid_at(start + Duration::from_secs(100)));
	}

	#[test]
	fn secret_is_cached_only_when_refreshable() {
		let mut refreshable = Session::new(Duration::from_secs(60), true);
		refreshable.establish("tok".into(), identity(), "ada@example.com", "pw");
		assert!(refreshable.can_refresh());
		assert_eq!(refreshable.refresh_credentials().unwrap().secret, "pw");

		let mut fixed = Session::new(Duration::from_secs(60), false);
		fixed.establish("tok".into(), identity(), "ada@example.com", "pw");
		assert!(!fixed.can_refresh());
		assert!(fixed.is_valid());
	}

	#[test]
	fn clear_purges_everything() {
		let mut session = Session::new(Duration::from_secs(60), true);
		session.establish("tok".into(), identity(), "ada@example.com", "pw");
		session.clear();
		assert!(session.token().is_none());
		assert!(session.identity().is_none());
		assert!(session.last_activity().is_none());
		assert!(!session.can_refresh());
	}

	#[test]
	fn debug_output_redacts_secret() {
		let creds = RefreshCredentials {
			login: "ada@example.com".into(),
			secret: "hunter2".into(),
		};
		let printed = format!("{creds:?}");
		assert!(!printed.contains("hunter2"));
		assert!(printed.contains("redacted"));
	}
}
