//! Session endpoint exchange.

use serde::{Deserialize, Serialize};

/// Body posted to [`LOGIN`](crate::endpoints::LOGIN).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
	#[serde(rename = "RememberMe")]
	pub remember_me: bool,
	/// Account identity (the member's email address).
	#[serde(rename = "Login")]
	pub login: String,
	#[serde(rename = "Password")]
	pub password: String,
}

impl LoginRequest {
	pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			remember_me: false,
			login: login.into(),
			password: password.into(),
		}
	}
}

/// Successful login body. Every level is optional because the vendor answers
/// some failed logins with HTTP 200 and an unrelated payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
	#[serde(rename = "User", default, skip_serializing_if = "Option::is_none")]
	pub user: Option<UserEnvelope>,
}

impl LoginResponse {
	/// Returns the nested member record when the response has the expected shape.
	pub fn member(&self) -> Option<&Member> {
		self.user.as_ref()?.member.as_ref()
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserEnvelope {
	#[serde(rename = "Member", default, skip_serializing_if = "Option::is_none")]
	pub member: Option<Member>,
}

/// Member record returned inside a login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
	#[serde(rename = "Id")]
	pub id: i64,
	#[serde(rename = "Email")]
	pub email: String,
	#[serde(rename = "FirstName", default)]
	pub first_name: String,
	#[serde(rename = "LastName", default)]
	pub last_name: String,
}

impl Member {
	pub fn display_name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name).trim().to_string()
	}
}
