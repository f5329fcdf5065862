use serde_json::{Value, json};
use tracing::info;

use crate::context::{AppContext, login};
use crate::error::{CliError, Result};
use crate::vault::VendorCredentials;

/// Stores the vendor login, checking it against the vendor first unless told not to.
pub async fn set(ctx: &AppContext, email: &str, password: &str, verify: bool) -> Result<Value> {
	let user = ctx.require_user()?;
	if !ctx.users().exists(user)? {
		return Err(CliError::UnknownUser(user.to_string()));
	}
	if email.trim().is_empty() || password.is_empty() {
		return Err(CliError::InvalidInput("email and password are required".into()));
	}
	let vault = ctx.vault()?;

	if verify {
		let creds = VendorCredentials {
			email: email.to_string(),
			password: password.to_string(),
		};
		let mut client = ctx.client()?;
		login(&mut client, &creds).await?;
		client.logout().await;
	}

	vault.save(user, email, password)?;
	info!(target = "courtside_cli", user, verified = verify, "stored vendor credentials");
	Ok(json!({ "user": user, "email": email, "verified": verify, "stored": true }))
}

pub fn show(ctx: &AppContext) -> Result<Value> {
	let user = ctx.require_user()?;
	let creds = ctx.credentials()?;
	Ok(json!({ "user": user, "email": creds.email, "password": "********" }))
}

pub fn remove(ctx: &AppContext) -> Result<Value> {
	let user = ctx.require_user()?;
	let removed = ctx.vault()?.delete(user)?;
	Ok(json!({ "user": user, "removed": removed }))
}
