use serde_json::{Value, json};

use crate::context::AppContext;
use crate::error::{CliError, Result};

pub fn register(ctx: &AppContext, name: &str, password: &str) -> Result<Value> {
	if name.trim().is_empty() {
		return Err(CliError::InvalidInput("user name must not be empty".into()));
	}
	if password.is_empty() {
		return Err(CliError::InvalidInput("password must not be empty".into()));
	}
	if !ctx.users().register(name, password)? {
		return Err(CliError::InvalidInput(format!("user {name} already exists")));
	}
	Ok(json!({ "user": name, "registered": true }))
}

pub fn verify(ctx: &AppContext, name: &str, password: &str) -> Result<Value> {
	let users = ctx.users();
	if !users.exists(name)? {
		return Err(CliError::UnknownUser(name.to_string()));
	}
	if !users.authenticate(name, password)? {
		return Err(CliError::BadPassword(name.to_string()));
	}
	Ok(json!({ "user": name, "verified": true }))
}

pub fn passwd(ctx: &AppContext, name: &str, old: &str, new: &str) -> Result<Value> {
	let users = ctx.users();
	if !users.exists(name)? {
		return Err(CliError::UnknownUser(name.to_string()));
	}
	if new.is_empty() {
		return Err(CliError::InvalidInput("new password must not be empty".into()));
	}
	if !users.change_password(name, old, new)? {
		return Err(CliError::BadPassword(name.to_string()));
	}
	Ok(json!({ "user": name, "changed": true }))
}
