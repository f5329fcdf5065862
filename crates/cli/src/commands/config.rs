use serde_json::{Value, json};

use crate::config::{AppConfig, encryption_key_from_env, gemini_key_from_env};
use crate::context::AppContext;
use crate::error::{CliError, Result};

pub fn show(ctx: &AppContext) -> Result<Value> {
	Ok(json!({
		"path": ctx.paths.config,
		"exists": ctx.paths.config.exists(),
		"config": ctx.config,
		"user": ctx.user(),
		"credentialsFile": ctx.paths.credentials,
		"usersFile": ctx.paths.users,
		"encryptionKeySet": encryption_key_from_env().is_some(),
		"assistantEnabled": gemini_key_from_env().is_some(),
	}))
}

pub fn init(ctx: &AppContext, force: bool) -> Result<Value> {
	let path = &ctx.paths.config;
	if path.exists() && !force {
		return Err(CliError::InvalidInput(format!("{} already exists (use --force to overwrite)", path.display())));
	}
	let config = AppConfig::default();
	config.save(path).map_err(|source| CliError::WriteFile {
		path: path.clone(),
		source,
	})?;
	Ok(json!({ "path": path, "written": true, "config": config }))
}
