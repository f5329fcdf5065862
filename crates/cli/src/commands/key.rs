use serde_json::{Value, json};

use crate::config::ENCRYPTION_KEY_ENV;
use crate::error::Result;
use crate::vault::VaultKey;

pub fn generate() -> Result<Value> {
	let key = VaultKey::generate()?.to_base64();
	Ok(json!({
		"key": key,
		"env": ENCRYPTION_KEY_ENV,
		"hint": format!("add `{ENCRYPTION_KEY_ENV}={key}` to your environment or .env file"),
	}))
}
