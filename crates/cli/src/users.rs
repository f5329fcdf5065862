//! Local accounts that own vendor credentials in the vault.
//!
//! `users.json` maps user names to `{ "password_hash": "<argon2 PHC string>" }`.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{load_json, save_json};

const SALT_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum UserStoreError {
	#[error("password hashing failed: {0}")]
	Hash(String),

	/// The OS random source failed.
	#[error("random number generator unavailable: {0}")]
	Random(String),

	#[error("failed to read {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("failed to write {path}: {source}")]
	Write {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
	password_hash: String,
}

#[derive(Debug, Clone)]
pub struct UserStore {
	path: PathBuf,
}

impl UserStore {
	pub fn open(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Creates `user`; `Ok(false)` when the name is taken.
	pub fn register(&self, user: &str, password: &str) -> Result<bool, UserStoreError> {
		let mut users = self.load()?;
		if users.contains_key(user) {
			return Ok(false);
		}
		users.insert(
			user.to_string(),
			UserRecord {
				password_hash: hash_password(password)?,
			},
		);
		self.store(&users)?;
		debug!(target = "courtside_cli", user, "registered local user");
		Ok(true)
	}

	pub fn authenticate(&self, user: &str, password: &str) -> Result<bool, UserStoreError> {
		Ok(self
			.load()?
			.get(user)
			.is_some_and(|record| verify_password(password, &record.password_hash)))
	}

	pub fn exists(&self, user: &str) -> Result<bool, UserStoreError> {
		Ok(self.load()?.contains_key(user))
	}

	/// `Ok(false)` when `old` does not authenticate.
	pub fn change_password(&self, user: &str, old: &str, new: &str) -> Result<bool, UserStoreError> {
		if !self.authenticate(user, old)? {
			return Ok(false);
		}
		let mut users = self.load()?;
		users.insert(
			user.to_string(),
			UserRecord {
				password_hash: hash_password(new)?,
			},
		);
		self.store(&users)?;
		Ok(true)
	}

	fn load(&self) -> Result<BTreeMap<String, UserRecord>, UserStoreError> {
		load_json(&self.path).map_err(|source| UserStoreError::Read {
			path: self.path.clone(),
			source,
		})
	}

	fn store(&self, users: &BTreeMap<String, UserRecord>) -> Result<(), UserStoreError> {
		save_json(&self.path, users).map_err(|source| UserStoreError::Write {
			path: self.path.clone(),
			source,
		})
	}
}

fn hash_password(password: &str) -> Result<String, UserStoreError> {
	let mut salt = [0u8; SALT_LEN];
	getrandom::getrandom(&mut salt).map_err(|e| UserStoreError::Random(e.to_string()))?;
	let salt = SaltString::encode_b64(&salt).map_err(|e| UserStoreError::Hash(e.to_string()))?;
	Argon2::default()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| UserStoreError::Hash(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> bool {
	match PasswordHash::new(stored) {
		Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
		Err(err) => {
			warn!(target = "courtside_cli", error = %err, "unreadable password hash");
			false
		}
	}
}
