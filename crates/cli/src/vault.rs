//! Encrypted store of vendor logins, keyed by local user.
//!
//! `credentials.json` maps each user to `{ "email", "password" }` where the password
//! is `base64(nonce || AES-256-GCM ciphertext)` with a fresh 96-bit nonce per value.
//! The file is rewritten whole on every change, so concurrent writers can lose updates.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::{load_json, save_private_json};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum VaultError {
	/// Key is not base64 or not 32 bytes long.
	#[error("invalid encryption key: {0}")]
	InvalidKey(String),

	/// The OS random source failed.
	#[error("random number generator unavailable: {0}")]
	Random(String),

	#[error("encryption failed")]
	Encrypt,

	/// Wrong key or tampered ciphertext.
	#[error("stored password could not be decrypted (wrong encryption key?)")]
	Decrypt,

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

pub type Result<T> = std::result::Result<T, VaultError>;

/// 256-bit vault key.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultKey([u8; KEY_LEN]);

impl VaultKey {
	pub fn generate() -> Result<Self> {
		let mut bytes = [0u8; KEY_LEN];
		getrandom::getrandom(&mut bytes).map_err(|e| VaultError::Random(e.to_string()))?;
		Ok(Self(bytes))
	}

	pub fn from_base64(encoded: &str) -> Result<Self> {
		let bytes = general_purpose::STANDARD
			.decode(encoded.trim())
			.map_err(|e| VaultError::InvalidKey(e.to_string()))?;
		let bytes: [u8; KEY_LEN] = bytes
			.try_into()
			.map_err(|b: Vec<u8>| VaultError::InvalidKey(format!("expected {KEY_LEN} bytes, got {}", b.len())))?;
		Ok(Self(bytes))
	}

	pub fn to_base64(&self) -> String {
		general_purpose::STANDARD.encode(self.0)
	}
}

impl fmt::Debug for VaultKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("VaultKey(..)")
	}
}

/// Decrypted vendor login.
#[derive(Clone, PartialEq, Eq)]
pub struct VendorCredentials {
	pub email: String,
	pub password: String,
}

impl fmt::Debug for VendorCredentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("VendorCredentials")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredentials {
	email: String,
	password: String,
}

pub struct CredentialVault {
	path: PathBuf,
	cipher: Aes256Gcm,
}

impl fmt::Debug for CredentialVault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CredentialVault").field("path", &self.path).finish_non_exhaustive()
	}
}

impl CredentialVault {
	pub fn open(path: impl Into<PathBuf>, key: &VaultKey) -> Self {
		let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));
		Self { path: path.into(), cipher }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Stores (or replaces) `user`'s vendor login.
	pub fn save(&self, user: &str, email: &str, password: &str) -> Result<()> {
		let mut all = self.load_all()?;
		all.insert(
			user.to_string(),
			StoredCredentials {
				email: email.to_string(),
				password: self.encrypt(password)?,
			},
		);
		self.store_all(&all)?;
		debug!(target = "courtside_cli", user, "saved vendor credentials");
		Ok(())
	}

	/// `Ok(None)` when nothing is stored for `user`.
	pub fn get(&self, user: &str) -> Result<Option<VendorCredentials>> {
		let Some(stored) = self.load_all()?.remove(user) else {
			return Ok(None);
		};
		Ok(Some(VendorCredentials {
			email: stored.email,
			password: self.decrypt(&stored.password)?,
		}))
	}

	pub fn has(&self, user: &str) -> Result<bool> {
		Ok(self.load_all()?.contains_key(user))
	}

	/// Returns whether anything was removed.
	pub fn delete(&self, user: &str) -> Result<bool> {
		let mut all = self.load_all()?;
		if all.remove(user).is_none() {
			return Ok(false);
		}
		self.store_all(&all)?;
		Ok(true)
	}

	pub fn encrypt(&self, plaintext: &str) -> Result<String> {
		let mut nonce_bytes = [0u8; NONCE_LEN];
		getrandom::getrandom(&mut nonce_bytes).map_err(|e| VaultError::Random(e.to_string()))?;
		let ciphertext = self
			.cipher
			.encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
			.map_err(|_| VaultError::Encrypt)?;

		let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
		combined.extend_from_slice(&nonce_bytes);
		combined.extend_from_slice(&ciphertext);
		Ok(general_purpose::STANDARD.encode(combined))
	}

	pub fn decrypt(&self, encoded: &str) -> Result<String> {
		let combined = general_purpose::STANDARD.decode(encoded).map_err(|_| VaultError::Decrypt)?;
		if combined.len() <= NONCE_LEN {
			return Err(VaultError::Decrypt);
		}
		let (nonce, ciphertext) = combined.split_at(NONCE_LEN);
		let plaintext = self
			.cipher
			.decrypt(Nonce::from_slice(nonce), ciphertext)
			.map_err(|_| VaultError::Decrypt)?;
		String::from_utf8(plaintext).map_err(|_| VaultError::Decrypt)
	}

	fn load_all(&self) -> Result<BTreeMap<String, StoredCredentials>> {
		load_json(&self.path).map_err(|source| VaultError::Read {
			path: self.path.clone(),
			source,
		})
	}

	fn store_all(&self, all: &BTreeMap<String, StoredCredentials>) -> Result<()> {
		save_private_json(&self.path, all).map_err(|source| VaultError::Write {
			path: self.path.clone(),
			source,
		})
	}
}
