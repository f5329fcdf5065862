//! Configuration file, data file locations and environment secrets.
//!
//! Everything lives under `$XDG_CONFIG_HOME/courtside/` (falling back to
//! `~/.config/courtside/`): `config.json` for settings, `credentials.json` for the
//! encrypted vendor vault and `users.json` for local accounts. Files are read whole
//! and written whole; a missing or unreadable file means defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use courtside::config::{DEFAULT_CLUB_ID, DEFAULT_ZONE_TYPE_ID};
use courtside::protocol::endpoints::DEFAULT_BASE_URL;
use courtside::{ClientConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const CONFIG_SCHEMA: u32 = 1;

pub const ENCRYPTION_KEY_ENV: &str = "COURTSIDE_ENCRYPTION_KEY";
/// Older variable name, still honoured.
pub const LEGACY_ENCRYPTION_KEY_ENV: &str = "ENCRYPTION_KEY";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const USER_ENV: &str = "COURTSIDE_USER";
pub const PASSWORD_ENV: &str = "COURTSIDE_PASSWORD";

const APP_DIR: &str = "courtside";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
	pub schema: u32,
	pub vendor: VendorSettings,
	pub network: NetworkSettings,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default_user: Option<String>,
	/// Keep the vendor password in memory so a lapsed session renews itself.
	pub refreshable_sessions: bool,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			schema: CONFIG_SCHEMA,
			vendor: VendorSettings::default(),
			network: NetworkSettings::default(),
			default_user: None,
			refreshable_sessions: true,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VendorSettings {
	pub base_url: String,
	pub club_id: u32,
	pub zone_type_id: u32,
}

impl Default for VendorSettings {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			club_id: DEFAULT_CLUB_ID,
			zone_type_id: DEFAULT_ZONE_TYPE_ID,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkSettings {
	pub timeout_secs: u64,
	pub max_retries: u32,
	pub retry_delay_ms: u64,
	pub session_timeout_mins: u64,
	pub step_delay_ms: u64,
}

impl Default for NetworkSettings {
	fn default() -> Self {
		Self {
			timeout_secs: 30,
			max_retries: 3,
			retry_delay_ms: 1000,
			session_timeout_mins: 30,
			step_delay_ms: 500,
		}
	}
}

impl AppConfig {
	/// Settings for a [`courtside::Client`].
	pub fn client_config(&self) -> ClientConfig {
		let net = &self.network;
		ClientConfig::default()
			.with_base_url(&self.vendor.base_url)
			.with_club(self.vendor.club_id, self.vendor.zone_type_id)
			.with_request_timeout(Duration::from_secs(net.timeout_secs))
			.with_retry(RetryPolicy::new(net.max_retries, Duration::from_millis(net.retry_delay_ms)))
			.with_session_timeout(Duration::from_secs(net.session_timeout_mins.saturating_mul(60)))
			.with_step_delay(Duration::from_millis(net.step_delay_ms))
			.with_refreshable(self.refreshable_sessions)
	}
}

/// File locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
	pub config: PathBuf,
	pub credentials: PathBuf,
	pub users: PathBuf,
}

impl StatePaths {
	/// Default locations, or data files next to `config_override` when given.
	pub fn new(config_override: Option<&Path>) -> Self {
		match config_override {
			Some(config) => {
				let dir = config.parent().map(Path::to_path_buf).unwrap_or_default();
				Self::in_dir(&dir, config.to_path_buf())
			}
			None => {
				let dir = config_home().join(APP_DIR);
				Self::in_dir(&dir, dir.join("config.json"))
			}
		}
	}

	fn in_dir(dir: &Path, config: PathBuf) -> Self {
		Self {
			config,
			credentials: dir.join("credentials.json"),
			users: dir.join("users.json"),
		}
	}
}

fn config_home() -> PathBuf {
	std::env::var_os("XDG_CONFIG_HOME")
		.map(PathBuf::from)
		.or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
		.or_else(dirs::config_dir)
		.unwrap_or_else(|| PathBuf::from("."))
}

impl AppConfig {
	pub fn load(path: &Path) -> Self {
		match load_json::<AppConfig>(path) {
			Ok(config) => {
				debug!(target = "courtside_cli", path = %path.display(), "loaded config");
				config
			}
			Err(err) => {
				warn!(target = "courtside_cli", path = %path.display(), error = %err, "config unreadable, using defaults");
				Self::default()
			}
		}
	}

	pub fn save(&self, path: &Path) -> io::Result<()> {
		save_json(path, self)
	}
}

/// Loads `.env` from the working directory, if present.
pub fn load_dotenv() {
	match dotenvy::dotenv() {
		Ok(path) => debug!(target = "courtside_cli", path = %path.display(), "loaded .env"),
		Err(err) if err.not_found() => {}
		Err(err) => warn!(target = "courtside_cli", error = %err, "ignoring unreadable .env"),
	}
}

/// Vault key from the environment, preferring the namespaced variable.
pub fn encryption_key_from_env() -> Option<String> {
	[ENCRYPTION_KEY_ENV, LEGACY_ENCRYPTION_KEY_ENV]
		.iter()
		.filter_map(|name| std::env::var(name).ok())
		.map(|value| value.trim().to_string())
		.find(|value| !value.is_empty())
}

pub fn gemini_key_from_env() -> Option<String> {
	std::env::var(GEMINI_API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())
}

/// Reads a JSON file. A missing or malformed file yields `T::default()`; other
/// read failures are returned so callers never overwrite a file they could not read.
pub(crate) fn load_json<T: serde::de::DeserializeOwned + Default>(path: &Path) -> io::Result<T> {
	let content = match fs::read_to_string(path) {
		Ok(content) => content,
		Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
		Err(err) => return Err(err),
	};
	Ok(serde_json::from_str(&content).unwrap_or_else(|err| {
		warn!(target = "courtside_cli", path = %path.display(), error = %err, "ignoring malformed file");
		T::default()
	}))
}

pub(crate) fn save_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent)?;
	}
	let json = serde_json::to_string_pretty(data).map_err(io::Error::other)?;
	fs::write(path, json)
}

/// Like [`save_json`], readable by the owner only.
pub(crate) fn save_private_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
	save_json(path, data)?;
	#[cfg(unix)]
	{
		use std::os::unix::fs::PermissionsExt;
		fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
	}
	Ok(())
}
