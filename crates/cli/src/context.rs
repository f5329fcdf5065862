//! Per-invocation state shared by commands.

use courtside::Client;
use tracing::{debug, info};

use crate::config::{AppConfig, StatePaths, encryption_key_from_env};
use crate::error::{CliError, Result};
use crate::users::UserStore;
use crate::vault::{CredentialVault, VaultKey, VendorCredentials};

#[derive(Debug)]
pub struct AppContext {
	pub paths: StatePaths,
	pub config: AppConfig,
	user: Option<String>,
}

impl AppContext {
	pub fn new(paths: StatePaths, config: AppConfig, user: Option<String>) -> Self {
		let user = user.or_else(|| config.default_user.clone()).filter(|u| !u.trim().is_empty());
		Self { paths, config, user }
	}

	pub fn user(&self) -> Option<&str> {
		self.user.as_deref()
	}

	pub fn require_user(&self) -> Result<&str> {
		self.user().ok_or(CliError::NoUser)
	}

	pub fn users(&self) -> UserStore {
		UserStore::open(&self.paths.users)
	}

	/// Opens the vault with the key from the environment.
	pub fn vault(&self) -> Result<CredentialVault> {
		let encoded = encryption_key_from_env().ok_or(CliError::MissingKey)?;
		let key = VaultKey::from_base64(&encoded)?;
		Ok(CredentialVault::open(&self.paths.credentials, &key))
	}

	pub fn credentials(&self) -> Result<VendorCredentials> {
		let user = self.require_user()?;
		self.vault()?.get(user)?.ok_or_else(|| CliError::NoCredentials(user.to_string()))
	}

	pub fn client(&self) -> Result<Client> {
		Ok(Client::new(self.config.client_config())?)
	}

	/// Client logged in with the current user's stored credentials.
	pub async fn logged_in_client(&self) -> Result<Client> {
		let creds = self.credentials()?;
		let mut client = self.client()?;
		login(&mut client, &creds).await?;
		Ok(client)
	}
}

/// Logs in, telling a rejected login apart from an unreachable vendor.
pub async fn login(client: &mut Client, creds: &VendorCredentials) -> Result<()> {
	debug!(target = "courtside_cli", email = %creds.email, "logging in to vendor");
	match client.try_login(&creds.email, &creds.password).await {
		Ok(identity) => {
			info!(target = "courtside_cli", member = identity.user_id, "vendor login ok");
			Ok(())
		}
		Err(err) if err.is_unreachable() => Err(err.into()),
		Err(err) => Err(CliError::LoginFailed(err.to_string())),
	}
}
