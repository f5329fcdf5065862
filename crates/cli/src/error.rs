use std::path::PathBuf;

use thiserror::Error;

use crate::output::{CommandError, ErrorCode};
use crate::users::UserStoreError;
use crate::vault::VaultError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	/// Neither `--user`, `COURTSIDE_USER` nor `defaultUser` named a local user.
	#[error("no user selected: pass --user NAME or set defaultUser in the config")]
	NoUser,

	#[error("unknown user: {0}")]
	UnknownUser(String),

	/// Local account password did not verify.
	#[error("wrong password for {0}")]
	BadPassword(String),

	/// The vault key is not configured.
	#[error("no encryption key configured: run `courtside key generate` and export it as COURTSIDE_ENCRYPTION_KEY")]
	MissingKey,

	#[error("no vendor credentials stored for {0}: run `courtside creds set`")]
	NoCredentials(String),

	/// The vendor refused the stored or supplied login.
	#[error("vendor login failed: {0}")]
	LoginFailed(String),

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("failed to write {path}: {source}")]
	WriteFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Vendor(#[from] courtside::Error),

	#[error(transparent)]
	Vault(#[from] VaultError),

	#[error(transparent)]
	Users(#[from] UserStoreError),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl CliError {
	pub fn code(&self) -> ErrorCode {
		match self {
			CliError::NoUser | CliError::InvalidInput(_) => ErrorCode::InvalidInput,
			CliError::UnknownUser(_) | CliError::BadPassword(_) | CliError::LoginFailed(_) => ErrorCode::AuthError,
			CliError::MissingKey | CliError::NoCredentials(_) => ErrorCode::ConfigError,
			CliError::WriteFile { .. } | CliError::Io(_) => ErrorCode::IoError,
			CliError::Vendor(err) => vendor_code(err),
			CliError::Vault(VaultError::InvalidKey(_) | VaultError::Decrypt) => ErrorCode::ConfigError,
			CliError::Vault(VaultError::Read { .. } | VaultError::Write { .. })
			| CliError::Users(UserStoreError::Read { .. } | UserStoreError::Write { .. }) => ErrorCode::IoError,
			CliError::Vault(_) | CliError::Users(_) | CliError::Json(_) => ErrorCode::InternalError,
		}
	}

	pub fn to_command_error(&self) -> CommandError {
		let details = match self {
			CliError::Vendor(courtside::Error::Status { operation, status, .. }) => {
				Some(serde_json::json!({ "operation": operation, "status": status }))
			}
			CliError::Vendor(courtside::Error::Unreachable { attempts, .. }) => Some(serde_json::json!({ "attempts": attempts })),
			_ => None,
		};
		CommandError {
			code: self.code(),
			message: self.to_string(),
			details,
		}
	}
}

fn vendor_code(err: &courtside::Error) -> ErrorCode {
	use courtside::Error;

	match err {
		Error::Unreachable { .. } => ErrorCode::NetworkError,
		Error::SessionExpired => ErrorCode::SessionError,
		Error::NotLoggedIn => ErrorCode::AuthError,
		e if e.is_auth() => ErrorCode::AuthError,
		Error::Status { .. } | Error::UnexpectedResponse { .. } | Error::Json(_) => ErrorCode::VendorError,
		Error::InvalidArgument(_) => ErrorCode::InvalidInput,
		Error::ClientSetup(_) => ErrorCode::ConfigError,
	}
}
