// Anthropic API key storage
//
// The key lives in the platform credential store (macOS Keychain, Windows
// Credential Manager, Linux kernel keyring) and never in a config file.
// `seedgenie key set|delete|status` manages it; `--use-keychain` reads it.

use keyring::Entry;
use tracing::{debug, info};

use crate::error::CredentialError;

const SERVICE_NAME: &str = "com.seedgenie.app";
const API_KEY_NAME: &str = "anthropic_api_key";

pub struct CredentialManager;

impl CredentialManager {
    /// Check the key format without touching the keychain
    pub fn validate_api_key(key: &str) -> Result<(), CredentialError> {
        if !key.starts_with("sk-ant-") {
            return Err(CredentialError::InvalidFormat(
                "Anthropic API keys should start with 'sk-ant-'",
            ));
        }

        if key.len() < 20 {
            return Err(CredentialError::InvalidFormat(
                "API key appears too short. Please check and try again.",
            ));
        }

        Ok(())
    }

    /// Store the API key in the OS keychain
    pub fn store_api_key(key: &str) -> Result<(), CredentialError> {
        let key = key.trim();
        Self::validate_api_key(key)?;

        Entry::new(SERVICE_NAME, API_KEY_NAME)?.set_password(key)?;

        info!("API key stored in keychain");
        Ok(())
    }

    /// Retrieve the API key from the OS keychain
    pub fn retrieve_api_key() -> Result<Option<String>, CredentialError> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_NAME)?;

        match entry.get_password() {
            Ok(key) => {
                debug!(length = key.len(), "API key retrieved from keychain");
                Ok(Some(key))
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No API key found in keychain");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the API key from the OS keychain; deleting nothing is fine
    pub fn delete_api_key() -> Result<(), CredentialError> {
        match Entry::new(SERVICE_NAME, API_KEY_NAME)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if an API key is stored (without returning it)
    pub fn has_api_key() -> Result<bool, CredentialError> {
        Ok(Self::retrieve_api_key()?.is_some())
    }
}
