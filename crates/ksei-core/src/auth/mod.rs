//! Authentication module for the AKSes login protocol and token lifecycle.
//!
//! This module provides:
//! - `CredentialManager`: challenge/login protocol with a single-flight,
//!   expiry-aware token cache
//! - `Credential` and `peek_expiry`: bearer tokens and their JWT expiry
//! - `Identity`: the account being logged in
//! - `Keychain`: OS-level password storage via keyring

pub mod challenge;
pub mod error;
pub mod identity;
pub mod keychain;
pub mod manager;
pub mod token;

pub use error::AuthError;
pub use identity::Identity;
pub use keychain::Keychain;
pub use manager::CredentialManager;
pub use token::{peek_expiry, Credential};
