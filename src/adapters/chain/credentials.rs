//! Signing Credentials — Wallet Key and Sender Account
//!
//! Loads the transaction-signing key and sender address from
//! environment variables (PRIVATE_KEY, ACCOUNT). These MUST be set in
//! the environment (never committed to git, never placed in
//! config.toml). Read once at process start; a missing or malformed
//! value aborts startup before any price check runs.

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use tracing::warn;

/// Signing credentials for swap submission.
pub struct ChainCredentials {
    /// Local signer built from PRIVATE_KEY.
    signer: PrivateKeySigner,
    /// Sender address from ACCOUNT, used as the transaction `from`.
    account: Address,
}

impl ChainCredentials {
    /// Load credentials from environment variables.
    ///
    /// Required env vars: PRIVATE_KEY (hex-encoded secp256k1 key),
    /// ACCOUNT (0x-prefixed sender address).
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("PRIVATE_KEY").context("PRIVATE_KEY not set")?;
        let signer: PrivateKeySigner = key
            .trim_start_matches("0x")
            .parse()
            .context("PRIVATE_KEY is not a valid secp256k1 key")?;

        let account_str = std::env::var("ACCOUNT").context("ACCOUNT not set")?;
        let account: Address = account_str
            .parse()
            .context("ACCOUNT is not a valid address")?;

        if signer.address() != account {
            warn!(
                key_address = %signer.address(),
                account = %account,
                "ACCOUNT does not match the PRIVATE_KEY address; transactions are signed by the key"
            );
        }

        Ok(Self { signer, account })
    }

    /// Sender address for transaction `from` fields.
    pub fn account(&self) -> Address {
        self.account
    }

    /// Build the alloy wallet used by the provider's signing filler.
    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}
