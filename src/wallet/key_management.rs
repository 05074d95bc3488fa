// src/wallet/key_management.rs
//! Client-side key management for registry callers.
//!
//! Every mutating request names its caller in `x-caller` and proves it with
//! an EIP-191 personal signature in `x-signature`. The signed message binds
//! the HTTP method, the path and the issue time in `x-timestamp` (Unix
//! milliseconds) to the body:
//!
//! ```text
//! <METHOD> <PATH>\n<timestamp>\n<body bytes>
//! ```
//!
//! The server only accepts a signed message once, and only while its
//! timestamp is fresh.

use chrono::Utc;
use ethers::signers::{LocalWallet, Signer, WalletError};
use ethers::types::{Address, Signature};
use ethers::utils::hash_message;

/// Header naming the calling principal.
pub const CALLER_HEADER: &str = "x-caller";
/// Header carrying the hex-encoded signature.
pub const SIGNATURE_HEADER: &str = "x-signature";
/// Header carrying the signing time in Unix milliseconds.
pub const TIMESTAMP_HEADER: &str = "x-timestamp";

/// Bytes a caller signs for one request issued at `timestamp` (Unix ms).
pub fn signing_payload(method: &str, path: &str, timestamp: i64, body: &[u8]) -> Vec<u8> {
    let mut payload =
        format!("{} {}\n{}\n", method.to_ascii_uppercase(), path, timestamp).into_bytes();
    payload.extend_from_slice(body);
    payload
}

/// Header values for a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub caller: String,
    pub timestamp: String,
    pub signature: String,
}

/// Holds a caller's secp256k1 key and signs registry requests with it.
#[derive(Clone, Debug)]
pub struct KeyManager {
    wallet: LocalWallet,
}

impl KeyManager {
    /// Wraps an existing wallet.
    pub fn new(wallet: LocalWallet) -> Self {
        KeyManager { wallet }
    }

    /// Parses a hex private key, with or without the `0x` prefix.
    pub fn from_private_key(key: &str) -> Result<Self, WalletError> {
        Ok(KeyManager { wallet: key.parse()? })
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// EIP-191 signature over `message`.
    pub fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        self.wallet.sign_hash(hash_message(message))
    }

    /// Produces the authentication header values for a request sent now.
    pub fn sign_request(&self, method: &str, path: &str, body: &[u8]) -> Result<SignedHeaders, WalletError> {
        self.sign_request_at(method, path, Utc::now().timestamp_millis(), body)
    }

    /// Like [`sign_request`](Self::sign_request) with an explicit issue time.
    pub fn sign_request_at(
        &self,
        method: &str,
        path: &str,
        timestamp: i64,
        body: &[u8],
    ) -> Result<SignedHeaders, WalletError> {
        let signature = self.sign_message(&signing_payload(method, path, timestamp, body))?;
        Ok(SignedHeaders {
            caller: format!("0x{:x}", self.address()),
            timestamp: timestamp.to_string(),
            signature: format!("0x{}", signature),
        })
    }
}
