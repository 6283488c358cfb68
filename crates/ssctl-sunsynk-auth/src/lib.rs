// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sunsynk cloud credential exchange.
//!
//! Logging in to the Sunsynk API is a two-request handshake:
//!
//! 1. **Public key**: `GET /anonymous/publicKey?source=sunsynk&nonce=<ms>&sign=<md5>`
//!    returns a bare base64 RSA public key.
//! 2. **Token**: the password is encrypted under that key (PKCS#1 v1.5) and
//!    `POST /oauth/token/new` exchanges it for a bearer token.
//!
//! Both requests carry a millisecond nonce and an MD5 signature. The two
//! signatures use different suffixes; see [`signature`].
//!
//! # Example
//!
//! ```rust,no_run
//! use ssctl_common_secret::SecretString;
//! use ssctl_sunsynk_auth::{AuthConfig, AuthHandshake};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handshake = AuthHandshake::new(AuthConfig::default())?;
//! let password = SecretString::from("hunter2");
//! let token = handshake
//! 	.login("installer@example.com", &password, &CancellationToken::new())
//! 	.await?;
//! println!("expires in {}s", token.expires_in);
//! # Ok(())
//! # }
//! ```
//!
//! Nothing here prints, persists or retries. Storing the token is the
//! caller's job.

pub mod config;
pub mod encrypt;
pub mod error;
pub mod handshake;
pub mod nonce;
pub mod public_key;
pub mod signature;
pub mod token;

pub use config::{AuthConfig, AuthConfigError, DEFAULT_API_ENDPOINT};
pub use encrypt::{decode_public_key, encrypt_password, EncryptedCredential};
pub use error::AuthError;
pub use handshake::AuthHandshake;
pub use nonce::{Nonce, NonceClock, SystemClock};
pub use public_key::PublicKeyMaterial;
pub use reqwest::StatusCode;
pub use signature::compute_signature;
pub use token::TokenResult;
