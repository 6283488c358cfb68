// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared configuration primitives for ssctl.
//!
//! - [`SecretString`]: redacting wrapper (re-exported from
//!   [`ssctl_common_secret`])
//! - [`load_secret_env`] / [`require_secret_env`]: read `SS_USER`, `SS_PASS`,
//!   `SS_TOKEN` and friends with `*_FILE` support

pub mod env;

pub use ssctl_common_secret::{Secret, SecretString, REDACTED};

pub use env::{load_secret_env, require_secret_env, RequiredSecretError, SecretEnvError};
