// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sunsynk inverter data reads.
//!
//! Requires a bearer token from `ssctl-sunsynk-auth`.

pub mod client;
pub mod error;
pub mod types;

pub use client::{InverterClient, DEFAULT_INVERTER_ENDPOINT};
pub use error::{InverterError, Result};
pub use types::{GridRealtimeData, GridRealtimeResponse, PhaseReading};
