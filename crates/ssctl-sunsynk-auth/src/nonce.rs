// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Millisecond request nonces.

use std::fmt;

/// Wall-clock milliseconds since the Unix epoch, sent with each signed request.
///
/// A nonce belongs to exactly one request. The handshake reads the clock
/// separately for the public-key call and for the token call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonce(i64);

impl Nonce {
	pub const fn from_millis(millis: i64) -> Self {
		Self(millis)
	}

	pub const fn as_millis(self) -> i64 {
		self.0
	}
}

impl fmt::Display for Nonce {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Source of nonces.
pub trait NonceClock: Send + Sync {
	fn now(&self) -> Nonce;
}

/// Reads the system clock on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl NonceClock for SystemClock {
	fn now(&self) -> Nonce {
		Nonce(chrono::Utc::now().timestamp_millis())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn system_clock_is_in_milliseconds() {
		let nonce = SystemClock.now();
		// 2020-01-01T00:00:00Z in ms; anything smaller means seconds were used.
		assert!(nonce.as_millis() > 1_577_836_800_000);
	}

	#[test]
	fn system_clock_does_not_go_backwards() {
		let first = SystemClock.now();
		let second = SystemClock.now();
		assert!(second >= first);
	}

	#[test]
	fn display_is_plain_integer() {
		assert_eq!(Nonce::from_millis(1_700_000_000_000).to_string(), "1700000000000");
	}
}
