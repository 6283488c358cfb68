// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use reqwest::Client;
use ssctl_common_http::body_snippet;
use ssctl_common_secret::SecretString;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{InverterError, Result};
use crate::types::GridRealtimeResponse;

/// Default base for the inverter data API.
pub const DEFAULT_INVERTER_ENDPOINT: &str = "https://pv.inteless.com/api/v1/inverter/";

/// Read-only client for per-inverter data.
///
/// Each call is a single bearer-authenticated GET. Bodies are handed back as
/// received; interpretation is left to the caller.
#[derive(Debug, Clone)]
pub struct InverterClient {
	base: Url,
	http: Client,
}

impl InverterClient {
	/// Build a client for `endpoint` with a per-request `timeout`.
	pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
		let base = parse_base(endpoint)?;
		let http = ssctl_common_http::new_client_with_timeout(timeout)?;
		Ok(Self { base, http })
	}

	pub fn base_url(&self) -> &Url {
		&self.base
	}

	/// `<base>grid/<id>/realtime`
	pub fn grid_realtime_url(&self, inverter_id: &str) -> Result<Url> {
		self.url_for(&["grid", inverter_id, "realtime"], inverter_id)
	}

	/// `<base>energy/<id>/input/day?lan=en&date=<date>&column=<column>`
	pub fn energy_day_url(&self, inverter_id: &str, date: &str, column: &str) -> Result<Url> {
		let mut url = self.url_for(&["energy", inverter_id, "input", "day"], inverter_id)?;
		url.query_pairs_mut()
			.append_pair("lan", "en")
			.append_pair("date", date)
			.append_pair("column", column);
		Ok(url)
	}

	/// Realtime grid readings, raw JSON.
	#[instrument(skip(self, token))]
	pub async fn get_grid_realtime(&self, inverter_id: &str, token: &SecretString) -> Result<String> {
		let url = self.grid_realtime_url(inverter_id)?;
		self.get(url, token).await
	}

	/// Realtime grid readings, decoded.
	pub async fn grid_realtime(
		&self,
		inverter_id: &str,
		token: &SecretString,
	) -> Result<GridRealtimeResponse> {
		let body = self.get_grid_realtime(inverter_id, token).await?;
		Ok(GridRealtimeResponse::from_json(&body)?)
	}

	/// One day's series for `column`, raw JSON.
	#[instrument(skip(self, token))]
	pub async fn get_energy_day(
		&self,
		inverter_id: &str,
		date: &str,
		column: &str,
		token: &SecretString,
	) -> Result<String> {
		let url = self.energy_day_url(inverter_id, date, column)?;
		self.get(url, token).await
	}

	fn url_for(&self, segments: &[&str], inverter_id: &str) -> Result<Url> {
		if inverter_id.trim().is_empty() {
			return Err(InverterError::EmptyInverterId);
		}
		let mut url = self.base.clone();
		url.path_segments_mut()
			.map_err(|()| InverterError::UnsupportedScheme(self.base.scheme().to_string()))?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	async fn get(&self, url: Url, token: &SecretString) -> Result<String> {
		debug!(url = %url, "inverter request");
		let response = self
			.http
			.get(url)
			.bearer_auth(token.expose())
			.send()
			.await?;
		let status = response.status();
		let body = response.text().await?;
		debug!(status = %status, body_len = body.len(), "inverter response received");

		if !status.is_success() {
			return Err(InverterError::Http {
				status,
				body: body_snippet(&body),
			});
		}
		Ok(body)
	}
}

fn parse_base(endpoint: &str) -> Result<Url> {
	let trimmed = endpoint.trim();
	let base = Url::parse(trimmed).map_err(|source| InverterError::InvalidEndpoint {
		endpoint: trimmed.to_string(),
		source,
	})?;
	match base.scheme() {
		"http" | "https" if base.host().is_some() => Ok(base),
		other => Err(InverterError::UnsupportedScheme(other.to_string())),
	}
}
