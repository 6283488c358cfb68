// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `ssctl inverter`: authenticated inverter reads.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use ssctl_cli_config::ApiConfig;
use ssctl_common_config::require_secret_env;
use ssctl_sunsynk_inverter::InverterClient;
use tracing::debug;

pub const DEFAULT_COLUMN: &str = "pac";

const DATE_FORMAT: &str = "%Y-%m-%d";

fn client(api: &ApiConfig) -> Result<InverterClient> {
	InverterClient::new(&api.inverter_endpoint, api.timeout).context("invalid inverter API configuration")
}

pub async fn grid(api: &ApiConfig, inverter_id: &str) -> Result<()> {
	let token = require_secret_env("SS_TOKEN").context("no Sunsynk token")?;
	let body = client(api)?
		.get_grid_realtime(inverter_id, &token)
		.await
		.with_context(|| format!("failed to read realtime grid data for inverter {inverter_id}"))?;
	println!("{body}");
	Ok(())
}

pub async fn energy(
	api: &ApiConfig,
	inverter_id: &str,
	date: Option<NaiveDate>,
	column: &str,
) -> Result<()> {
	let token = require_secret_env("SS_TOKEN").context("no Sunsynk token")?;
	let date = resolve_date(
		date,
		std::env::var("SS_DATE").ok().as_deref(),
		Local::now().date_naive(),
	)?;
	debug!(%date, column, "fetching energy series");

	let body = client(api)?
		.get_energy_day(inverter_id, &date.format(DATE_FORMAT).to_string(), column, &token)
		.await
		.with_context(|| format!("failed to read {column} for inverter {inverter_id} on {date}"))?;
	println!("{body}");
	Ok(())
}

/// `--date`, else `SS_DATE`, else today.
fn resolve_date(flag: Option<NaiveDate>, env: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
	if let Some(date) = flag {
		return Ok(date);
	}
	match env.map(str::trim).filter(|v| !v.is_empty()) {
		Some(value) => {
			debug!(date = value, "date override from SS_DATE");
			NaiveDate::parse_from_str(value, DATE_FORMAT)
				.with_context(|| format!("SS_DATE={value:?} is not a YYYY-MM-DD date"))
		}
		None => Ok(today),
	}
}
