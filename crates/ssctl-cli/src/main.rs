// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! ssctl - Sunsynk cloud control CLI
//!
//! Logs in to the Sunsynk cloud and reads inverter data. Results go to
//! stdout as JSON; diagnostics go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ssctl_cli_config::{load_config_with_cli, CliOverrides, LogFormat, LoggingConfig};

mod auth;
mod inverter;
mod version;

/// Sunsynk cloud control CLI
#[derive(Parser, Debug)]
#[command(name = "ssctl", version, about, long_about = None)]
struct Args {
	/// Path to custom configuration file
	#[arg(short, long, global = true)]
	config: Option<PathBuf>,

	/// Sunsynk API base URL (overrides config)
	#[arg(long, global = true)]
	api_endpoint: Option<String>,

	/// Log level (overrides config)
	#[arg(short, long, global = true)]
	log_level: Option<String>,

	/// Output logs as JSON (overrides config)
	#[arg(long, global = true)]
	json_logs: bool,

	/// Enable debug logging
	#[arg(long, global = true)]
	debug: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Exchange SS_USER / SS_PASS for a bearer token and print it as JSON
	Auth,

	/// Read inverter data with the bearer token in SS_TOKEN
	Inverter {
		#[command(subcommand)]
		command: InverterCommand,
	},

	/// Show version and platform
	Version,
}

#[derive(Subcommand, Debug)]
enum InverterCommand {
	/// Realtime grid readings
	Grid {
		/// Inverter serial number
		inverter_id: String,
	},

	/// One day's energy series
	Energy {
		/// Inverter serial number
		inverter_id: String,

		/// Day to fetch (YYYY-MM-DD); defaults to SS_DATE, then today
		#[arg(long)]
		date: Option<NaiveDate>,

		/// Series to fetch
		#[arg(long, default_value = inverter::DEFAULT_COLUMN)]
		column: String,
	},
}

impl From<&Args> for CliOverrides {
	fn from(args: &Args) -> Self {
		Self {
			config_file: args.config.clone(),
			api_endpoint: args.api_endpoint.clone(),
			log_level: args.log_level.clone(),
			log_format: if args.json_logs {
				Some("json".to_string())
			} else {
				None
			},
			debug: args.debug,
		}
	}
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(format!("ssctl={}", logging.level)));

	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().pretty().with_writer(std::io::stderr))
				.init();
		}
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	if let Command::Version = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	let config =
		load_config_with_cli(CliOverrides::from(&args)).context("failed to load configuration")?;

	init_tracing(&config.logging);
	debug!(
		endpoint = %config.api.endpoint,
		inverter_endpoint = %config.api.inverter_endpoint,
		timeout_secs = config.api.timeout.as_secs(),
		"starting ssctl"
	);

	match args.command {
		Command::Auth => auth::run(&config.api).await,
		Command::Inverter { command } => match command {
			InverterCommand::Grid { inverter_id } => inverter::grid(&config.api, &inverter_id).await,
			InverterCommand::Energy {
				inverter_id,
				date,
				column,
			} => inverter::energy(&config.api, &inverter_id, date, &column).await,
		},
		Command::Version => Ok(()),
	}
}
