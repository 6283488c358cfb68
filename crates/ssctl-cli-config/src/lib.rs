// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for ssctl.
//!
//! Layers, lowest precedence first:
//! - built-in defaults
//! - `/etc/ssctl/config.toml`
//! - `$XDG_CONFIG_HOME/ssctl/config.toml`
//! - the file given with `--config`
//! - `SS_*` environment variables
//! - CLI flags

pub mod error;
pub mod layer;
pub mod paths;
pub mod registry;
pub mod runtime;
pub mod sources;
pub mod validation;

pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use paths::PathsConfig;
pub use registry::ConfigRegistry;
pub use runtime::{
	ApiConfig, LogFormat, LogLevel, LoggingConfig, SsctlConfig, DEFAULT_API_ENDPOINT,
	DEFAULT_INVERTER_ENDPOINT, DEFAULT_TIMEOUT_SECS,
};
pub use sources::{CliOverrides, ConfigSource, Precedence};

/// Load configuration from all sources with CLI overrides on top.
pub fn load_config_with_cli(cli: CliOverrides) -> Result<SsctlConfig, ConfigError> {
	let paths = paths::resolve_xdg_paths()?;

	let mut registry = ConfigRegistry::new();
	registry.register(Box::new(sources::DefaultsSource));
	registry.register(Box::new(sources::FileSource::system(&paths)));
	registry.register(Box::new(sources::FileSource::user(&paths)));
	if let Some(ref path) = cli.config_file {
		registry.register(Box::new(sources::FileSource::explicit(path.clone())));
	}
	registry.register(Box::new(sources::EnvSource::from_process()));
	registry.register(Box::new(sources::CliSource::new(cli)));

	registry.load()
}
