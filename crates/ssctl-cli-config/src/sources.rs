// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: files, environment, CLI, defaults.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::layer::ConfigLayer;
use crate::paths::PathsConfig;
use crate::ConfigError;

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	SystemFile = 20,
	UserFile = 30,
	ExplicitFile = 40,
	Environment = 50,
	Cli = 60,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	/// Name for logging
	fn name(&self) -> &'static str;

	/// Precedence level
	fn precedence(&self) -> Precedence;

	/// Load configuration layer from this source
	fn load(&self) -> Result<ConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		// Defaults are applied when the runtime config is built.
		Ok(ConfigLayer::default())
	}
}

/// File-based configuration source (TOML).
pub struct FileSource {
	path: PathBuf,
	precedence: Precedence,
	name: &'static str,
	required: bool,
}

impl FileSource {
	/// System config: /etc/ssctl/config.toml
	pub fn system(paths: &PathsConfig) -> Self {
		Self {
			path: paths.system_config_file.clone(),
			precedence: Precedence::SystemFile,
			name: "system-config",
			required: false,
		}
	}

	/// User config: $XDG_CONFIG_HOME/ssctl/config.toml
	pub fn user(paths: &PathsConfig) -> Self {
		Self {
			path: paths.user_config_file.clone(),
			precedence: Precedence::UserFile,
			name: "user-config",
			required: false,
		}
	}

	/// File named with `--config`. It must exist.
	pub fn explicit(path: PathBuf) -> Self {
		Self {
			path,
			precedence: Precedence::ExplicitFile,
			name: "explicit-config",
			required: true,
		}
	}
}

impl ConfigSource for FileSource {
	fn name(&self) -> &'static str {
		self.name
	}
	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		if !self.path.exists() {
			if self.required {
				return Err(ConfigError::MissingFile(self.path.clone()));
			}
			debug!(path = %self.path.display(), source = self.name, "config file not found, skipping");
			return Ok(ConfigLayer::default());
		}

		debug!(path = %self.path.display(), source = self.name, "loading config file");

		let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
			path: self.path.clone(),
			source,
		})?;
		let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!(source = self.name, "parsed config layer");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Reads `SS_API_ENDPOINT`, `SS_INVERTER_ENDPOINT`, `SS_API_TIMEOUT_SECS`,
/// `SS_LOG_LEVEL`, `SS_LOG_FORMAT` and `SS_DEBUG`. Credentials are not
/// configuration and are read separately.
pub struct EnvSource {
	vars: HashMap<String, String>,
}

impl EnvSource {
	/// Snapshot the process environment.
	///
	/// Variables whose name or value is not valid UTF-8 are skipped.
	pub fn from_process() -> Self {
		Self::from_vars(
			std::env::vars_os().filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
		)
	}

	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: vars
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.filter(|(k, _)| k.starts_with("SS_"))
				.collect(),
		}
	}

	fn get(&self, key: &str) -> Option<String> {
		self
			.vars
			.get(key)
			.map(|v| v.trim())
			.filter(|v| !v.is_empty())
			.map(String::from)
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading environment variables");
		let mut layer = ConfigLayer::default();

		if let Some(value) = self.get("SS_API_ENDPOINT") {
			layer.api_mut().endpoint = Some(value);
		}
		if let Some(value) = self.get("SS_INVERTER_ENDPOINT") {
			layer.api_mut().inverter_endpoint = Some(value);
		}
		if let Some(value) = self.get("SS_API_TIMEOUT_SECS") {
			let secs = value.parse().map_err(|_| {
				ConfigError::invalid_value("SS_API_TIMEOUT_SECS", format!("{value:?} is not a whole number of seconds"))
			})?;
			layer.api_mut().timeout_secs = Some(secs);
		}
		if let Some(value) = self.get("SS_LOG_LEVEL") {
			layer.logging_mut().level = Some(value);
		}
		if let Some(value) = self.get("SS_LOG_FORMAT") {
			layer.logging_mut().format = Some(value);
		}
		if self.get("SS_DEBUG").is_some_and(|v| is_truthy(&v)) {
			trace!("SS_DEBUG set, forcing debug level");
			layer.logging_mut().level = Some("debug".to_string());
		}

		Ok(layer)
	}
}

fn is_truthy(value: &str) -> bool {
	matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// CLI override source.
pub struct CliSource {
	overrides: CliOverrides,
}

/// CLI argument overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub config_file: Option<PathBuf>,
	pub api_endpoint: Option<String>,
	pub log_level: Option<String>,
	pub log_format: Option<String>,
	pub debug: bool,
}

impl CliSource {
	pub fn new(overrides: CliOverrides) -> Self {
		Self { overrides }
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading CLI overrides");
		let mut layer = ConfigLayer::default();

		if let Some(ref endpoint) = self.overrides.api_endpoint {
			layer.api_mut().endpoint = Some(endpoint.clone());
		}
		if let Some(ref level) = self.overrides.log_level {
			layer.logging_mut().level = Some(level.clone());
		}
		if let Some(ref format) = self.overrides.log_format {
			layer.logging_mut().format = Some(format.clone());
		}
		if self.overrides.debug {
			layer.logging_mut().level = Some("debug".to_string());
		}

		Ok(layer)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Cli > Precedence::Environment);
		assert!(Precedence::Environment > Precedence::ExplicitFile);
		assert!(Precedence::ExplicitFile > Precedence::UserFile);
		assert!(Precedence::UserFile > Precedence::SystemFile);
		assert!(Precedence::SystemFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert_eq!(layer, ConfigLayer::default());
	}

	#[test]
	fn test_optional_missing_file_returns_empty() {
		let paths = PathsConfig {
			user_config_file: "/nonexistent/ssctl/config.toml".into(),
			system_config_file: "/nonexistent/etc/config.toml".into(),
		};
		assert_eq!(FileSource::user(&paths).load().unwrap(), ConfigLayer::default());
		assert_eq!(FileSource::system(&paths).load().unwrap(), ConfigLayer::default());
	}

	#[test]
	fn test_explicit_missing_file_is_error() {
		let err = FileSource::explicit("/nonexistent/ssctl.toml".into())
			.load()
			.unwrap_err();
		assert!(matches!(err, ConfigError::MissingFile(_)));
	}

	#[test]
	fn test_file_source_parses_toml() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[api]\nendpoint = \"http://localhost:8080\"\ntimeout_secs = 5").unwrap();

		let layer = FileSource::explicit(file.path().to_path_buf()).load().unwrap();
		let api = layer.api.unwrap();
		assert_eq!(api.endpoint.as_deref(), Some("http://localhost:8080"));
		assert_eq!(api.timeout_secs, Some(5));
	}

	#[test]
	fn test_file_source_reports_parse_error_with_path() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[api\nendpoint = ").unwrap();

		let err = FileSource::explicit(file.path().to_path_buf()).load().unwrap_err();
		match err {
			ConfigError::TomlParse { path, .. } => assert_eq!(path, file.path()),
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn test_env_source_maps_variables() {
		let layer = EnvSource::from_vars([
			("SS_API_ENDPOINT", "http://localhost:9000"),
			("SS_INVERTER_ENDPOINT", "http://localhost:9001/inv/"),
			("SS_API_TIMEOUT_SECS", "12"),
			("SS_LOG_FORMAT", "json"),
			("PATH", "/usr/bin"),
		])
		.load()
		.unwrap();

		let api = layer.api.unwrap();
		assert_eq!(api.endpoint.as_deref(), Some("http://localhost:9000"));
		assert_eq!(api.inverter_endpoint.as_deref(), Some("http://localhost:9001/inv/"));
		assert_eq!(api.timeout_secs, Some(12));
		assert_eq!(layer.logging.unwrap().format.as_deref(), Some("json"));
	}

	#[test]
	fn test_env_source_ignores_blank_values() {
		let layer = EnvSource::from_vars([("SS_API_ENDPOINT", "   ")]).load().unwrap();
		assert!(layer.api.is_none());
	}

	#[test]
	fn test_env_source_rejects_bad_timeout() {
		let err = EnvSource::from_vars([("SS_API_TIMEOUT_SECS", "soon")])
			.load()
			.unwrap_err();
		assert!(err.to_string().contains("SS_API_TIMEOUT_SECS"));
	}

	#[cfg(unix)]
	#[test]
	fn test_from_process_skips_non_utf8_variables() {
		use std::ffi::OsStr;
		use std::os::unix::ffi::OsStrExt;

		let name = "SSCTL_CONFIG_TEST_NON_UTF8";
		std::env::set_var(name, OsStr::from_bytes(b"caf\xe9"));
		let result = EnvSource::from_process().load();
		std::env::remove_var(name);

		assert!(result.is_ok());
	}

	#[test]
	fn test_ss_debug_forces_debug_level() {
		for value in ["TRUE", "true", "1"] {
			let layer = EnvSource::from_vars([("SS_LOG_LEVEL", "error"), ("SS_DEBUG", value)])
				.load()
				.unwrap();
			assert_eq!(layer.logging.unwrap().level.as_deref(), Some("debug"));
		}

		let layer = EnvSource::from_vars([("SS_LOG_LEVEL", "error"), ("SS_DEBUG", "false")])
			.load()
			.unwrap();
		assert_eq!(layer.logging.unwrap().level.as_deref(), Some("error"));
	}

	#[test]
	fn test_cli_debug_overrides_log_level() {
		let layer = CliSource::new(CliOverrides {
			log_level: Some("warn".into()),
			debug: true,
			..Default::default()
		})
		.load()
		.unwrap();
		assert_eq!(layer.logging.unwrap().level.as_deref(), Some("debug"));
	}
}
