// ABOUTME: Structured logging setup built on tracing-subscriber
// ABOUTME: Reads level, output format and location flags from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Logging configuration with structured output

use std::env;
use std::io;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::constants::service::SERVICE_NAME;

/// Crates that are too chatty at the application level
const NOISE_DIRECTIVES: &[&str] = &[
    "hyper=warn",
    "hyper::proto=warn",
    "reqwest=warn",
    "sqlx=warn",
    "sqlx::query=warn",
    "tower_http=info",
];

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level or filter directive (`info`, `nutriplan_server=debug`, ...)
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Service name attached to the startup record
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment name
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line, for production
    Json,
    /// Multi-line human output, for development
    Pretty,
    /// Single-line human output
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; unknown values fall back to pretty
    #[must_use]
    pub fn from_str_or_default(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            service_name: SERVICE_NAME.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG`, `LOG_FORMAT`, `LOG_INCLUDE_LOCATION` and the environment name
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let environment = ["ENVIRONMENT", "NODE_ENV"]
            .iter()
            .find_map(|var| env::var(var).ok())
            .unwrap_or_else(|| "development".into());

        // production: JSON with locations unless overridden
        let production = environment == "production";
        let format = env::var("LOG_FORMAT").map_or(
            if production {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
            |value| LogFormat::from_str_or_default(&value),
        );

        Self {
            level,
            format,
            include_location: production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            service_name: SERVICE_NAME.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment,
        }
    }

    /// Filter built from the configured level plus the noise-reduction directives
    ///
    /// # Errors
    ///
    /// Returns an error if the configured level is not a valid filter
    pub fn env_filter(&self) -> Result<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.level)
            .with_context(|| format!("Invalid log filter '{}'", self.level))?;
        for directive in NOISE_DIRECTIVES {
            let directive: Directive = directive
                .parse()
                .with_context(|| format!("Invalid log directive '{directive}'"))?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }

    /// Install the process-wide subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if the filter is invalid or a subscriber is already set
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter()?);

        match self.format {
            LogFormat::Json => {
                let layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(FmtSpan::CLOSE)
                    .json();
                registry
                    .with(layer)
                    .try_init()
                    .context("Failed to install JSON subscriber")?;
            }
            LogFormat::Pretty => {
                let layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout);
                registry
                    .with(layer)
                    .try_init()
                    .context("Failed to install subscriber")?;
            }
            LogFormat::Compact => {
                let layer = fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stdout);
                registry
                    .with(layer)
                    .try_init()
                    .context("Failed to install compact subscriber")?;
            }
        }

        self.announce();
        Ok(())
    }

    fn announce(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            env = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "NutriPlan server starting up"
        );

        let summary = json!({
            "service": [self.service_name, self.service_version, self.environment],
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format).to_lowercase(),
                "location": self.include_location
            }
        });
        info!("Logging configured: {summary}");
    }
}

/// `LoggingConfig::from_env().init()`
///
/// # Errors
///
/// Fails when the filter is invalid or a subscriber is already installed
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}
