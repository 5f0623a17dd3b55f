//! Logging setup for applications embedding the gateway.
//!
//! The library itself only emits `tracing` events; installing a subscriber is left to
//! the embedding application, which can call [`setup_logging`].
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: "trace", "debug", "info" (default), "warn" or "error"
//! - LOG_DATA_DIR: directory for log files; default is "logs/"

pub mod error;

use lazy_static::lazy_static;
use regex::Regex;
use std::{env, fs::create_dir_all, path::Path};
use tracing::{info, Subscriber};
use tracing_subscriber::{
	filter::EnvFilter,
	fmt::{self, format::Writer, FmtContext, FormatEvent, FormatFields},
	prelude::*,
	registry::LookupSpan,
};

lazy_static! {
	static ref ANSI_ESCAPE: Regex =
		Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("ANSI escape pattern is valid");
}

/// File name prefix of the daily rolled log files
pub const LOG_FILE_PREFIX: &str = "utxo-gateway.log";

/// Formatter wrapper that strips ANSI escape codes before writing
struct StripAnsiFormatter<T> {
	inner: T,
}

impl<S, N, T> FormatEvent<S, N> for StripAnsiFormatter<T>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	N: for<'a> FormatFields<'a> + 'static,
	T: FormatEvent<S, N>,
{
	fn format_event(
		&self,
		ctx: &FmtContext<'_, S, N>,
		mut writer: Writer<'_>,
		event: &tracing::Event<'_>,
	) -> std::fmt::Result {
		let mut buf = String::new();
		self.inner.format_event(ctx, Writer::new(&mut buf), event)?;
		write!(writer, "{}", strip_ansi_escapes(&buf))
	}
}

fn strip_ansi_escapes(s: &str) -> String {
	ANSI_ESCAPE.replace_all(s, "").to_string()
}

fn parse_level(raw: &str) -> tracing::Level {
	match raw.to_lowercase().as_str() {
		"trace" => tracing::Level::TRACE,
		"debug" => tracing::Level::DEBUG,
		"warn" => tracing::Level::WARN,
		"error" => tracing::Level::ERROR,
		_ => tracing::Level::INFO,
	}
}

/// Normalizes the log directory so it always ends with a single `/`
fn resolve_log_dir(raw: Option<String>) -> String {
	let dir = raw.unwrap_or_else(|| "logs/".to_string());
	format!("{}/", dir.trim_end_matches('/'))
}

fn create_log_format(with_ansi: bool) -> fmt::format::Format<fmt::format::Compact> {
	fmt::format()
		.with_level(true)
		.with_target(true)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_ansi(with_ansi)
		.compact()
}

/// Installs a global subscriber configured from the environment.
///
/// Fails if a global subscriber is already set or the log directory cannot be created.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	let log_mode = env::var("LOG_MODE")
		.unwrap_or_else(|_| "stdout".to_string())
		.to_lowercase();
	let level = parse_level(&env::var("LOG_LEVEL").unwrap_or_default());

	let to_file = log_mode == "file";
	let format = create_log_format(!to_file);
	let subscriber = tracing_subscriber::registry().with(EnvFilter::new(level.to_string()));

	if to_file {
		let log_dir = resolve_log_dir(env::var("LOG_DATA_DIR").ok());
		create_dir_all(Path::new(&log_dir))?;

		let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
		subscriber
			.with(
				fmt::layer()
					.event_format(StripAnsiFormatter { inner: format })
					.with_writer(file_appender)
					.fmt_fields(fmt::format::PrettyFields::new()),
			)
			.try_init()?;
	} else {
		subscriber
			.with(
				fmt::layer()
					.event_format(format)
					.fmt_fields(fmt::format::PrettyFields::new()),
			)
			.try_init()?;
	}

	info!(mode = %log_mode, level = %level, "logging configured");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_strip_ansi_escapes() {
		let input = "\x1b[33mWARN\x1b[0m provider failed";
		assert_eq!(strip_ansi_escapes(input), "WARN provider failed");
	}

	#[test]
	fn test_parse_level_defaults_to_info() {
		assert_eq!(parse_level("DEBUG"), tracing::Level::DEBUG);
		assert_eq!(parse_level("error"), tracing::Level::ERROR);
		assert_eq!(parse_level("verbose"), tracing::Level::INFO);
		assert_eq!(parse_level(""), tracing::Level::INFO);
	}

	#[test]
	fn test_resolve_log_dir() {
		assert_eq!(resolve_log_dir(None), "logs/");
		assert_eq!(resolve_log_dir(Some("/var/log/gw///".into())), "/var/log/gw/");
		assert_eq!(resolve_log_dir(Some("out".into())), "out/");
	}
}
