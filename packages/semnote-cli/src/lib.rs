use std::path::PathBuf;

use clap::{
	Args,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};

use semnote_config::Config;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Flags shared by every binary that reads a config file.
#[derive(Debug, Args)]
pub struct ConfigArgs {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Overrides `service.log_level`, e.g. `debug` or `semnote_service=trace`.
	#[arg(long, value_name = "FILTER")]
	pub log_level: Option<String>,
}
impl ConfigArgs {
	pub fn load(&self) -> semnote_config::Result<Config> {
		let mut config = semnote_config::load(&self.config)?;

		if let Some(log_level) = self.log_level.as_deref().map(str::trim)
			&& !log_level.is_empty()
		{
			config.service.log_level = log_level.to_string();
		}

		Ok(config)
	}
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Magenta.on_default() | Effects::BOLD)
		.usage(AnsiColor::Magenta.on_default() | Effects::BOLD)
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Yellow.on_default() | Effects::ITALIC)
		.error(AnsiColor::Red.on_default() | Effects::BOLD)
}
