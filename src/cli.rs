//! Command-line interface parsing for kaistmenu
//!
//! This module handles parsing of CLI arguments using clap and merging them
//! with the loaded configuration into the options a single run needs.

use chrono::{NaiveDate, NaiveDateTime};
use clap::{ArgAction, Parser};
use thiserror::Error;

use crate::cafeteria::Cafeteria;
use crate::config::{AppConfig, ConfigError};
use crate::date::parse_date_arg;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified cafeteria is not recognized
    #[error("Invalid cafeteria: '{0}'. Valid cafeterias: east, east2, hwaam, munji, north, n6, west")]
    InvalidCafeteria(String),

    /// The --date value could not be understood
    #[error("Invalid date: '{0}'. Use YYYY-MM-DD or +N (days from today)")]
    InvalidDate(String),

    /// A flag produced an unusable configuration
    #[error(transparent)]
    InvalidOption(#[from] ConfigError),
}

/// kaistmenu - Show today's KAIST cafeteria menu
#[derive(Parser, Debug)]
#[command(name = "kaistmenu")]
#[command(about = "KAIST cafeteria menu, cached for the day")]
#[command(version)]
pub struct Cli {
    /// Cafeteria to show: east, east2, hwaam, munji, north, n6, west
    ///
    /// Defaults to `target` from the config file (n6 if unset).
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Ignore any cached menu and fetch it again
    #[arg(short, long)]
    pub refresh: bool,

    /// Show another day's menu without using the cache
    ///
    /// Examples:
    ///   kaistmenu -d +1          # Tomorrow
    ///   kaistmenu -d 2024-03-04  # A specific day
    #[arg(short, long, value_name = "DATE")]
    pub date: Option<String>,

    /// Total width of the menu table in terminal cells
    #[arg(short = 'l', long, value_name = "CELLS")]
    pub max_length: Option<usize>,

    /// Save the effective target, width and timeout as the new defaults
    #[arg(long)]
    pub save_rc: bool,

    /// Log more about cache decisions (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// How the menu date was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateChoice {
    /// No --date: the date of interest, served through the cache
    Today(NaiveDate),
    /// An explicit --date: fetched directly, cache untouched
    Explicit(NaiveDate),
}

impl DateChoice {
    pub fn date(&self) -> NaiveDate {
        match self {
            DateChoice::Today(date) | DateChoice::Explicit(date) => *date,
        }
    }
}

/// Options for one run, after merging CLI arguments over configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub cafeteria: Cafeteria,
    pub date: DateChoice,
    pub refresh: bool,
    pub save_rc: bool,
    /// Effective configuration, including any CLI overrides
    pub config: AppConfig,
}

/// Parses a cafeteria string argument into a Cafeteria enum.
///
/// # Returns
/// * `Ok(Cafeteria)` if the string names a known cafeteria
/// * `Err(CliError::InvalidCafeteria)` if it doesn't
pub fn parse_cafeteria_arg(s: &str) -> Result<Cafeteria, CliError> {
    Cafeteria::from_str(s).ok_or_else(|| CliError::InvalidCafeteria(s.to_string()))
}

impl RunOptions {
    /// Builds run options from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    /// * `config` - Configuration loaded from file and environment
    /// * `now` - Local time used to pick the default date
    pub fn from_cli(cli: &Cli, config: AppConfig, now: NaiveDateTime) -> Result<Self, CliError> {
        let cafeteria = match &cli.target {
            Some(target) => parse_cafeteria_arg(target)?,
            None => config.target_cafeteria(),
        };

        let date = match cli.date.as_deref() {
            // An empty --date behaves like no --date at all
            None | Some("") => DateChoice::Today(
                parse_date_arg("", now).ok_or_else(|| CliError::InvalidDate(String::new()))?,
            ),
            Some(arg) => DateChoice::Explicit(
                parse_date_arg(arg, now).ok_or_else(|| CliError::InvalidDate(arg.to_string()))?,
            ),
        };

        let mut config = config;
        config.target = cafeteria.code().to_string();
        if let Some(max_length) = cli.max_length {
            config.max_length = max_length;
        }
        config.validate()?;

        Ok(RunOptions {
            cafeteria,
            date,
            refresh: cli.refresh,
            save_rc: cli.save_rc,
            config,
        })
    }

    /// Default log filter for the requested verbosity
    pub fn log_level(verbose: u8) -> &'static str {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
