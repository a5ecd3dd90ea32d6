//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! Apart from [`Cli::apply_overrides`] it has no side effects.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use omniprobe_core::config::ProbeConfig;
use omniprobe_harness::Selection;

/// omniprobe -- scenario-based regression probes for an OmniPath web service.
///
/// Without arguments every registered scenario runs, except those tagged
/// `full-db` (enable them with `--full-db` or `OMNIPROBE_FULL_DB=1`).
#[derive(Parser, Debug)]
#[command(name = "omniprobe", version, about, long_about = None)]
pub struct Cli {
    /// Path to an omniprobe.toml configuration file.
    ///
    /// Without it, built-in defaults and environment overrides are used.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,

    /// Run only these scenarios (repeatable or comma-joined).
    #[arg(long = "scenario", value_name = "ID", value_delimiter = ',')]
    pub scenarios: Vec<String>,

    /// Run scenarios carrying any of these tags (ignored with --scenario).
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Skip scenarios carrying any of these tags (ignored with --scenario).
    #[arg(long = "exclude-tag", value_name = "TAG")]
    pub exclude_tags: Vec<String>,

    /// Print every registered scenario id and query kind, then exit.
    #[arg(long, visible_alias = "list-scenarios")]
    pub list: bool,

    /// Include scenarios that need the complete database.
    #[arg(long, visible_alias = "complete")]
    pub full_db: bool,

    /// Number of scenarios to run concurrently (1 = sequential).
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Per-scenario timeout in seconds (0 = none).
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Treat failed checks as failures for the exit status.
    #[arg(long)]
    pub strict: bool,

    /// Override the query service base URL.
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl Cli {
    /// Apply command-line overrides on top of file and environment settings.
    ///
    /// Boolean flags only ever switch a setting on, so `--full-db` and the
    /// environment toggle combine with OR.
    pub fn apply_overrides(&self, config: &mut ProbeConfig) {
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
        if let Some(url) = &self.base_url {
            config.service.base_url = url.clone();
        }
        if let Some(jobs) = self.jobs {
            config.runner.jobs = jobs;
        }
        if let Some(secs) = self.timeout_secs {
            config.runner.scenario_timeout_secs = secs;
        }
        if self.full_db {
            config.runner.include_full_db = true;
        }
        if self.strict {
            config.runner.fail_on_check_failure = true;
        }
    }

    /// Scenario selection requested on the command line.
    pub fn selection(&self) -> Selection {
        Selection {
            scenario_ids: self.scenarios.clone(),
            include_tags: self.tags.clone(),
            exclude_tags: self.exclude_tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_arguments() {
        let cli = Cli::try_parse_from(["omniprobe"]).expect("parse succeeded");
        assert!(cli.config.is_none());
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(cli.scenarios.is_empty());
        assert!(!cli.list);
        assert!(!cli.full_db);
        assert!(!cli.strict);
        assert_eq!(cli.selection(), Selection::all());
    }

    #[test]
    fn test_cli_parse_scenarios_repeated_and_comma_joined() {
        let cli = Cli::try_parse_from([
            "omniprobe",
            "--scenario=enzsub_basic,complexes_json",
            "--scenario",
            "annotations_fst",
        ])
        .expect("parse succeeded");
        assert_eq!(
            cli.scenarios,
            vec!["enzsub_basic", "complexes_json", "annotations_fst"]
        );
    }

    #[test]
    fn test_cli_parse_list_aliases() {
        for flag in ["--list", "--list-scenarios"] {
            let cli = Cli::try_parse_from(["omniprobe", flag]).expect("parse succeeded");
            assert!(cli.list, "{flag} should enable listing");
        }
    }

    #[test]
    fn test_cli_parse_full_db_aliases() {
        for flag in ["--full-db", "--complete"] {
            let cli = Cli::try_parse_from(["omniprobe", flag]).expect("parse succeeded");
            assert!(cli.full_db, "{flag} should include full-db scenarios");
        }
    }

    #[test]
    fn test_cli_parse_tags() {
        let cli = Cli::try_parse_from([
            "omniprobe",
            "--tag",
            "smoke",
            "--tag",
            "json",
            "--exclude-tag",
            "full-db",
        ])
        .expect("parse succeeded");
        let selection = cli.selection();
        assert_eq!(selection.include_tags, vec!["smoke", "json"]);
        assert_eq!(selection.exclude_tags, vec!["full-db"]);
    }

    #[test]
    fn test_cli_parse_output_json() {
        let cli = Cli::try_parse_from(["omniprobe", "--output", "json"]).expect("parse succeeded");
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_cli_parse_invalid_output_format() {
        let result = Cli::try_parse_from(["omniprobe", "--output", "yaml"]);
        assert!(result.is_err(), "yaml is not a supported output format");
    }

    #[test]
    fn test_cli_parse_invalid_jobs() {
        let result = Cli::try_parse_from(["omniprobe", "--jobs", "many"]);
        assert!(result.is_err(), "jobs must be numeric");
    }

    #[test]
    fn test_apply_overrides() {
        let cli = Cli::try_parse_from([
            "omniprobe",
            "--log-level",
            "debug",
            "--base-url",
            "http://omnipath.example:8080",
            "-j",
            "4",
            "--timeout-secs",
            "0",
            "--complete",
            "--strict",
        ])
        .expect("parse succeeded");

        let mut config = ProbeConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.service.base_url, "http://omnipath.example:8080");
        assert_eq!(config.runner.jobs, 4);
        assert_eq!(config.runner.scenario_timeout_secs, 0);
        assert!(config.runner.include_full_db);
        assert!(config.runner.fail_on_check_failure);
    }

    #[test]
    fn test_flags_do_not_switch_settings_off() {
        let cli = Cli::try_parse_from(["omniprobe"]).expect("parse succeeded");
        let mut config = ProbeConfig::default();
        config.runner.include_full_db = true;
        config.runner.fail_on_check_failure = true;

        cli.apply_overrides(&mut config);
        assert!(config.runner.include_full_db);
        assert!(config.runner.fail_on_check_failure);
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
