//! Default command: run the selected scenarios and report

use std::io::Write;
use std::sync::Arc;

use colored::{ColoredString, Colorize};
use tracing::info;

use omniprobe_client::HttpQueryService;
use omniprobe_core::config::ProbeConfig;
use omniprobe_harness::summary::{annotation, validation_label};
use omniprobe_harness::{
    BatchRunner, RunOptions, RunReport, RunResult, RunStatus, ScenarioRegistry, Selection,
    resolve_selection,
};

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Width of the id column in the result table.
const ID_WIDTH: usize = 36;

/// Resolve the selection, run it against the configured service and render
/// the report. Returns the process exit code for the batch.
///
/// An empty selection fails before the service client is even built.
pub async fn execute(
    config: &ProbeConfig,
    registry: &ScenarioRegistry,
    selection: &Selection,
    writer: &OutputWriter,
    out: &mut dyn Write,
) -> Result<i32, CliError> {
    let scenarios = resolve_selection(registry, selection)?;

    let service = Arc::new(HttpQueryService::from_config(&config.service)?);
    info!(
        base_url = %service.base_url(),
        scenarios = scenarios.len(),
        "running scenarios"
    );

    let runner = BatchRunner::new(service, RunOptions::from_config(&config.runner));
    let report = runner.run(&scenarios).await;

    writer.render(out, &report)?;
    Ok(report.exit_code())
}

fn status_cell(result: &RunResult) -> ColoredString {
    let text = format!("{:<8}", result.status.as_str());
    match result.status {
        RunStatus::Success if result.has_failed_checks() => text.yellow(),
        RunStatus::Success => text.green(),
        RunStatus::Skipped => text.dimmed(),
        RunStatus::Error => text.red().bold(),
    }
}

impl Render for RunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{:<ID_WIDTH$} {:<8} {:<48} Checks", "ID", "Status", "Detail")?;
        writeln!(w, "{}", "-".repeat(104))?;

        for result in &self.results {
            writeln!(
                w,
                "{:<ID_WIDTH$} {} {:<48} {}",
                result.id,
                status_cell(result),
                annotation(result),
                validation_label(result)
            )?;
        }

        let failures: Vec<(&str, &omniprobe_harness::CheckOutcome)> = self
            .results
            .iter()
            .filter_map(|r| r.validation.as_ref().map(|v| (r.id.as_str(), v)))
            .flat_map(|(id, v)| v.failures().map(move |c| (id, c)))
            .collect();
        if !failures.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Failed checks:".yellow())?;
            for (id, check) in failures {
                match &check.detail {
                    Some(detail) => writeln!(w, "  {id}: {} ({detail})", check.name)?,
                    None => writeln!(w, "  {id}: {}", check.name)?,
                }
            }
        }

        writeln!(w)?;
        let summary = self.summary.to_string();
        if self.is_success() {
            writeln!(w, "{}", summary.green())?;
        } else {
            writeln!(w, "{}", summary.red())?;
        }
        writeln!(
            w,
            "run {} (full-db: {}, strict: {}, {}ms)",
            self.run_id,
            on_off(self.include_full_db),
            on_off(self.strict),
            self.summary.duration_ms
        )?;

        Ok(())
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
