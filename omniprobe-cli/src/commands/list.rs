//! `omniprobe --list` handler

use std::io::Write;

use serde::Serialize;

use omniprobe_core::types::QueryKind;
use omniprobe_harness::ScenarioRegistry;

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Print every registered scenario. Never contacts the query service.
pub fn execute(
    registry: &ScenarioRegistry,
    writer: &OutputWriter,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let report = ScenarioListReport::from_registry(registry);
    writer.render(out, &report)
}

#[derive(Debug, Serialize)]
pub struct ScenarioListReport {
    pub total: usize,
    pub scenarios: Vec<ScenarioEntry>,
}

#[derive(Debug, Serialize)]
pub struct ScenarioEntry {
    pub id: String,
    pub query_kind: QueryKind,
    pub tags: Vec<String>,
    pub description: String,
}

impl ScenarioListReport {
    pub fn from_registry(registry: &ScenarioRegistry) -> Self {
        let scenarios: Vec<ScenarioEntry> = registry
            .list_all()
            .iter()
            .map(|s| ScenarioEntry {
                id: s.id.clone(),
                query_kind: s.query_kind,
                tags: s.tags.iter().cloned().collect(),
                description: s.description.clone(),
            })
            .collect();
        Self {
            total: scenarios.len(),
            scenarios,
        }
    }
}

impl Render for ScenarioListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        for s in &self.scenarios {
            writeln!(
                w,
                "{:<36} {:<20} {}",
                s.id,
                s.query_kind.endpoint(),
                s.tags.join(",").dimmed()
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omniprobe_harness::Scenario;

    fn registry() -> ScenarioRegistry {
        ScenarioRegistry::new(vec![
            Scenario::new("interactions_datasets", QueryKind::Interactions).tag("smoke"),
            Scenario::new("complexes_all", QueryKind::Complexes).tag("full-db"),
        ])
        .expect("valid registry")
    }

    #[test]
    fn test_list_prints_one_line_per_scenario() {
        let report = ScenarioListReport::from_registry(&registry());
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render");
        let output = String::from_utf8(buffer).expect("utf-8");

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("interactions_datasets"));
        assert!(lines[0].contains("interactions"));
        assert!(lines[1].starts_with("complexes_all"));
        assert!(lines[1].contains("complexes"));
    }

    #[test]
    fn test_list_json_includes_full_db_scenarios() {
        let report = ScenarioListReport::from_registry(&registry());
        let value = serde_json::to_value(&report).expect("serialize");
        assert_eq!(value["total"], 2);
        assert_eq!(value["scenarios"][1]["query_kind"], "complexes");
        assert_eq!(value["scenarios"][1]["tags"][0], "full-db");
    }
}
