//! Output formatting for the `detect` report and migration summaries

use anyhow::{Context, Result};

use crate::migrate::{DetectionReport, MigrationOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_report(&self, report: &DetectionReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize detection report to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize detection report to YAML")
            }
            OutputFormat::Human => Ok(self.format_report_human(report)),
        }
    }

    fn format_report_human(&self, report: &DetectionReport) -> String {
        let constraints = &report.constraints;
        let mut output = String::new();

        output.push_str("\u{2713} Repository Detection\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!("Repository:    {}\n", report.repository.display()));
        match &report.legacy_file {
            Some(path) => output.push_str(&format!("Legacy config: {}\n", path.display())),
            None => output.push_str("Legacy config: (not found)\n"),
        }
        output.push_str(&format!("App type:      {}\n", constraints.app_type.name()));
        if constraints.version.is_empty() {
            output.push_str("Version:       (unknown)\n");
        } else {
            output.push_str(&format!("Version:       {}\n", constraints.version));
        }
        if constraints.database_types.is_empty() {
            output.push_str("Databases:     (none detected)\n");
        } else {
            let names: Vec<&str> = constraints.database_types.iter().map(|d| d.name()).collect();
            output.push_str(&format!("Databases:     {}\n", names.join(", ")));
        }
        output.push('\n');

        output.push_str("Images:\n");
        let images = report.images.all();
        for (i, image) in images.iter().enumerate() {
            let connector = if i == images.len() - 1 { "\u{2514}" } else { "\u{251C}" };
            output.push_str(&format!("{}\u{2500} {}\n", connector, image.image));
        }
        output.push('\n');

        output.push_str(&format!("Working directory: {}\n", report.working_directory));
        output
    }

    /// One-paragraph summary printed after a real run
    pub fn format_outcome(&self, outcome: &MigrationOutcome) -> String {
        let mut output = String::new();
        if let Some(path) = &outcome.written {
            output.push_str(&format!("\u{2713} Wrote {}\n", path.display()));
        }
        if let Some(path) = &outcome.renamed {
            output.push_str(&format!("\u{2713} Moved circle.yml to {}\n", path.display()));
        }
        output.push_str(&format!(
            "  {} steps, {} image(s), working directory {}\n",
            outcome.plan.config.build().steps.len(),
            outcome.plan.config.build().docker.len(),
            outcome.plan.config.build().working_directory
        ));
        if !outcome.plan.untranslated.is_empty() {
            output.push_str("\n\u{26A0} Not migrated, review by hand:\n");
            for section in &outcome.plan.untranslated {
                output.push_str(&format!("  - {}\n", section));
            }
        }
        output
    }
}
