use std::io::IsTerminal;

use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::engine::{self, GradeEntry, ValidationState};
use crate::state::{CalculatorState, Derived};

/// Everything an export needs, captured once. Renderers only format;
/// no engine function is re-executed here.
#[derive(Debug, Clone)]
pub struct ExportData<'a> {
    pub entries: &'a [GradeEntry],
    pub current_average: f64,
    pub final_average: f64,
    pub exam_mode: bool,
    pub exam_weight: f64,
    pub exam_grade: f64,
    pub pass_grade: f64,
    pub timestamp: DateTime<Local>,
}

impl<'a> ExportData<'a> {
    pub fn from_state(
        state: &'a CalculatorState,
        derived: &Derived,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            entries: &state.entries,
            current_average: derived.current_average,
            final_average: derived.final_average,
            exam_mode: state.exam_mode,
            exam_weight: state.exam_weight,
            exam_grade: state.exam_grade,
            pass_grade: state.pass_grade,
            timestamp,
        }
    }

    fn passed(&self) -> bool {
        self.final_average >= self.pass_grade
    }

    fn filled_entries(&self) -> impl Iterator<Item = &GradeEntry> {
        self.entries.iter().filter(|e| e.is_filled())
    }
}

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Txt,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Txt => "txt",
        }
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Quote a CSV field, doubling any embedded quotes.
fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn display_name(entry: &GradeEntry) -> &str {
    if entry.name.is_empty() {
        "Unnamed"
    } else {
        &entry.name
    }
}

/// Render the snapshot as CSV: one row per filled entry, then a summary
/// block.
pub fn export_csv(data: &ExportData) -> String {
    let mut rows: Vec<String> = Vec::new();

    rows.push("Name,Grade,Weight,Contribution".to_string());

    for entry in data.filled_entries() {
        rows.push(format!(
            "{},{},{}%,{:.2}",
            csv_quote(display_name(entry)),
            entry.value,
            entry.weight,
            entry.contribution()
        ));
    }

    rows.push(String::new());

    rows.push("Summary,".to_string());
    rows.push(format!("Current Average,{:.2}", data.current_average));

    if data.exam_mode {
        rows.push(format!("Exam Grade,{}", data.exam_grade));
        rows.push(format!("Exam Weight,{}%", data.exam_weight));
        rows.push(format!("Final Average,{:.2}", data.final_average));
        rows.push(format!("Pass Grade,{}", data.pass_grade));
        rows.push(format!(
            "Status,{}",
            if data.passed() { "Passed" } else { "Failed" }
        ));
    }

    rows.push(format!(
        "Exported,{}",
        data.timestamp.format("%Y-%m-%d %H:%M:%S")
    ));

    rows.join("\n")
}

/// Render the snapshot as pretty-printed JSON with a derived status
/// field.
pub fn export_json(data: &ExportData) -> anyhow::Result<String> {
    let value = serde_json::json!({
        "entries": data.entries,
        "current_average": data.current_average,
        "final_average": data.final_average,
        "exam_mode": data.exam_mode,
        "exam_weight": data.exam_weight,
        "exam_grade": data.exam_grade,
        "pass_grade": data.pass_grade,
        "status": if data.passed() { "passed" } else { "failed" },
        "exported_at": data.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
    });

    Ok(serde_json::to_string_pretty(&value)?)
}

/// Render the snapshot as a banner-framed plain-text report.
pub fn export_txt(data: &ExportData) -> String {
    let rule = "=".repeat(60);
    let thin_rule = "-".repeat(60);
    let mut lines: Vec<String> = Vec::new();

    lines.push(rule.clone());
    lines.push("GRADE REPORT".to_string());
    lines.push(rule.clone());
    lines.push(String::new());

    lines.push("ENTRIES:".to_string());
    lines.push(thin_rule.clone());

    for (index, entry) in data.filled_entries().enumerate() {
        lines.push(format!("{}. {}", index + 1, display_name(entry)));
        lines.push(format!("   Grade: {}/70", entry.value));
        lines.push(format!("   Weight: {}%", entry.weight));
        lines.push(format!("   Contribution: {:.2}", entry.contribution()));
        lines.push(String::new());
    }

    lines.push(rule.clone());
    lines.push("RESULTS:".to_string());
    lines.push(thin_rule);
    lines.push(format!("Current Average: {:.2}", data.current_average));

    if data.exam_mode {
        lines.push(String::new());
        lines.push("EXAM:".to_string());
        lines.push(format!("- Exam Weight: {}%", data.exam_weight));
        lines.push(format!(
            "- Exam Grade: {}",
            if data.exam_grade > 0.0 {
                data.exam_grade.to_string()
            } else {
                "not entered".to_string()
            }
        ));
        lines.push(format!("- Pass Grade: {}", data.pass_grade));
        lines.push(String::new());
        lines.push(format!("Final Average: {:.2}", data.final_average));
        lines.push(format!(
            "Status: {}",
            if data.passed() { "PASSED" } else { "FAILED" }
        ));
    }

    lines.push(String::new());
    lines.push(rule.clone());
    lines.push(format!(
        "Exported: {}",
        data.timestamp.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(rule);

    lines.join("\n")
}

/// Generate an export filename with an embedded timestamp,
/// e.g. "promedia-20260806153012.csv".
pub fn export_filename(format: ExportFormat, timestamp: DateTime<Local>) -> String {
    format!(
        "promedia-{}.{}",
        timestamp.format("%Y%m%d%H%M%S"),
        format.extension()
    )
}

/// Render the snapshot in the requested format.
pub fn render_export(data: &ExportData, format: ExportFormat) -> anyhow::Result<String> {
    match format {
        ExportFormat::Csv => Ok(export_csv(data)),
        ExportFormat::Json => export_json(data),
        ExportFormat::Txt => Ok(export_txt(data)),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn validation_marker(state: ValidationState) -> &'static str {
    match state {
        ValidationState::Valid => "ok",
        ValidationState::Invalid => "!!",
        ValidationState::Warning => "..",
        ValidationState::Neutral => "  ",
    }
}

/// Format the full results view for the `summary` subcommand.
/// One line per entry with its contribution, then the derived results.
pub fn format_summary(state: &CalculatorState, derived: &Derived, use_colors: bool) -> String {
    let mut lines: Vec<String> = Vec::new();

    let name_width = get_terminal_width()
        .map(|w| w.saturating_sub(34).clamp(12, 40))
        .unwrap_or(40);

    for (index, entry) in state.entries.iter().enumerate() {
        let marker = validation_marker(engine::entry_validation(entry, derived.available_weight));
        let name = truncate_name(display_name(entry), name_width);
        let line = format!(
            "{:>2}. {:<width$} {:>5} {:>5}% {:>7.2} {}",
            index + 1,
            name,
            entry.value,
            entry.weight,
            entry.contribution(),
            marker,
            width = name_width
        );
        if use_colors && marker == "!!" {
            lines.push(line.red().to_string());
        } else {
            lines.push(line);
        }
    }

    lines.push(String::new());

    let weight_state = engine::total_weight_validation(
        derived.total_weight,
        state.exam_mode,
        derived.available_weight,
    );
    let weight_line = if weight_state == ValidationState::Invalid {
        let limit = if state.exam_mode {
            derived.available_weight
        } else {
            100.0
        };
        engine::validation::weight_overflow_message(
            derived.total_weight,
            limit,
            state.exam_mode,
            state.exam_weight,
        )
    } else {
        format!(
            "Weights: {}% of {}% available",
            derived.total_weight, derived.available_weight
        )
    };
    lines.push(match weight_state {
        ValidationState::Invalid if use_colors => weight_line.red().bold().to_string(),
        ValidationState::Warning if use_colors => weight_line.yellow().to_string(),
        _ => weight_line,
    });

    lines.push(format!("Current average:  {:.2}", derived.current_average));

    if state.exam_mode {
        let verdict = if derived.passed(state.pass_grade) {
            let v = format!("PASSED (needs {})", state.pass_grade);
            if use_colors {
                v.green().bold().to_string()
            } else {
                v
            }
        } else {
            let v = format!("FAILED (needs {})", state.pass_grade);
            if use_colors {
                v.red().bold().to_string()
            } else {
                v
            }
        };
        lines.push(format!(
            "Final average:    {:.2}  {}",
            derived.final_average, verdict
        ));
        lines.push(format!(
            "Exam: {}% of the total, grade needed to pass: {:.1}",
            state.exam_weight, derived.needed_exam_grade
        ));
    }

    if derived.projected.remaining_percent > 0.0 {
        lines.push(format!(
            "Projected average: {:.2} ({}% unentered, assumed at the minimum)",
            derived.projected.average, derived.projected.remaining_percent
        ));
    }

    lines.push(format!("Recovery: {}", derived.recovery.message));

    if let Some(ref sim) = derived.simulation {
        let sim_line = format!(
            "Simulation: need {:.1} across {} future evaluation(s) worth {}% ({})",
            sim.needed_grade,
            state.future_count,
            state.future_percent,
            if sim.feasible {
                "attainable"
            } else {
                "not attainable"
            }
        );
        lines.push(if use_colors && !sim.feasible {
            sim_line.red().to_string()
        } else {
            sim_line
        });
    }

    lines.join("\n")
}

/// Format filled entries as tab-separated values for scripting.
/// Columns: name, grade, weight, contribution (no headers, no colors)
pub fn format_tsv(data: &ExportData) -> String {
    data.filled_entries()
        .map(|entry| {
            format!(
                "{}\t{}\t{}\t{:.2}",
                display_name(entry),
                entry.value,
                entry.weight,
                entry.contribution()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{reduce, Action};
    use chrono::TimeZone;

    fn sample_state() -> CalculatorState {
        let state = CalculatorState::default();
        let id0 = state.entries[0].id;
        let id1 = state.entries[1].id;
        let state = reduce(
            &state,
            Action::UpdateName {
                id: id0,
                name: "Midterm".to_string(),
            },
        );
        let state = reduce(&state, Action::UpdateValue { id: id0, value: 50.0 });
        let state = reduce(&state, Action::UpdateWeight { id: id0, weight: 40.0 });
        let state = reduce(&state, Action::UpdateValue { id: id1, value: 60.0 });
        reduce(&state, Action::UpdateWeight { id: id1, weight: 60.0 })
    }

    fn sample_timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 6, 15, 30, 12).unwrap()
    }

    #[test]
    fn test_export_csv_has_header_and_rows() {
        let state = sample_state();
        let derived = Derived::compute(&state);
        let data = ExportData::from_state(&state, &derived, sample_timestamp());

        let csv = export_csv(&data);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Name,Grade,Weight,Contribution");
        assert_eq!(lines[1], "\"Midterm\",50,40%,20.00");
        assert_eq!(lines[2], "\"Unnamed\",60,60%,36.00");
        assert!(csv.contains("Current Average,56.00"));
        assert!(csv.contains("Exported,2026-08-06 15:30:12"));
    }

    #[test]
    fn test_export_csv_skips_blank_entries() {
        let state = sample_state();
        let derived = Derived::compute(&state);
        let data = ExportData::from_state(&state, &derived, sample_timestamp());

        // Three entries in the state, only two are filled.
        let csv = export_csv(&data);
        let entry_rows = csv.lines().filter(|l| l.starts_with('"')).count();
        assert_eq!(entry_rows, 2);
    }

    #[test]
    fn test_export_csv_exam_block_only_in_exam_mode() {
        let state = sample_state();
        let derived = Derived::compute(&state);
        let data = ExportData::from_state(&state, &derived, sample_timestamp());
        assert!(!export_csv(&data).contains("Exam Grade"));

        let exam_state = reduce(&state, Action::SetExamMode(true));
        let exam_state = reduce(&exam_state, Action::SetExamGrade(55.0));
        let derived = Derived::compute(&exam_state);
        let data = ExportData::from_state(&exam_state, &derived, sample_timestamp());
        let csv = export_csv(&data);
        assert!(csv.contains("Exam Grade,55"));
        assert!(csv.contains("Status,Passed"));
    }

    #[test]
    fn test_csv_quotes_embedded_quotes() {
        assert_eq!(csv_quote("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_export_json_roundtrips_and_carries_status() {
        let state = sample_state();
        let derived = Derived::compute(&state);
        let data = ExportData::from_state(&state, &derived, sample_timestamp());

        let json = export_json(&data).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["current_average"], 56.0);
        assert_eq!(value["status"], "passed");
        assert_eq!(value["entries"].as_array().unwrap().len(), 3);
        assert_eq!(value["exported_at"], "2026-08-06 15:30:12");
    }

    #[test]
    fn test_export_txt_structure() {
        let state = reduce(&sample_state(), Action::SetExamMode(true));
        let derived = Derived::compute(&state);
        let data = ExportData::from_state(&state, &derived, sample_timestamp());

        let txt = export_txt(&data);
        assert!(txt.starts_with(&"=".repeat(60)));
        assert!(txt.contains("GRADE REPORT"));
        assert!(txt.contains("1. Midterm"));
        assert!(txt.contains("Grade: 50/70"));
        assert!(txt.contains("- Exam Grade: not entered"));
        assert!(txt.contains("Status: FAILED"));
    }

    #[test]
    fn test_export_filename_embeds_timestamp() {
        assert_eq!(
            export_filename(ExportFormat::Csv, sample_timestamp()),
            "promedia-20260806153012.csv"
        );
        assert_eq!(
            export_filename(ExportFormat::Json, sample_timestamp()),
            "promedia-20260806153012.json"
        );
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!(ExportFormat::parse("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("JSON"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("bmp"), None);
    }

    #[test]
    fn test_format_summary_plain() {
        let state = sample_state();
        let derived = Derived::compute(&state);
        let summary = format_summary(&state, &derived, false);

        assert!(summary.contains("Midterm"));
        assert!(summary.contains("Current average:  56.00"));
        assert!(summary.contains("Weights: 100% of 100% available"));
        assert!(summary.contains("Recovery:"));
        // No exam mode: no final-average line.
        assert!(!summary.contains("Final average"));
    }

    #[test]
    fn test_format_summary_overflow_banner() {
        let state = sample_state();
        let id = state.entries[2].id;
        let state = reduce(&state, Action::UpdateValue { id, value: 50.0 });
        let state = reduce(&state, Action::UpdateWeight { id, weight: 20.0 });
        let derived = Derived::compute(&state);
        let summary = format_summary(&state, &derived, false);
        assert!(summary.contains("Weights add up to 120% but the maximum is 100%"));
    }

    #[test]
    fn test_format_summary_exam_mode() {
        let state = reduce(&sample_state(), Action::SetExamMode(true));
        let state = reduce(&state, Action::SetExamGrade(60.0));
        let derived = Derived::compute(&state);
        let summary = format_summary(&state, &derived, false);

        assert!(summary.contains("Final average"));
        assert!(summary.contains("PASSED"));
    }

    #[test]
    fn test_format_tsv() {
        let state = sample_state();
        let derived = Derived::compute(&state);
        let data = ExportData::from_state(&state, &derived, sample_timestamp());

        let tsv = format_tsv(&data);
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Midterm\t50\t40\t20.00");
        assert_eq!(lines[0].split('\t').count(), 4);
    }

    #[test]
    fn test_truncate_name_unicode() {
        assert_eq!(truncate_name("Qu\u{ed}mica avanzada", 10), "Qu\u{ed}mica...");
        assert_eq!(truncate_name("Lab", 10), "Lab");
        assert_eq!(truncate_name("Lab", 2), "La");
    }
}
