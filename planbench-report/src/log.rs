//! Log Report Format
//!
//! Line-oriented, self-describing text format. The header carries run
//! metadata and the serialized problem; each entry block declares its
//! property columns before listing one line per run.
//!
//! ```text
//! Experiment <name>
//! Running on <host>
//! Starting at <timestamp>
//! <<<|
//! <payload tag>
//! <problem>
//! |>>>
//! <allowed time> seconds per run
//! <duration> seconds spent to collect the data
//! <count> planners
//! <backend>_<algorithm>
//! 0 common properties
//! <n> properties for each run
//! <property 1>
//! ...
//! <m> runs
//! <value 1>; <value 2>; ... <value n>;
//! .
//! ```
//!
//! A run missing a property writes an empty field in that column.

use crate::report::{BenchmarkReport, ReportEntry, ReportMeta};
use chrono::NaiveDateTime;
use planbench_metrics::{MetricKey, TrialRecord};
use std::collections::BTreeMap;
use std::io::{self, Write};
use thiserror::Error;

const PAYLOAD_OPEN: &str = "<<<|";
const PAYLOAD_CLOSE: &str = "|>>>";
const FIELD_SEPARATOR: &str = "; ";
const ENTRY_END: &str = ".";

/// Write a report in log format
pub fn write_log_report<W: Write>(report: &BenchmarkReport, out: &mut W) -> io::Result<()> {
    let meta = &report.meta;
    writeln!(out, "Experiment {}", meta.experiment_label())?;
    writeln!(out, "Running on {}", meta.host_label())?;
    writeln!(out, "Starting at {}", meta.started_at_label())?;
    writeln!(out, "{}", PAYLOAD_OPEN)?;
    writeln!(out, "{}", meta.payload_tag)?;
    writeln!(out, "{}", meta.problem)?;
    writeln!(out, "{}", PAYLOAD_CLOSE)?;
    writeln!(out, "{} seconds per run", meta.allowed_planning_time)?;
    writeln!(out, "{} seconds spent to collect the data", meta.duration_secs)?;
    writeln!(out, "{} planners", meta.planner_count)?;

    for entry in &report.entries {
        write_entry(entry, out)?;
    }
    Ok(())
}

fn write_entry<W: Write>(entry: &ReportEntry, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", entry.label)?;
    writeln!(out, "0 common properties")?;
    writeln!(out, "{} properties for each run", entry.properties.len())?;
    for property in &entry.properties {
        writeln!(out, "{}", property)?;
    }
    writeln!(out, "{} runs", entry.runs.len())?;
    for run in &entry.runs {
        for property in &entry.properties {
            write!(out, "{}{}", run.get(property).unwrap_or(""), FIELD_SEPARATOR)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "{}", ENTRY_END)
}

/// Render a report in log format
pub fn generate_log_report(report: &BenchmarkReport) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_log_report(report, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Error reading a log report
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, found '{found}'")]
    Unexpected {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("unexpected end of report, expected {0}")]
    UnexpectedEof(String),
}

struct Lines<'a> {
    lines: std::iter::Peekable<std::iter::Enumerate<std::str::Lines<'a>>>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate().peekable(),
        }
    }

    fn next(&mut self, expected: &str) -> Result<(usize, &'a str), ParseError> {
        self.lines
            .next()
            .map(|(i, l)| (i + 1, l))
            .ok_or_else(|| ParseError::UnexpectedEof(expected.to_string()))
    }

    fn at_end(&mut self) -> bool {
        self.lines.peek().is_none()
    }

    /// Next line with `prefix` stripped
    fn prefixed(&mut self, prefix: &str) -> Result<&'a str, ParseError> {
        let (line, text) = self.next(prefix)?;
        text.strip_prefix(prefix)
            .ok_or_else(|| unexpected(line, prefix, text))
    }

    /// Next line with `suffix` stripped
    fn suffixed(&mut self, suffix: &str) -> Result<(usize, &'a str), ParseError> {
        let (line, text) = self.next(suffix)?;
        text.strip_suffix(suffix)
            .map(|rest| (line, rest))
            .ok_or_else(|| unexpected(line, suffix, text))
    }

    fn exact(&mut self, expected: &str) -> Result<(), ParseError> {
        let (line, text) = self.next(expected)?;
        if text == expected {
            Ok(())
        } else {
            Err(unexpected(line, expected, text))
        }
    }

    fn number<T: std::str::FromStr>(&mut self, suffix: &str) -> Result<T, ParseError> {
        let (line, text) = self.suffixed(suffix)?;
        text.parse()
            .map_err(|_| unexpected(line, &format!("a number before '{}'", suffix), text))
    }
}

fn unexpected(line: usize, expected: &str, found: &str) -> ParseError {
    ParseError::Unexpected {
        line,
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

/// Read a log report back.
///
/// Empty fields become missing metrics. `NO_NAME` and `UNKNOWN` header
/// values are kept literally.
pub fn parse_log_report(text: &str) -> Result<BenchmarkReport, ParseError> {
    let mut lines = Lines::new(text);

    let experiment = lines.prefixed("Experiment ")?.to_string();
    let host = lines.prefixed("Running on ")?.to_string();
    let started_label = lines.prefixed("Starting at ")?;
    let started_at = NaiveDateTime::parse_from_str(started_label, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|_| unexpected(3, "an ISO-8601 timestamp", started_label))?
        .and_utc();

    lines.exact(PAYLOAD_OPEN)?;
    let (_, payload_tag) = lines.next("payload tag")?;
    let mut problem_lines = Vec::new();
    loop {
        let (_, text) = lines.next(PAYLOAD_CLOSE)?;
        if text == PAYLOAD_CLOSE {
            break;
        }
        problem_lines.push(text);
    }

    let allowed_planning_time = lines.number(" seconds per run")?;
    let duration_secs = lines.number(" seconds spent to collect the data")?;
    let planner_count = lines.number(" planners")?;

    let mut entries = Vec::new();
    while !lines.at_end() {
        entries.push(parse_entry(&mut lines)?);
    }

    Ok(BenchmarkReport {
        meta: ReportMeta {
            experiment,
            host,
            started_at,
            payload_tag: payload_tag.to_string(),
            problem: problem_lines.join("\n"),
            allowed_planning_time,
            duration_secs,
            planner_count,
        },
        entries,
    })
}

fn parse_entry(lines: &mut Lines<'_>) -> Result<ReportEntry, ParseError> {
    let (_, label) = lines.next("entry label")?;
    let common: usize = lines.number(" common properties")?;
    for _ in 0..common {
        lines.next("common property")?;
    }

    let property_count: usize = lines.number(" properties for each run")?;
    let mut properties = Vec::with_capacity(property_count);
    for _ in 0..property_count {
        let (line, text) = lines.next("property name")?;
        let key = MetricKey::parse(text).ok_or_else(|| unexpected(line, "'<name> <KIND>'", text))?;
        properties.push(key);
    }

    let run_count: usize = lines.number(" runs")?;
    let mut runs = Vec::with_capacity(run_count);
    for _ in 0..run_count {
        let (line, text) = lines.next("run values")?;
        let fields = split_fields(text, property_count)
            .ok_or_else(|| {
                unexpected(line, &format!("{} '; '-terminated fields", property_count), text)
            })?;
        let values: BTreeMap<MetricKey, String> = properties
            .iter()
            .zip(&fields)
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();
        runs.push(TrialRecord::from_rendered(values));
    }

    lines.exact(ENTRY_END)?;

    Ok(ReportEntry {
        label: label.to_string(),
        properties,
        runs,
    })
}

/// Split a run line into exactly `count` fields.
///
/// Trailing whitespace after the final separator is optional.
fn split_fields(text: &str, count: usize) -> Option<Vec<&str>> {
    let trimmed = text.trim_end();
    if count == 0 {
        return trimmed.is_empty().then(Vec::new);
    }
    let fields: Vec<&str> = trimmed.strip_suffix(';')?.split(FIELD_SEPARATOR).collect();
    (fields.len() == count).then_some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportBuilder;
    use chrono::{TimeZone, Utc};

    fn sample_report() -> BenchmarkReport {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap();
        let mut builder = ReportBuilder::new("kitchen", "lab-01", start)
            .with_problem("JSON", "{\n  \"group_name\": \"arm\"\n}")
            .with_allowed_planning_time(5.0);
        builder.push_entry(
            "ompl_RRT",
            vec![
                TrialRecord::builder()
                    .real("total_time", 0.5)
                    .boolean("solved", false)
                    .build(),
                TrialRecord::builder()
                    .real("total_time", 0.25)
                    .boolean("solved", true)
                    .real("process_time", 0.125)
                    .build(),
            ],
        );
        builder.finish(2.5)
    }

    #[test]
    fn test_multiline_names_round_trip() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap();
        let mut builder = ReportBuilder::new("two\nlines", "lab-01", start)
            .with_problem("JSON", "{}")
            .with_allowed_planning_time(1.0);
        builder.push_entry(
            "multi\nline_rrt",
            vec![TrialRecord::builder().boolean("solved", false).build()],
        );
        let report = builder.finish(1.0);

        let parsed = parse_log_report(&generate_log_report(&report)).unwrap();

        assert_eq!(parsed.meta.experiment, "two lines");
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_exact_layout() {
        let text = generate_log_report(&sample_report());
        let expected = [
            "Experiment kitchen",
            "Running on lab-01",
            "Starting at 2024-03-01T09:15:00.000000",
            "<<<|",
            "JSON",
            "{",
            "  \"group_name\": \"arm\"",
            "}",
            "|>>>",
            "5 seconds per run",
            "2.5 seconds spent to collect the data",
            "1 planners",
            "ompl_RRT",
            "0 common properties",
            "3 properties for each run",
            "process_time REAL",
            "solved BOOLEAN",
            "total_time REAL",
            "2 runs",
            "; 0; 0.5; ",
            "0.125; 1; 0.25; ",
            ".",
            "",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_run_lines_have_one_field_per_property() {
        let text = generate_log_report(&sample_report());
        let run_lines: Vec<_> = text
            .lines()
            .skip_while(|l| *l != "2 runs")
            .skip(1)
            .take(2)
            .collect();
        for line in run_lines {
            assert_eq!(line.matches("; ").count(), 3);
        }
    }

    #[test]
    fn test_parse_recovers_report() {
        let report = sample_report();
        let parsed = parse_log_report(&generate_log_report(&report)).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_parse_treats_empty_fields_as_missing() {
        let parsed = parse_log_report(&generate_log_report(&sample_report())).unwrap();
        let first = &parsed.entries[0].runs[0];
        assert_eq!(first.len(), 2);
        assert_eq!(first.real("process_time"), None);
    }

    #[test]
    fn test_parse_rejects_short_run_line() {
        let text = generate_log_report(&sample_report()).replace("; 0; 0.5; \n", "0; \n");
        let err = parse_log_report(&text).unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { line: 20, .. }));
    }

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("; 0; 0.5; ", 3), Some(vec!["", "0", "0.5"]));
        assert_eq!(split_fields("0.1; ;", 2), Some(vec!["0.1", ""]));
        assert_eq!(split_fields("; ", 1), Some(vec![""]));
        assert_eq!(split_fields("", 0), Some(Vec::new()));
        assert_eq!(split_fields("0.1; 2", 2), None);
        assert_eq!(split_fields("0.1; ", 2), None);
    }

    #[test]
    fn test_parse_truncated_report() {
        let text = generate_log_report(&sample_report());
        let truncated: String = text.lines().take(15).map(|l| format!("{}\n", l)).collect();
        assert!(matches!(
            parse_log_report(&truncated),
            Err(ParseError::UnexpectedEof(_))
        ));
    }
}
