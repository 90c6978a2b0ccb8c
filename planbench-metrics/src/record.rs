//! Trial Records
//!
//! A [`TrialRecord`] maps typed metric keys to their string-formatted values
//! for exactly one trial. Keys render as `"<name> <KIND>"`, which is also the
//! column name written to the report, and order byte-lexicographically on
//! that rendering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value kind of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// `1` or `0`
    Boolean,
    /// Decimal real number
    Real,
}

impl MetricKind {
    /// Tag written after the metric name
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Boolean => "BOOLEAN",
            MetricKind::Real => "REAL",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "BOOLEAN" => Some(MetricKind::Boolean),
            "REAL" => Some(MetricKind::Real),
            _ => None,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric name tagged with its kind.
///
/// Stored in rendered form so ordering matches the report columns exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricKey(String);

impl MetricKey {
    /// Create a key from a name and kind
    pub fn new(name: &str, kind: MetricKind) -> Self {
        Self(format!("{} {}", name, kind))
    }

    /// Boolean metric key
    pub fn boolean(name: &str) -> Self {
        Self::new(name, MetricKind::Boolean)
    }

    /// Real metric key
    pub fn real(name: &str) -> Self {
        Self::new(name, MetricKind::Real)
    }

    /// Parse a rendered key (`"total_time REAL"`)
    pub fn parse(label: &str) -> Option<Self> {
        let (name, tag) = label.rsplit_once(' ')?;
        if name.is_empty() {
            return None;
        }
        MetricKind::from_tag(tag).map(|kind| Self::new(name, kind))
    }

    /// Metric name without the kind tag
    pub fn name(&self) -> &str {
        self.0.rsplit_once(' ').map_or(self.0.as_str(), |(n, _)| n)
    }

    /// Kind of the metric
    pub fn kind(&self) -> MetricKind {
        match self.0.rsplit_once(' ') {
            Some((_, "BOOLEAN")) => MetricKind::Boolean,
            _ => MetricKind::Real,
        }
    }

    /// Rendered label
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Typed metric value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// Boolean value
    Boolean(bool),
    /// Real value
    Real(f64),
}

impl MetricValue {
    /// Kind of this value
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Boolean(_) => MetricKind::Boolean,
            MetricValue::Real(_) => MetricKind::Real,
        }
    }

    /// Report rendering: `1`/`0` for booleans, shortest round-trip decimal
    /// for reals.
    pub fn render(&self) -> String {
        match self {
            MetricValue::Boolean(true) => "1".to_string(),
            MetricValue::Boolean(false) => "0".to_string(),
            MetricValue::Real(v) => v.to_string(),
        }
    }

    /// Parse a rendered value of the given kind
    pub fn parse(kind: MetricKind, text: &str) -> Option<Self> {
        match kind {
            MetricKind::Boolean => match text {
                "1" => Some(MetricValue::Boolean(true)),
                "0" => Some(MetricValue::Boolean(false)),
                _ => None,
            },
            MetricKind::Real => text.parse().ok().map(MetricValue::Real),
        }
    }
}

/// Metrics of one trial. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrialRecord {
    values: BTreeMap<MetricKey, String>,
}

impl TrialRecord {
    /// Start building a record
    pub fn builder() -> TrialRecordBuilder {
        TrialRecordBuilder::default()
    }

    /// Build a record from already rendered values
    pub fn from_rendered(values: BTreeMap<MetricKey, String>) -> Self {
        Self { values }
    }

    /// Rendered value of a metric
    pub fn get(&self, key: &MetricKey) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Real metric by name
    pub fn real(&self, name: &str) -> Option<f64> {
        self.get(&MetricKey::real(name))?.parse().ok()
    }

    /// Boolean metric by name
    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(&MetricKey::boolean(name))? {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        }
    }

    /// Whether the metric is present
    pub fn contains(&self, key: &MetricKey) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &MetricKey> {
        self.values.keys()
    }

    /// `(key, rendered value)` pairs in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&MetricKey, &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Number of metrics
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record has no metrics
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Accumulates metrics for a [`TrialRecord`]
#[derive(Debug, Default)]
pub struct TrialRecordBuilder {
    values: BTreeMap<MetricKey, String>,
}

impl TrialRecordBuilder {
    /// Record a typed value
    pub fn value(mut self, name: &str, value: MetricValue) -> Self {
        self.values
            .insert(MetricKey::new(name, value.kind()), value.render());
        self
    }

    /// Record a real metric
    pub fn real(self, name: &str, value: f64) -> Self {
        self.value(name, MetricValue::Real(value))
    }

    /// Record a boolean metric
    pub fn boolean(self, name: &str, value: bool) -> Self {
        self.value(name, MetricValue::Boolean(value))
    }

    /// Finish the record
    pub fn build(self) -> TrialRecord {
        TrialRecord {
            values: self.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_rendering_and_parts() {
        let key = MetricKey::real("path_plan_length");
        assert_eq!(key.as_str(), "path_plan_length REAL");
        assert_eq!(key.name(), "path_plan_length");
        assert_eq!(key.kind(), MetricKind::Real);
        assert_eq!(MetricKey::boolean("solved").kind(), MetricKind::Boolean);
    }

    #[test]
    fn test_key_parse() {
        assert_eq!(
            MetricKey::parse("solved BOOLEAN"),
            Some(MetricKey::boolean("solved"))
        );
        assert_eq!(MetricKey::parse("solved"), None);
        assert_eq!(MetricKey::parse("solved INTEGER"), None);
        assert_eq!(MetricKey::parse(" REAL"), None);
    }

    #[test]
    fn test_keys_sort_on_rendered_label() {
        // ' ' sorts before '_', so "total_time REAL" precedes "total_time_x REAL"
        let mut keys = vec![
            MetricKey::real("total_time_x"),
            MetricKey::boolean("solved"),
            MetricKey::real("total_time"),
            MetricKey::real("process_time"),
        ];
        keys.sort();
        let labels: Vec<_> = keys.iter().map(MetricKey::as_str).collect();
        assert_eq!(
            labels,
            vec![
                "process_time REAL",
                "solved BOOLEAN",
                "total_time REAL",
                "total_time_x REAL"
            ]
        );
    }

    #[test]
    fn test_value_rendering() {
        assert_eq!(MetricValue::Boolean(true).render(), "1");
        assert_eq!(MetricValue::Boolean(false).render(), "0");
        assert_eq!(MetricValue::Real(3.0).render(), "3");
        assert_eq!(MetricValue::Real(0.1).render(), "0.1");
        assert_eq!(MetricValue::Real(1e-7).render(), "0.0000001");
    }

    #[test]
    fn test_real_rendering_parses_back_exactly() {
        let v = 0.1 + 0.2;
        let rendered = MetricValue::Real(v).render();
        assert_eq!(
            MetricValue::parse(MetricKind::Real, &rendered),
            Some(MetricValue::Real(v))
        );
    }

    #[test]
    fn test_record_accessors() {
        let record = TrialRecord::builder()
            .real("total_time", 0.25)
            .boolean("solved", true)
            .build();

        assert_eq!(record.len(), 2);
        assert_eq!(record.real("total_time"), Some(0.25));
        assert_eq!(record.boolean("solved"), Some(true));
        assert_eq!(record.real("solved"), None);
        assert_eq!(record.get(&MetricKey::boolean("solved")), Some("1"));
    }

    #[test]
    fn test_record_serializes_as_flat_map() {
        let record = TrialRecord::builder().boolean("solved", false).build();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"solved BOOLEAN":"0"}"#);
    }
}
