//! Metric model and the aggregation rule shared by every storage backend

use crate::utils::error::{MetricsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Current persisted state: metric id to metric
pub type Snapshot = BTreeMap<String, Metric>;

/// Metrics transmitted together; order carries no meaning
pub type Batch = Vec<Metric>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl FromStr for MetricKind {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gauge" => Ok(MetricKind::Gauge),
            "counter" => Ok(MetricKind::Counter),
            other => Err(MetricsError::invalid_metric(format!(
                "unrecognized metric type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gauges carry an absolute value, counters a signed delta
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Gauge(f64),
    Counter(i64),
}

impl MetricValue {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Gauge(_) => MetricKind::Gauge,
            MetricValue::Counter(_) => MetricKind::Counter,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Gauge(value) => write!(f, "{}", value),
            MetricValue::Counter(delta) => write!(f, "{}", delta),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MetricRecord", into = "MetricRecord")]
pub struct Metric {
    pub id: String,
    pub value: MetricValue,
}

impl Metric {
    pub fn gauge<S: Into<String>>(id: S, value: f64) -> Self {
        Self {
            id: id.into(),
            value: MetricValue::Gauge(value),
        }
    }

    pub fn counter<S: Into<String>>(id: S, delta: i64) -> Self {
        Self {
            id: id.into(),
            value: MetricValue::Counter(delta),
        }
    }

    /// Build a metric from the path segments of the legacy update endpoint
    pub fn parse(kind: &str, id: &str, raw: &str) -> Result<Self> {
        let kind = MetricKind::from_str(kind)?;
        let value = match kind {
            MetricKind::Gauge => raw.parse::<f64>().map(MetricValue::Gauge).map_err(|e| {
                MetricsError::bad_request(format!("invalid gauge value '{}': {}", raw, e))
            })?,
            MetricKind::Counter => raw.parse::<i64>().map(MetricValue::Counter).map_err(|e| {
                MetricsError::bad_request(format!("invalid counter delta '{}': {}", raw, e))
            })?,
        };
        Ok(Self {
            id: id.to_string(),
            value,
        })
    }

    pub fn kind(&self) -> MetricKind {
        self.value.kind()
    }

    /// Reject metrics that no backend may store
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(MetricsError::invalid_metric("metric id is empty"));
        }
        Ok(())
    }

    /// Combine `incoming` with the currently stored metric of the same id
    ///
    /// A counter arriving on a counter adds its delta. Every other pairing,
    /// including a kind change, replaces the stored metric.
    pub fn aggregate(existing: Option<&Metric>, incoming: Metric) -> Metric {
        match (existing.map(|m| m.value), incoming.value) {
            (Some(MetricValue::Counter(stored)), MetricValue::Counter(delta)) => Metric {
                value: MetricValue::Counter(stored.wrapping_add(delta)),
                ..incoming
            },
            _ => incoming,
        }
    }

    /// Apply `incoming` to `snapshot` under the aggregation rule
    pub fn apply(snapshot: &mut Snapshot, incoming: Metric) -> Result<()> {
        incoming.validate()?;
        let merged = Self::aggregate(snapshot.get(&incoming.id), incoming);
        snapshot.insert(merged.id.clone(), merged);
        Ok(())
    }
}

/// Wire shape `{id, type, delta?, value?}` used by every JSON surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl TryFrom<MetricRecord> for Metric {
    type Error = MetricsError;

    fn try_from(record: MetricRecord) -> Result<Self> {
        let value = match MetricKind::from_str(&record.kind)? {
            MetricKind::Gauge => MetricValue::Gauge(record.value.ok_or_else(|| {
                MetricsError::invalid_metric(format!("gauge '{}' carries no value", record.id))
            })?),
            MetricKind::Counter => MetricValue::Counter(record.delta.ok_or_else(|| {
                MetricsError::invalid_metric(format!("counter '{}' carries no delta", record.id))
            })?),
        };
        Ok(Metric {
            id: record.id,
            value,
        })
    }
}

impl From<Metric> for MetricRecord {
    fn from(metric: Metric) -> Self {
        let kind = metric.kind().as_str().to_string();
        let (delta, value) = match metric.value {
            MetricValue::Gauge(value) => (None, Some(value)),
            MetricValue::Counter(delta) => (Some(delta), None),
        };
        MetricRecord {
            id: metric.id,
            kind,
            delta,
            value,
        }
    }
}

/// Lookup body of the JSON value endpoint: `{id, type}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricQuery {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MetricKind,
}
