//! Payload -> display shapes. Pure functions, no I/O.

use indexmap::IndexMap;

use crate::types::{LegacyUsage, ProcessUsage, SeriesPair, TotalSample, UsageValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Cpu,
    Memory,
}

/// Ranked list entry. `None` when the row carried no value for the resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    pub label: &'static str,
    pub value: f64,
}

/// Current-instant view of one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSnapshot {
    pub total_usage: f64,
    pub top_entries: Vec<Entry>,
    pub hourly_avg: Option<f64>,
    pub daily_avg: Option<f64>,
    pub weekly_avg: Option<f64>,
}

/// A chart sample: time label plus named metrics. Missing keys read as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub time: String,
    pub metrics: IndexMap<String, f64>,
}

impl SeriesPoint {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).copied()
    }
}

/// Used/free halves of a binary donut.
pub fn pie_pair(total_usage: f64) -> [PieSlice; 2] {
    let used = total_usage.clamp(0.0, 100.0);
    [
        PieSlice {
            label: "used",
            value: used,
        },
        PieSlice {
            label: "free",
            value: 100.0 - used,
        },
    ]
}

pub fn per_entity(entries: &[Entry]) -> Vec<Entry> {
    entries.to_vec()
}

/// `(time, {k: v})` pairs -> flat points, input order kept.
pub fn flatten_series(pairs: Vec<SeriesPair>) -> Vec<SeriesPoint> {
    pairs
        .into_iter()
        .map(|(time, metrics)| SeriesPoint { time, metrics })
        .collect()
}

pub fn total_series(samples: Vec<TotalSample>) -> Vec<SeriesPoint> {
    samples
        .into_iter()
        .map(|s| match s {
            TotalSample::Pair((time, metrics)) | TotalSample::Flat { time, metrics } => {
                SeriesPoint { time, metrics }
            }
        })
        .collect()
}

/// Metric names to plot, taken from the first point only.
pub fn series_keys(points: &[SeriesPoint]) -> Vec<String> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let keys: Vec<String> = first.metrics.keys().cloned().collect();
    if let Some(extra) = points
        .iter()
        .skip(1)
        .flat_map(|p| p.metrics.keys())
        .find(|k| !first.metrics.contains_key(*k))
    {
        tracing::debug!(key = %extra, "series key absent from first sample is not plotted");
    }
    keys
}

pub fn usage_snapshot(raw: &UsageValues, resource: Resource) -> UsageSnapshot {
    UsageSnapshot {
        total_usage: raw.total_usage,
        top_entries: entries_for(&raw.top_processes, resource),
        hourly_avg: raw.last_hourly_avg,
        daily_avg: raw.last_daily_avg,
        weekly_avg: raw.last_weekly_avg,
    }
}

pub fn legacy_snapshot(raw: &LegacyUsage, resource: Resource) -> UsageSnapshot {
    UsageSnapshot {
        total_usage: raw.total_usage,
        top_entries: raw
            .top_processes
            .iter()
            .map(|p| Entry {
                name: match p.pid {
                    Some(pid) => format!("{} (PID: {pid})", p.name),
                    None => p.name.clone(),
                },
                value: value_for(p, resource),
            })
            .collect(),
        hourly_avg: raw.last_hourly,
        daily_avg: raw.last_daily,
        weekly_avg: raw.last_weekly,
    }
}

fn entries_for(procs: &[ProcessUsage], resource: Resource) -> Vec<Entry> {
    procs
        .iter()
        .map(|p| Entry {
            name: p.name.clone(),
            value: value_for(p, resource),
        })
        .collect()
}

fn value_for(p: &ProcessUsage, resource: Resource) -> Option<f64> {
    match resource {
        Resource::Cpu => p.cpu_percent,
        Resource::Memory => p.memory_percent,
    }
}
