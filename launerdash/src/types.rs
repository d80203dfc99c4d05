//! Types that mirror the backend's JSON schema.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize, Clone)]
pub struct LoginResponse {
    pub access_token: String,
}

/// One row of a top-processes list. CPU and memory endpoints name the value differently.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProcessUsage {
    #[serde(default)]
    pub pid: Option<u32>,
    pub name: String,
    #[serde(default)]
    pub cpu_percent: Option<f64>,
    #[serde(default)]
    pub memory_percent: Option<f64>,
}

/// `cpu_values` / `mem_values` of `/current-usages`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UsageValues {
    pub total_usage: f64,
    #[serde(default)]
    pub top_processes: Vec<ProcessUsage>,
    #[serde(default, deserialize_with = "average")]
    pub last_hourly_avg: Option<f64>,
    #[serde(default, deserialize_with = "average")]
    pub last_daily_avg: Option<f64>,
    #[serde(default, deserialize_with = "average")]
    pub last_weekly_avg: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CurrentUsages {
    pub cpu_values: UsageValues,
    pub mem_values: UsageValues,
}

/// `/cpu-usage` and `/memory-usage` payload.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LegacyUsage {
    #[serde(alias = "total_cpu_usage", alias = "total_memory_usage")]
    pub total_usage: f64,
    #[serde(default)]
    pub top_processes: Vec<ProcessUsage>,
    #[serde(default, deserialize_with = "average")]
    pub last_hourly: Option<f64>,
    #[serde(default, deserialize_with = "average")]
    pub last_daily: Option<f64>,
    #[serde(default, deserialize_with = "average")]
    pub last_weekly: Option<f64>,
}

/// `(time, {name: value})`, names kept in the order the backend ranked them.
pub type SeriesPair = (String, IndexMap<String, f64>);

/// A last-hour total sample. The backend sends either a pair or a flat object.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum TotalSample {
    Pair(SeriesPair),
    Flat {
        time: String,
        #[serde(flatten)]
        metrics: IndexMap<String, f64>,
    },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LastHour {
    #[serde(default)]
    pub total_data: Vec<TotalSample>,
    #[serde(default)]
    pub cpu_data: Vec<SeriesPair>,
    #[serde(default)]
    pub memory_data: Vec<SeriesPair>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LastHourServices {
    #[serde(default)]
    pub cpu: Vec<SeriesPair>,
    #[serde(default)]
    pub memory: Vec<SeriesPair>,
}

// Averages come as a number, null, or a stored row carrying `uso`.
fn average<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Row { uso: Option<f64> },
        Other(serde_json::Value),
    }
    Ok(match Option::<Repr>::deserialize(d)? {
        Some(Repr::Number(v)) => Some(v),
        Some(Repr::Row { uso }) => uso,
        Some(Repr::Other(_)) | None => None,
    })
}
