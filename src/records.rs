//! Raw visit records and their normalization.
//!
//! The document store returns visit records as loosely-typed JSON: the
//! five age-category counts may arrive as numbers, numeric strings,
//! null, or be absent entirely. Normalization coerces every category to
//! a non-negative integer and recomputes the total; no record is ever
//! dropped here, however malformed — that call belongs to the views
//! that need a usable date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A visit record as received from the store, before coercion.
///
/// Unknown fields are ignored; every field the normalizer reads is
/// optional so a partial record still deserializes.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVisit {
    #[serde(default, alias = "_id")]
    pub id: Option<Value>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub balita: Option<Value>,
    #[serde(default)]
    pub anak: Option<Value>,
    #[serde(default)]
    pub remaja: Option<Value>,
    #[serde(default)]
    pub dewasa: Option<Value>,
    #[serde(default)]
    pub lansia: Option<Value>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
}

/// A visit record with all five category counts guaranteed numeric and
/// a recomputed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedVisit {
    pub id: Option<String>,
    /// Parsed day; `None` when the raw date is missing or unparseable.
    /// Date-keyed views skip such records, everything else keeps them.
    pub date: Option<NaiveDate>,
    /// Original date string, retained for display.
    pub date_raw: String,
    pub balita: u32,
    pub anak: u32,
    pub remaja: u32,
    pub dewasa: u32,
    pub lansia: u32,
    /// Saturating sum of the five categories, never trusted upstream.
    pub total: u32,
}

/// Coerce a loosely-typed category value to a non-negative count.
///
/// Numbers are used as-is, numeric strings are parsed; anything else
/// (null, absent, non-numeric, negative) becomes 0.
fn coerce_count(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() && n > 0.0 => n.round() as u32,
        _ => 0,
    }
}

/// Parse an ISO date string at day granularity.
///
/// Accepts both a bare `YYYY-MM-DD` and a full timestamp, in which
/// case only the leading date portion is read; the time component is
/// deliberately ignored so a UTC-suffixed timestamp cannot shift the
/// record to a neighboring local day.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn coerce_id(id: Option<&Value>) -> Option<String> {
    match id {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}

/// Normalize a batch of raw records, preserving cardinality and order.
pub fn normalize(raw: &[RawVisit]) -> Vec<NormalizedVisit> {
    raw.iter().map(normalize_one).collect()
}

fn normalize_one(raw: &RawVisit) -> NormalizedVisit {
    let balita = coerce_count(raw.balita.as_ref());
    let anak = coerce_count(raw.anak.as_ref());
    let remaja = coerce_count(raw.remaja.as_ref());
    let dewasa = coerce_count(raw.dewasa.as_ref());
    let lansia = coerce_count(raw.lansia.as_ref());

    let date_raw = raw.date.clone().unwrap_or_default();

    NormalizedVisit {
        id: coerce_id(raw.id.as_ref()),
        date: parse_day(&date_raw),
        date_raw,
        balita,
        anak,
        remaja,
        dewasa,
        lansia,
        total: [anak, remaja, dewasa, lansia]
            .into_iter()
            .fold(balita, u32::saturating_add),
    }
}
