//! Lap time records and typed field access
//!
//! Selectors address lap time fields by name (search keys, sort keys). Instead
//! of stringly-typed property lookup, every addressable field is a [`LapField`]
//! variant, and comparisons go through [`LapField::compare`] and
//! [`LapField::matches`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{DashboardError, Result};

/// Reference to the driver who set a lap time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverRef {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// A single completed lap, immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LapTime {
    pub id: u64,
    pub driver: DriverRef,
    pub car: String,
    pub track_name: String,
    /// Empty for tracks without named layouts
    #[serde(default)]
    pub track_config: String,
    /// Lap duration in seconds, smaller is faster
    pub time: f64,
    pub set_at: DateTime<Utc>,
}

impl LapTime {
    /// Owned copy of a single field, for display and debugging.
    pub fn value_of(&self, field: LapField) -> FieldValue {
        match field {
            LapField::Id => FieldValue::Integer(self.id as i64),
            LapField::DriverId => FieldValue::Integer(self.driver.id as i64),
            LapField::DriverName => FieldValue::Text(self.driver.name.clone()),
            LapField::Car => FieldValue::Text(self.car.clone()),
            LapField::TrackName => FieldValue::Text(self.track_name.clone()),
            LapField::TrackConfig => FieldValue::Text(self.track_config.clone()),
            LapField::Time => FieldValue::Number(self.time),
            LapField::SetAt => FieldValue::Timestamp(self.set_at),
        }
    }
}

/// Addressable lap time field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LapField {
    Id,
    DriverId,
    DriverName,
    Car,
    TrackName,
    TrackConfig,
    Time,
    SetAt,
}

impl LapField {
    pub const ALL: [LapField; 8] = [
        LapField::Id,
        LapField::DriverId,
        LapField::DriverName,
        LapField::Car,
        LapField::TrackName,
        LapField::TrackConfig,
        LapField::Time,
        LapField::SetAt,
    ];

    /// Wire name of the field
    pub fn as_str(self) -> &'static str {
        match self {
            LapField::Id => "id",
            LapField::DriverId => "driverId",
            LapField::DriverName => "driverName",
            LapField::Car => "car",
            LapField::TrackName => "trackName",
            LapField::TrackConfig => "trackConfig",
            LapField::Time => "time",
            LapField::SetAt => "setAt",
        }
    }

    /// Three-way comparison of this field between two laps.
    ///
    /// Total order: a NaN lap time ranks as slower than every finite time
    /// and equal to other NaNs.
    pub fn compare(self, a: &LapTime, b: &LapTime) -> Ordering {
        match self {
            LapField::Id => a.id.cmp(&b.id),
            LapField::DriverId => a.driver.id.cmp(&b.driver.id),
            LapField::DriverName => a.driver.name.cmp(&b.driver.name),
            LapField::Car => a.car.cmp(&b.car),
            LapField::TrackName => a.track_name.cmp(&b.track_name),
            LapField::TrackConfig => a.track_config.cmp(&b.track_config),
            LapField::Time => compare_times(a.time, b.time),
            LapField::SetAt => a.set_at.cmp(&b.set_at),
        }
    }

    /// Strict equality between this field of `lap` and `value`.
    ///
    /// Numbers compare numerically whether given as integer or float. A value
    /// of the wrong kind never matches.
    pub fn matches(self, lap: &LapTime, value: &FieldValue) -> bool {
        match (self, value) {
            (LapField::Id, v) => v.as_f64() == Some(lap.id as f64),
            (LapField::DriverId, v) => v.as_f64() == Some(lap.driver.id as f64),
            (LapField::Time, v) => v.as_f64() == Some(lap.time),
            (LapField::DriverName, FieldValue::Text(s)) => lap.driver.name == *s,
            (LapField::Car, FieldValue::Text(s)) => lap.car == *s,
            (LapField::TrackName, FieldValue::Text(s)) => lap.track_name == *s,
            (LapField::TrackConfig, FieldValue::Text(s)) => lap.track_config == *s,
            (LapField::SetAt, FieldValue::Timestamp(t)) => lap.set_at == *t,
            _ => false,
        }
    }
}

fn compare_times(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.total_cmp(&b),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

impl fmt::Display for LapField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LapField {
    type Err = DashboardError;

    /// Accepts both the camelCase wire names and snake_case.
    fn from_str(s: &str) -> Result<Self> {
        let field = match s {
            "id" => LapField::Id,
            "driverId" | "driver_id" => LapField::DriverId,
            "driverName" | "driver_name" => LapField::DriverName,
            "car" => LapField::Car,
            "trackName" | "track_name" => LapField::TrackName,
            "trackConfig" | "track_config" => LapField::TrackConfig,
            "time" => LapField::Time,
            "setAt" | "set_at" => LapField::SetAt,
            other => return Err(DashboardError::FieldNotFound { field: other.to_string() }),
        };
        Ok(field)
    }
}

/// A value to compare a [`LapField`] against.
///
/// Deserializes untagged: integers, then floats, then RFC 3339 timestamps,
/// then any other string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Number(f64),
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl FieldValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::lap;

    #[test]
    fn field_names_round_trip_through_from_str() {
        for field in LapField::ALL {
            assert_eq!(field.as_str().parse::<LapField>().unwrap(), field);
        }
        assert_eq!("track_config".parse::<LapField>().unwrap(), LapField::TrackConfig);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = "tyre".parse::<LapField>().unwrap_err();
        assert!(matches!(err, DashboardError::FieldNotFound { ref field } if field == "tyre"));
    }

    #[test]
    fn numeric_fields_match_integers_and_floats() {
        let l = lap(7, 3, "GT3", "Spa", "GP", 90.0);
        assert!(LapField::Id.matches(&l, &FieldValue::Integer(7)));
        assert!(LapField::Id.matches(&l, &FieldValue::Number(7.0)));
        assert!(LapField::Time.matches(&l, &FieldValue::Integer(90)));
        assert!(LapField::DriverId.matches(&l, &3u64.into()));
        assert!(!LapField::Id.matches(&l, &"7".into()));
    }

    #[test]
    fn text_fields_require_exact_text() {
        let l = lap(1, 1, "GT3", "Spa", "GP", 90.0);
        assert!(LapField::Car.matches(&l, &"GT3".into()));
        assert!(!LapField::Car.matches(&l, &"gt3".into()));
        assert!(!LapField::TrackName.matches(&l, &FieldValue::Integer(0)));
    }

    #[test]
    fn nan_times_rank_after_finite_times() {
        let nan = lap(1, 1, "GT3", "Spa", "GP", f64::NAN);
        let fast = lap(2, 1, "GT3", "Spa", "GP", 80.0);
        assert_eq!(LapField::Time.compare(&nan, &fast), Ordering::Greater);
        assert_eq!(LapField::Time.compare(&fast, &nan), Ordering::Less);
        assert_eq!(LapField::Time.compare(&nan, &nan.clone()), Ordering::Equal);
    }

    #[test]
    fn sorting_with_nan_times_keeps_finite_times_ordered() {
        let mut laps: Vec<LapTime> = (0..60u64)
            .map(|i| {
                let time = if i % 7 == 0 { f64::NAN } else { 120.0 - ((i * 37) % 50) as f64 };
                lap(i, 1, "GT3", "Spa", "GP", time)
            })
            .collect();
        laps.sort_by(|a, b| LapField::Time.compare(a, b));

        let finite: Vec<f64> = laps.iter().map(|l| l.time).take_while(|t| !t.is_nan()).collect();
        assert_eq!(finite.len(), 51);
        assert!(finite.windows(2).all(|w| w[0] <= w[1]));
        assert!(laps[51..].iter().all(|l| l.time.is_nan()));
    }

    #[test]
    fn field_value_deserializes_untagged() {
        let v: FieldValue = serde_json::from_str("12").unwrap();
        assert_eq!(v, FieldValue::Integer(12));
        let v: FieldValue = serde_json::from_str("88.2").unwrap();
        assert_eq!(v, FieldValue::Number(88.2));
        let v: FieldValue = serde_json::from_str("\"2024-03-01T10:00:00Z\"").unwrap();
        assert!(matches!(v, FieldValue::Timestamp(_)));
        let v: FieldValue = serde_json::from_str("\"Spa\"").unwrap();
        assert_eq!(v, FieldValue::Text("Spa".into()));
    }

    #[test]
    fn lap_time_uses_camel_case_wire_names() {
        let json = r#"{
            "id": 4,
            "driver": {"id": 2, "name": "Ana"},
            "car": "Porsche 911 GT3 R",
            "trackName": "Spa-Francorchamps",
            "trackConfig": "Grand Prix Pits",
            "time": 137.412,
            "setAt": "2024-05-11T18:22:03Z"
        }"#;
        let lap: LapTime = serde_json::from_str(json).unwrap();
        assert_eq!(lap.driver.name, "Ana");
        assert_eq!(lap.track_config, "Grand Prix Pits");
        assert_eq!(lap.value_of(LapField::Time), FieldValue::Number(137.412));
    }
}
