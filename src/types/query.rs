//! Query parameters for lap time views

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use super::laptime::{FieldValue, LapField, LapTime};
use crate::{DashboardError, Result};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    /// Apply this direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(DashboardError::validation("sortOrder", format!("expected ASC or DESC, got {s}")))
        }
    }
}

/// Single-field sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortParams {
    pub sort_by: LapField,
    pub sort_order: SortOrder,
}

impl SortParams {
    pub fn new(sort_by: LapField, sort_order: SortOrder) -> Self {
        Self { sort_by, sort_order }
    }

    /// Comparator for `slice::sort_by`. Descending flips the comparison
    /// result, so equal keys still keep their relative order.
    pub fn compare(&self, a: &LapTime, b: &LapTime) -> Ordering {
        self.sort_order.apply(self.sort_by.compare(a, b))
    }
}

impl Default for SortParams {
    fn default() -> Self {
        Self { sort_by: LapField::Time, sort_order: SortOrder::Asc }
    }
}

/// Equality predicate on one lap time field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParam {
    pub search_key: LapField,
    pub search_value: FieldValue,
}

impl SearchParam {
    pub fn new(search_key: LapField, search_value: impl Into<FieldValue>) -> Self {
        Self { search_key, search_value: search_value.into() }
    }

    pub fn matches(&self, lap: &LapTime) -> bool {
        self.search_key.matches(lap, &self.search_value)
    }
}

/// Everything the filtered lap time view needs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    #[serde(default)]
    pub sort_params: SortParams,
    #[serde(default)]
    pub search_params: Vec<SearchParam>,
    /// No driver selected means the driver-filtered set is empty
    #[serde(default)]
    pub show_for_driver_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_order_parses_case_insensitively() {
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn descending_flips_only_strict_orderings() {
        assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn filter_params_deserialize_from_wire_shape() {
        let json = r#"{
            "sortParams": {"sortBy": "time", "sortOrder": "DESC"},
            "searchParams": [{"searchKey": "car", "searchValue": "GT3"}],
            "showForDriverId": 2
        }"#;
        let params: FilterParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.sort_params, SortParams::new(LapField::Time, SortOrder::Desc));
        assert_eq!(params.search_params, vec![SearchParam::new(LapField::Car, "GT3")]);
        assert_eq!(params.show_for_driver_id, Some(2));
    }
}
