use crate::range::RangeId;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::{collections::HashMap, fmt};

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Performance payload for one range as produced by the portfolio backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RangeSnapshot {
    pub gain_loss: f64,
    #[serde(default)]
    pub percent_change: Option<f64>,
    #[serde(default, deserialize_with = "ordered_points")]
    pub chart_data: Vec<ChartPoint>,
}

impl RangeSnapshot {
    pub fn labels(&self) -> Vec<String> {
        self.chart_data.iter().map(|point| point.label.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.chart_data.iter().map(|point| point.value).collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed timescale payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload has no entry for range {0}")]
    MissingRange(RangeId),
}

/// Decodes a `{ "<range>": { ... } }` body and extracts the entry for `range`.
pub fn decode_snapshot(body: &[u8], range: RangeId) -> Result<RangeSnapshot, DecodeError> {
    let mut entries: HashMap<String, RangeSnapshot> = serde_json::from_slice(body)?;
    entries
        .remove(range.as_str())
        .ok_or(DecodeError::MissingRange(range))
}

// chart_data arrives as a JSON object; keep the order the backend wrote it in.
fn ordered_points<'de, D>(deserializer: D) -> Result<Vec<ChartPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PointsVisitor;

    impl<'de> Visitor<'de> for PointsVisitor {
        type Value = Vec<ChartPoint>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object of date label to balance")
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut points = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((label, value)) = map.next_entry::<String, f64>()? {
                points.push(ChartPoint { label, value });
            }
            Ok(points)
        }
    }

    deserializer.deserialize_map(PointsVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_data_keeps_document_order() {
        let body = br#"{"1M": {"gain_loss": 4.5, "percent_change": 1.25, "chart_data": {
            "2024-03-02": 110.0, "2024-02-28": 100.0, "2024-03-01": 105.5
        }}}"#;

        let snapshot = decode_snapshot(body, RangeId::OneMonth).unwrap();
        assert_eq!(snapshot.labels(), vec!["2024-03-02", "2024-02-28", "2024-03-01"]);
        assert_eq!(snapshot.values(), vec![110.0, 100.0, 105.5]);
        assert_eq!(snapshot.percent_change, Some(1.25));
    }

    #[test]
    fn percent_change_is_optional() {
        let body = br#"{"1D": {"gain_loss": 0, "chart_data": {"2024-01-02": 10000}}}"#;
        let snapshot = decode_snapshot(body, RangeId::OneDay).unwrap();
        assert_eq!(snapshot.gain_loss, 0.0);
        assert_eq!(snapshot.percent_change, None);
        assert_eq!(snapshot.chart_data.len(), 1);
    }

    #[test]
    fn missing_range_entry_is_an_error() {
        let err = decode_snapshot(b"{}", RangeId::FiveDays).unwrap_err();
        assert!(matches!(err, DecodeError::MissingRange(RangeId::FiveDays)));
    }

    #[test]
    fn malformed_body_is_an_error() {
        let err = decode_snapshot(b"<html>login</html>", RangeId::OneDay).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }
}
