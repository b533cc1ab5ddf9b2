use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Time window selected by a dashboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RangeId {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "5D")]
    FiveDays,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "YTD")]
    YearToDate,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
}

impl RangeId {
    /// Tab order as shown on the page.
    pub const ALL: [RangeId; 7] = [
        RangeId::OneDay,
        RangeId::FiveDays,
        RangeId::OneMonth,
        RangeId::SixMonths,
        RangeId::YearToDate,
        RangeId::OneYear,
        RangeId::FiveYears,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RangeId::OneDay => "1D",
            RangeId::FiveDays => "5D",
            RangeId::OneMonth => "1M",
            RangeId::SixMonths => "6M",
            RangeId::YearToDate => "YTD",
            RangeId::OneYear => "1Y",
            RangeId::FiveYears => "5Y",
        }
    }

    /// Phrase that completes "... over the <timescale>" style captions.
    pub fn timescale(self) -> &'static str {
        match self {
            RangeId::OneDay => "today",
            RangeId::FiveDays => "past 5 days",
            RangeId::OneMonth => "past month",
            RangeId::SixMonths => "past 6 months",
            RangeId::YearToDate => "year to date",
            RangeId::OneYear => "past year",
            RangeId::FiveYears => "past 5 years",
        }
    }
}

impl fmt::Display for RangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown range '{0}', expected one of 1D, 5D, 1M, 6M, YTD, 1Y, 5Y")]
pub struct UnknownRange(pub String);

impl FromStr for RangeId {
    type Err = UnknownRange;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim().to_ascii_uppercase();
        RangeId::ALL
            .into_iter()
            .find(|range| range.as_str() == key)
            .ok_or_else(|| UnknownRange(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("ytd".parse::<RangeId>(), Ok(RangeId::YearToDate));
        assert_eq!(" 1m ".parse::<RangeId>(), Ok(RangeId::OneMonth));
        assert_eq!("5Y".parse::<RangeId>(), Ok(RangeId::FiveYears));
    }

    #[test]
    fn rejects_unknown_ranges() {
        let err = "2W".parse::<RangeId>().unwrap_err();
        assert_eq!(err, UnknownRange("2W".to_string()));
    }

    #[test]
    fn display_matches_wire_identifier() {
        for range in RangeId::ALL {
            assert_eq!(range.to_string().parse::<RangeId>(), Ok(range));
            let json = serde_json::to_string(&range).unwrap();
            assert_eq!(json, format!("\"{}\"", range.as_str()));
        }
    }

    #[test]
    fn timescale_phrases() {
        assert_eq!(RangeId::OneDay.timescale(), "today");
        assert_eq!(RangeId::YearToDate.timescale(), "year to date");
        assert_eq!(RangeId::FiveYears.timescale(), "past 5 years");
    }
}
