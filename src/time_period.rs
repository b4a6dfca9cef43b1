use std::{fmt, str::FromStr};

use anyhow::{Result, anyhow, ensure};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeIdentifier {
    AcademicYear,
    CalendarYear,
    FinancialYear,
    TaxYear,
    ReportingYear,
    AcademicYearQuarter(u8),
    CalendarYearQuarter(u8),
    FinancialYearQuarter(u8),
    TaxYearQuarter(u8),
    AutumnTerm,
    AutumnSpringTerm,
    SpringTerm,
    SummerTerm,
    Month(u8),
    Week(u8),
}

impl TimeIdentifier {
    pub fn code(&self) -> String {
        match self {
            TimeIdentifier::AcademicYear => "AY".to_string(),
            TimeIdentifier::CalendarYear => "CY".to_string(),
            TimeIdentifier::FinancialYear => "FY".to_string(),
            TimeIdentifier::TaxYear => "TY".to_string(),
            TimeIdentifier::ReportingYear => "RY".to_string(),
            TimeIdentifier::AcademicYearQuarter(q) => format!("AYQ{q}"),
            TimeIdentifier::CalendarYearQuarter(q) => format!("CYQ{q}"),
            TimeIdentifier::FinancialYearQuarter(q) => format!("FYQ{q}"),
            TimeIdentifier::TaxYearQuarter(q) => format!("TYQ{q}"),
            TimeIdentifier::AutumnTerm => "T1".to_string(),
            TimeIdentifier::AutumnSpringTerm => "T1T2".to_string(),
            TimeIdentifier::SpringTerm => "T2".to_string(),
            TimeIdentifier::SummerTerm => "T3".to_string(),
            TimeIdentifier::Month(m) => format!("M{m}"),
            TimeIdentifier::Week(w) => format!("W{w}"),
        }
    }
}

fn parse_ordinal(digits: &str, max: u8, kind: &str, raw: &str) -> Result<u8> {
    let value = digits
        .parse::<u8>()
        .map_err(|_| anyhow!("Invalid {kind} number in time identifier '{raw}'"))?;
    ensure!(
        (1..=max).contains(&value),
        "{kind} number in time identifier '{raw}' must be between 1 and {max}"
    );
    Ok(value)
}

impl FromStr for TimeIdentifier {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        let identifier = match normalized.as_str() {
            "AY" => TimeIdentifier::AcademicYear,
            "CY" => TimeIdentifier::CalendarYear,
            "FY" => TimeIdentifier::FinancialYear,
            "TY" => TimeIdentifier::TaxYear,
            "RY" => TimeIdentifier::ReportingYear,
            "T1" => TimeIdentifier::AutumnTerm,
            "T1T2" => TimeIdentifier::AutumnSpringTerm,
            "T2" => TimeIdentifier::SpringTerm,
            "T3" => TimeIdentifier::SummerTerm,
            other => {
                if let Some(q) = other.strip_prefix("AYQ") {
                    TimeIdentifier::AcademicYearQuarter(parse_ordinal(q, 4, "quarter", value)?)
                } else if let Some(q) = other.strip_prefix("CYQ") {
                    TimeIdentifier::CalendarYearQuarter(parse_ordinal(q, 4, "quarter", value)?)
                } else if let Some(q) = other.strip_prefix("FYQ") {
                    TimeIdentifier::FinancialYearQuarter(parse_ordinal(q, 4, "quarter", value)?)
                } else if let Some(q) = other.strip_prefix("TYQ") {
                    TimeIdentifier::TaxYearQuarter(parse_ordinal(q, 4, "quarter", value)?)
                } else if let Some(m) = other.strip_prefix('M') {
                    TimeIdentifier::Month(parse_ordinal(m, 12, "month", value)?)
                } else if let Some(w) = other.strip_prefix('W') {
                    TimeIdentifier::Week(parse_ordinal(w, 53, "week", value)?)
                } else {
                    return Err(anyhow!("Unknown time identifier '{value}'"));
                }
            }
        };
        Ok(identifier)
    }
}

impl fmt::Display for TimeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for TimeIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.code())
    }
}

impl<'de> Deserialize<'de> for TimeIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        TimeIdentifier::from_str(&token).map_err(|err| de::Error::custom(err.to_string()))
    }
}

/// A single period such as `2019 AY` or `2020 M3`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimePeriod {
    pub year: i32,
    #[serde(rename = "code")]
    pub identifier: TimeIdentifier,
}

impl TimePeriod {
    pub fn new(year: i32, identifier: TimeIdentifier) -> Self {
        Self { year, identifier }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.identifier)
    }
}

impl FromStr for TimePeriod {
    type Err = anyhow::Error;

    /// Parses `2019 AY` or `2019_AY`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (year, code) = value
            .trim()
            .split_once([' ', '_'])
            .ok_or_else(|| anyhow!("Time period '{value}' must use the form 'year code'"))?;
        let year = year
            .trim()
            .parse::<i32>()
            .map_err(|_| anyhow!("Invalid year in time period '{value}'"))?;
        Ok(TimePeriod::new(year, code.parse()?))
    }
}

/// The inclusive range of periods a data block queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimePeriodRange {
    pub start: TimePeriod,
    pub end: TimePeriod,
}
