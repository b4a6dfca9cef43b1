use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::time_period::{TimeIdentifier, TimePeriod, TimePeriodRange};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimePeriodPlan {
    pub year: i32,
    pub code: TimeIdentifier,
    pub valid: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimePeriodRangePlan {
    pub start: TimePeriodPlan,
    pub end: TimePeriodPlan,
    pub valid: bool,
}

/// Checks both ends of a queried range against the replacement's periods.
pub fn plan_time_periods(
    range: &TimePeriodRange,
    replacement_periods: &HashSet<TimePeriod>,
) -> TimePeriodRangePlan {
    let check = |period: &TimePeriod| TimePeriodPlan {
        year: period.year,
        code: period.identifier,
        valid: replacement_periods.contains(period),
    };
    let start = check(&range.start);
    let end = check(&range.end);
    TimePeriodRangePlan {
        start,
        end,
        valid: start.valid && end.valid,
    }
}
