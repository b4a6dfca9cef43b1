use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    filters::{FilterPlan, plan_filter_items},
    indicators::{IndicatorGroupPlan, plan_indicators},
    locations::{LocationPlan, plan_locations},
    subject_index::SubjectIndex,
    time_periods::{TimePeriodRangePlan, plan_time_periods},
};
use crate::{location::Location, model::DataBlock, time_period::TimePeriod};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataBlockReplacementPlan {
    pub id: Uuid,
    pub name: String,
    pub filters: Vec<FilterPlan>,
    pub indicator_groups: Vec<IndicatorGroupPlan>,
    pub locations: Vec<LocationPlan>,
    pub time_periods: Option<TimePeriodRangePlan>,
    /// Query ids that do not exist in the original subject.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_references: Vec<Uuid>,
    pub valid: bool,
    pub fixable: bool,
}

impl DataBlockReplacementPlan {
    pub fn matched_filter_items(&self) -> usize {
        self.filters
            .iter()
            .flat_map(FilterPlan::items)
            .filter(|item| item.valid)
            .count()
    }

    pub fn filter_item_count(&self) -> usize {
        self.filters.iter().flat_map(FilterPlan::items).count()
    }

    pub fn invalid_elements(&self) -> usize {
        let filter_items = self
            .filters
            .iter()
            .flat_map(FilterPlan::items)
            .filter(|item| !item.valid)
            .count();
        let indicators = self
            .indicator_groups
            .iter()
            .flat_map(|group| group.indicators.iter())
            .filter(|indicator| !indicator.valid)
            .count();
        let locations = self
            .locations
            .iter()
            .flat_map(|plan| plan.location_attributes.iter())
            .filter(|attribute| !attribute.valid)
            .count();
        let time_periods = self
            .time_periods
            .map(|range| usize::from(!range.start.valid) + usize::from(!range.end.valid))
            .unwrap_or_default();
        filter_items + indicators + locations + time_periods + self.unresolved_references.len()
    }
}

/// Replacement-side data every data block is checked against.
pub struct ReplacementContext<'a> {
    pub original: &'a SubjectIndex<'a>,
    pub replacement: &'a SubjectIndex<'a>,
    pub original_locations: &'a [Location],
    pub replacement_locations: &'a [Location],
    pub replacement_time_periods: HashSet<TimePeriod>,
    /// Filters of the replacement subject that the original does not have.
    pub introduced_filters: &'a [String],
}

pub fn plan_data_block(data_block: &DataBlock, context: &ReplacementContext<'_>) -> DataBlockReplacementPlan {
    let query = &data_block.query;
    let (filters, mut unresolved_references) =
        plan_filter_items(&query.filters, context.original, context.replacement);
    let (indicator_groups, unresolved_indicators) =
        plan_indicators(&query.indicators, context.original, context.replacement);
    let (locations, unresolved_locations) = plan_locations(
        &query.locations,
        context.original_locations,
        context.replacement_locations,
    );
    unresolved_references.extend(unresolved_indicators);
    unresolved_references.extend(unresolved_locations);
    let time_periods = query
        .time_period
        .as_ref()
        .map(|range| plan_time_periods(range, &context.replacement_time_periods));

    let no_new_filters = context.introduced_filters.is_empty();
    let valid = no_new_filters
        && unresolved_references.is_empty()
        && filters.iter().all(|filter| filter.valid)
        && indicator_groups.iter().all(|group| group.valid)
        && locations.iter().all(|location| location.valid)
        && time_periods.is_none_or(|range| range.valid);

    let mut plan = DataBlockReplacementPlan {
        id: data_block.id,
        name: data_block.name.clone(),
        filters,
        indicator_groups,
        locations,
        time_periods,
        unresolved_references,
        valid,
        fixable: false,
    };
    let matched = plan.matched_filter_items();
    plan.fixable =
        valid || (no_new_filters && matched > 0 && matched < plan.filter_item_count());
    plan
}
