//! Replacement plan computation.
//!
//! A [`ReplacementPlan`] reports, for every data block and footnote that
//! references the original subject, whether each referenced element still
//! exists in the replacement subject. Matching uses business keys only:
//!
//! - filters by name, filter groups and items by label along that path,
//! - indicators by name within the indicator group of the same label,
//! - locations by geographic level and code,
//! - time periods by exact year and time identifier.
//!
//! Everything in this module is pure: callers materialise the subjects,
//! locations, periods and references up front (see [`crate::service`]).

pub mod api_data_set;
pub mod data_blocks;
pub mod filters;
pub mod footnotes;
pub mod indicators;
pub mod locations;
pub mod subject_index;
pub mod time_periods;

use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use api_data_set::{ApiDataSetVersionPlan, plan_api_data_set_version};
pub use data_blocks::{DataBlockReplacementPlan, ReplacementContext, plan_data_block};
pub use filters::{FilterGroupPlan, FilterItemPlan, FilterPlan};
pub use footnotes::{
    FootnoteFilterGroupPlan, FootnoteFilterItemPlan, FootnoteFilterPlan, FootnoteReplacementPlan,
    plan_footnote,
};
pub use indicators::{IndicatorGroupPlan, IndicatorPlan};
pub use locations::{LocationAttributePlan, LocationPlan};
pub use subject_index::SubjectIndex;
pub use time_periods::{TimePeriodPlan, TimePeriodRangePlan};

use crate::{
    location::Location,
    model::{DataBlock, Footnote, Subject},
    time_period::TimePeriod,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplacementPlan {
    pub original_subject_id: Uuid,
    pub replacement_subject_id: Uuid,
    pub data_blocks: Vec<DataBlockReplacementPlan>,
    pub footnotes: Vec<FootnoteReplacementPlan>,
    pub api_data_set_version_plan: Option<ApiDataSetVersionPlan>,
    /// Filters present in the replacement subject but not in the original.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub introduced_filters: Vec<String>,
    pub valid: bool,
}

impl ReplacementPlan {
    pub fn invalid_data_blocks(&self) -> impl Iterator<Item = &DataBlockReplacementPlan> {
        self.data_blocks.iter().filter(|plan| !plan.valid)
    }

    pub fn invalid_footnotes(&self) -> impl Iterator<Item = &FootnoteReplacementPlan> {
        self.footnotes.iter().filter(|plan| !plan.valid)
    }
}

/// Materialised inputs for [`compute_replacement_plan`].
pub struct PlanInputs<'a> {
    pub original_subject: &'a Subject,
    pub replacement_subject: &'a Subject,
    pub original_locations: &'a [Location],
    pub replacement_locations: &'a [Location],
    pub replacement_time_periods: &'a [TimePeriod],
    pub data_blocks: &'a [DataBlock],
    pub footnotes: &'a [Footnote],
    pub api_data_set_version_plan: Option<ApiDataSetVersionPlan>,
}

pub fn compute_replacement_plan(inputs: PlanInputs<'_>) -> ReplacementPlan {
    let original = SubjectIndex::new(inputs.original_subject);
    let replacement = SubjectIndex::new(inputs.replacement_subject);
    let introduced_filters = replacement.introduced_filters(&original);
    if !introduced_filters.is_empty() {
        debug!("Replacement introduces filters {introduced_filters:?}");
    }

    let context = ReplacementContext {
        original: &original,
        replacement: &replacement,
        original_locations: inputs.original_locations,
        replacement_locations: inputs.replacement_locations,
        replacement_time_periods: inputs.replacement_time_periods.iter().copied().collect(),
        introduced_filters: &introduced_filters,
    };

    let data_blocks = inputs
        .data_blocks
        .iter()
        .map(|data_block| plan_data_block(data_block, &context))
        .collect::<Vec<_>>();
    let footnotes = inputs
        .footnotes
        .iter()
        .map(|footnote| plan_footnote(footnote, &original, &replacement))
        .collect::<Vec<_>>();

    let valid = data_blocks.iter().all(|plan| plan.valid)
        && footnotes.iter().all(|plan| plan.valid)
        && inputs
            .api_data_set_version_plan
            .as_ref()
            .is_none_or(|plan| plan.valid);

    ReplacementPlan {
        original_subject_id: inputs.original_subject.id,
        replacement_subject_id: inputs.replacement_subject.id,
        data_blocks,
        footnotes,
        api_data_set_version_plan: inputs.api_data_set_version_plan,
        introduced_filters,
        valid,
    }
}
