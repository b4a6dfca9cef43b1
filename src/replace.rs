//! Applying a valid replacement plan to the references of the original file.

use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::PlanError,
    model::{DataBlock, Footnote},
    plan::ReplacementPlan,
};

/// Data blocks and footnotes re-pointed at the replacement subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplacementOutcome {
    pub release_version_id: Uuid,
    pub original_file_id: Uuid,
    pub replacement_file_id: Uuid,
    pub data_blocks: Vec<DataBlock>,
    pub footnotes: Vec<Footnote>,
}

/// Original element id -> replacement element id, for every matched element.
#[derive(Debug, Default)]
struct TargetMap {
    targets: HashMap<Uuid, Uuid>,
}

impl TargetMap {
    fn from_plan(plan: &ReplacementPlan) -> Self {
        let mut map = TargetMap::default();
        for data_block in &plan.data_blocks {
            for item in data_block.filters.iter().flat_map(|filter| filter.items()) {
                map.insert(item.id, item.target);
            }
            for indicator in data_block
                .indicator_groups
                .iter()
                .flat_map(|group| group.indicators.iter())
            {
                map.insert(indicator.id, indicator.target);
            }
            for attribute in data_block
                .locations
                .iter()
                .flat_map(|location| location.location_attributes.iter())
            {
                map.insert(attribute.id, attribute.target);
            }
        }
        for footnote in &plan.footnotes {
            for filter in &footnote.filters {
                map.insert(filter.id, filter.target);
            }
            for group in &footnote.filter_groups {
                map.insert(group.id, group.target);
            }
            for item in &footnote.filter_items {
                map.insert(item.id, item.target);
            }
            for indicator in footnote
                .indicator_groups
                .iter()
                .flat_map(|group| group.indicators.iter())
            {
                map.insert(indicator.id, indicator.target);
            }
        }
        map
    }

    fn insert(&mut self, id: Uuid, target: Option<Uuid>) {
        if let Some(target) = target {
            self.targets.insert(id, target);
        }
    }

    /// Ids without a target belong to other subjects and are kept as they are.
    fn remap(&self, ids: &[Uuid]) -> Vec<Uuid> {
        ids.iter()
            .map(|id| self.targets.get(id).copied().unwrap_or(*id))
            .collect()
    }
}

/// Rewrites the references of a valid plan onto the replacement subject.
///
/// Fails with [`PlanError::InvalidPlan`] unless every part of the plan is valid.
pub fn apply_replacement(
    release_version_id: Uuid,
    original_file_id: Uuid,
    replacement_file_id: Uuid,
    plan: &ReplacementPlan,
    data_blocks: &[DataBlock],
    footnotes: &[Footnote],
) -> Result<ReplacementOutcome, PlanError> {
    if !plan.valid {
        return Err(PlanError::InvalidPlan { original_file_id });
    }
    let targets = TargetMap::from_plan(plan);

    let data_blocks = data_blocks
        .iter()
        .map(|data_block| {
            let mut updated = data_block.clone();
            let query = &mut updated.query;
            query.subject_id = plan.replacement_subject_id;
            query.filters = targets.remap(&query.filters);
            query.indicators = targets.remap(&query.indicators);
            query.locations = targets.remap(&query.locations);
            updated
        })
        .collect::<Vec<_>>();

    let footnotes = footnotes
        .iter()
        .map(|footnote| {
            let mut updated = footnote.clone();
            for subject_id in &mut updated.subjects {
                if *subject_id == plan.original_subject_id {
                    *subject_id = plan.replacement_subject_id;
                }
            }
            updated.filters = targets.remap(&footnote.filters);
            updated.filter_groups = targets.remap(&footnote.filter_groups);
            updated.filter_items = targets.remap(&footnote.filter_items);
            updated.indicators = targets.remap(&footnote.indicators);
            updated
        })
        .collect::<Vec<_>>();

    info!(
        "Re-pointed {} data block(s) and {} footnote(s) at subject {}",
        data_blocks.len(),
        footnotes.len(),
        plan.replacement_subject_id
    );

    Ok(ReplacementOutcome {
        release_version_id,
        original_file_id,
        replacement_file_id,
        data_blocks,
        footnotes,
    })
}
