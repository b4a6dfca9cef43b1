use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::subject_index::SubjectIndex;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndicatorPlan {
    pub id: Uuid,
    pub name: String,
    pub label: String,
    pub target: Option<Uuid>,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndicatorGroupPlan {
    pub id: Uuid,
    pub label: String,
    pub indicators: Vec<IndicatorPlan>,
    pub valid: bool,
}

/// Plans indicators by name within the indicator group of the same label,
/// grouped in order of first reference.
pub fn plan_indicators(
    indicator_ids: &[Uuid],
    original: &SubjectIndex<'_>,
    replacement: &SubjectIndex<'_>,
) -> (Vec<IndicatorGroupPlan>, Vec<Uuid>) {
    let mut plans: Vec<IndicatorGroupPlan> = Vec::new();
    let mut unresolved = Vec::new();

    for &indicator_id in indicator_ids.iter().unique() {
        let Some((group, indicator)) = original.indicator(indicator_id) else {
            warn!(
                "Indicator {indicator_id} is not part of subject {}",
                original.subject().id
            );
            unresolved.push(indicator_id);
            continue;
        };
        let target = replacement
            .equivalent_indicator(group, indicator)
            .map(|matched| matched.id);
        debug!("Indicator '{}' / '{}' -> {:?}", group.label, indicator.name, target);

        let group_index = match plans.iter().position(|plan| plan.id == group.id) {
            Some(idx) => idx,
            None => {
                plans.push(IndicatorGroupPlan {
                    id: group.id,
                    label: group.label.clone(),
                    indicators: Vec::new(),
                    valid: true,
                });
                plans.len() - 1
            }
        };
        plans[group_index].indicators.push(IndicatorPlan {
            id: indicator.id,
            name: indicator.name.clone(),
            label: indicator.label.clone(),
            target,
            valid: target.is_some(),
        });
    }

    for group in &mut plans {
        group.valid = group.indicators.iter().all(|indicator| indicator.valid);
    }

    (plans, unresolved)
}
