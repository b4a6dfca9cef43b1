use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::subject_index::SubjectIndex;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterItemPlan {
    pub id: Uuid,
    pub label: String,
    pub target: Option<Uuid>,
    pub valid: bool,
}

impl FilterItemPlan {
    pub fn new(id: Uuid, label: impl Into<String>, target: Option<Uuid>) -> Self {
        Self {
            id,
            label: label.into(),
            target,
            valid: target.is_some(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterGroupPlan {
    pub id: Uuid,
    pub label: String,
    pub filter_items: Vec<FilterItemPlan>,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterPlan {
    pub id: Uuid,
    pub name: String,
    pub label: String,
    pub groups: Vec<FilterGroupPlan>,
    pub valid: bool,
}

impl FilterPlan {
    pub fn items(&self) -> impl Iterator<Item = &FilterItemPlan> {
        self.groups.iter().flat_map(|group| group.filter_items.iter())
    }
}

/// Plans every filter item referenced by a query, grouped by filter and group
/// in order of first reference. Ids that do not belong to the original
/// subject are returned separately.
pub fn plan_filter_items(
    item_ids: &[Uuid],
    original: &SubjectIndex<'_>,
    replacement: &SubjectIndex<'_>,
) -> (Vec<FilterPlan>, Vec<Uuid>) {
    let mut plans: Vec<FilterPlan> = Vec::new();
    let mut unresolved = Vec::new();

    for &item_id in item_ids.iter().unique() {
        let Some(path) = original.filter_item(item_id) else {
            warn!("Filter item {item_id} is not part of subject {}", original.subject().id);
            unresolved.push(item_id);
            continue;
        };
        let target = replacement.equivalent_filter_item(path).map(|item| item.id);
        debug!(
            "Filter item '{}' / '{}' / '{}' -> {:?}",
            path.filter.name, path.group.label, path.item.label, target
        );

        let filter_index = match plans.iter().position(|plan| plan.id == path.filter.id) {
            Some(idx) => idx,
            None => {
                plans.push(FilterPlan {
                    id: path.filter.id,
                    name: path.filter.name.clone(),
                    label: path.filter.label.clone(),
                    groups: Vec::new(),
                    valid: true,
                });
                plans.len() - 1
            }
        };
        let groups = &mut plans[filter_index].groups;
        let group_index = match groups.iter().position(|group| group.id == path.group.id) {
            Some(idx) => idx,
            None => {
                groups.push(FilterGroupPlan {
                    id: path.group.id,
                    label: path.group.label.clone(),
                    filter_items: Vec::new(),
                    valid: true,
                });
                groups.len() - 1
            }
        };
        groups[group_index]
            .filter_items
            .push(FilterItemPlan::new(item_id, path.item.label.clone(), target));
    }

    for filter in &mut plans {
        for group in &mut filter.groups {
            group.valid = group.filter_items.iter().all(|item| item.valid);
        }
        filter.valid = filter.groups.iter().all(|group| group.valid);
    }

    (plans, unresolved)
}
