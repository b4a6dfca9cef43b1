use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    indicators::{IndicatorGroupPlan, plan_indicators},
    subject_index::SubjectIndex,
};
use crate::model::Footnote;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FootnoteFilterPlan {
    pub id: Uuid,
    pub name: String,
    pub label: String,
    pub target: Option<Uuid>,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FootnoteFilterGroupPlan {
    pub id: Uuid,
    pub filter_id: Uuid,
    pub filter_label: String,
    pub label: String,
    pub target: Option<Uuid>,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FootnoteFilterItemPlan {
    pub id: Uuid,
    pub filter_id: Uuid,
    pub filter_label: String,
    pub filter_group_id: Uuid,
    pub filter_group_label: String,
    pub label: String,
    pub target: Option<Uuid>,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FootnoteReplacementPlan {
    pub id: Uuid,
    pub content: String,
    pub filters: Vec<FootnoteFilterPlan>,
    pub filter_groups: Vec<FootnoteFilterGroupPlan>,
    pub filter_items: Vec<FootnoteFilterItemPlan>,
    pub indicator_groups: Vec<IndicatorGroupPlan>,
    pub valid: bool,
}

impl FootnoteReplacementPlan {
    pub fn invalid_elements(&self) -> usize {
        self.filters.iter().filter(|plan| !plan.valid).count()
            + self.filter_groups.iter().filter(|plan| !plan.valid).count()
            + self.filter_items.iter().filter(|plan| !plan.valid).count()
            + self
                .indicator_groups
                .iter()
                .flat_map(|group| group.indicators.iter())
                .filter(|indicator| !indicator.valid)
                .count()
    }
}

/// Plans every element a footnote is attached to.
///
/// Attachments belonging to other subjects are left out: they are unaffected
/// by this replacement. A footnote attached only to subjects is always valid.
pub fn plan_footnote(
    footnote: &Footnote,
    original: &SubjectIndex<'_>,
    replacement: &SubjectIndex<'_>,
) -> FootnoteReplacementPlan {
    if !footnote.has_element_links() {
        debug!("Footnote {} is attached to subjects only", footnote.id);
        return FootnoteReplacementPlan {
            id: footnote.id,
            content: footnote.content.clone(),
            filters: Vec::new(),
            filter_groups: Vec::new(),
            filter_items: Vec::new(),
            indicator_groups: Vec::new(),
            valid: true,
        };
    }

    let filters = footnote
        .filters
        .iter()
        .filter_map(|id| original.filter(*id))
        .map(|filter| {
            let target = replacement.equivalent_filter(filter).map(|matched| matched.id);
            FootnoteFilterPlan {
                id: filter.id,
                name: filter.name.clone(),
                label: filter.label.clone(),
                target,
                valid: target.is_some(),
            }
        })
        .collect::<Vec<_>>();

    let filter_groups = footnote
        .filter_groups
        .iter()
        .filter_map(|id| original.filter_group(*id))
        .map(|(filter, group)| {
            let target = replacement
                .equivalent_filter_group(filter, group)
                .map(|matched| matched.id);
            FootnoteFilterGroupPlan {
                id: group.id,
                filter_id: filter.id,
                filter_label: filter.label.clone(),
                label: group.label.clone(),
                target,
                valid: target.is_some(),
            }
        })
        .collect::<Vec<_>>();

    let filter_items = footnote
        .filter_items
        .iter()
        .filter_map(|id| original.filter_item(*id))
        .map(|path| {
            let target = replacement.equivalent_filter_item(path).map(|matched| matched.id);
            FootnoteFilterItemPlan {
                id: path.item.id,
                filter_id: path.filter.id,
                filter_label: path.filter.label.clone(),
                filter_group_id: path.group.id,
                filter_group_label: path.group.label.clone(),
                label: path.item.label.clone(),
                target,
                valid: target.is_some(),
            }
        })
        .collect::<Vec<_>>();

    let indicator_ids = footnote
        .indicators
        .iter()
        .copied()
        .filter(|id| original.indicator(*id).is_some())
        .collect::<Vec<_>>();
    let (indicator_groups, _) = plan_indicators(&indicator_ids, original, replacement);

    let valid = filters.iter().all(|plan| plan.valid)
        && filter_groups.iter().all(|plan| plan.valid)
        && filter_items.iter().all(|plan| plan.valid)
        && indicator_groups.iter().all(|group| group.valid);
    debug!("Footnote {} valid: {valid}", footnote.id);

    FootnoteReplacementPlan {
        id: footnote.id,
        content: footnote.content.clone(),
        filters,
        filter_groups,
        filter_items,
        indicator_groups,
        valid,
    }
}
