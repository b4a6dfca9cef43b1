use std::collections::HashMap;

use uuid::Uuid;

use crate::model::{Filter, FilterGroup, FilterItem, Indicator, IndicatorGroup, Subject};

/// Id-keyed view over a subject's filter and indicator trees.
///
/// Original-side references arrive as ids; the index recovers the business
/// path (filter name, group label, item label) needed to find the equivalent
/// element in the replacement subject.
pub struct SubjectIndex<'a> {
    subject: &'a Subject,
    filters: HashMap<Uuid, &'a Filter>,
    filter_groups: HashMap<Uuid, (&'a Filter, &'a FilterGroup)>,
    filter_items: HashMap<Uuid, FilterItemPath<'a>>,
    indicators: HashMap<Uuid, (&'a IndicatorGroup, &'a Indicator)>,
}

#[derive(Debug, Clone, Copy)]
pub struct FilterItemPath<'a> {
    pub filter: &'a Filter,
    pub group: &'a FilterGroup,
    pub item: &'a FilterItem,
}

impl<'a> SubjectIndex<'a> {
    pub fn new(subject: &'a Subject) -> Self {
        let mut filters = HashMap::new();
        let mut filter_groups = HashMap::new();
        let mut filter_items = HashMap::new();
        for filter in &subject.filters {
            filters.insert(filter.id, filter);
            for group in &filter.groups {
                filter_groups.insert(group.id, (filter, group));
                for item in &group.items {
                    filter_items.insert(
                        item.id,
                        FilterItemPath {
                            filter,
                            group,
                            item,
                        },
                    );
                }
            }
        }
        let mut indicators = HashMap::new();
        for group in &subject.indicator_groups {
            for indicator in &group.indicators {
                indicators.insert(indicator.id, (group, indicator));
            }
        }
        Self {
            subject,
            filters,
            filter_groups,
            filter_items,
            indicators,
        }
    }

    pub fn subject(&self) -> &'a Subject {
        self.subject
    }

    pub fn filter(&self, id: Uuid) -> Option<&'a Filter> {
        self.filters.get(&id).copied()
    }

    pub fn filter_group(&self, id: Uuid) -> Option<(&'a Filter, &'a FilterGroup)> {
        self.filter_groups.get(&id).copied()
    }

    pub fn filter_item(&self, id: Uuid) -> Option<FilterItemPath<'a>> {
        self.filter_items.get(&id).copied()
    }

    pub fn indicator(&self, id: Uuid) -> Option<(&'a IndicatorGroup, &'a Indicator)> {
        self.indicators.get(&id).copied()
    }

    /// The filter with the same column name.
    pub fn equivalent_filter(&self, original: &Filter) -> Option<&'a Filter> {
        self.subject.filter_by_name(&original.name)
    }

    pub fn equivalent_filter_group(
        &self,
        filter: &Filter,
        group: &FilterGroup,
    ) -> Option<&'a FilterGroup> {
        self.equivalent_filter(filter)?.group_by_label(&group.label)
    }

    pub fn equivalent_filter_item(&self, path: FilterItemPath<'_>) -> Option<&'a FilterItem> {
        self.equivalent_filter_group(path.filter, path.group)?
            .item_by_label(&path.item.label)
    }

    pub fn equivalent_indicator(
        &self,
        group: &IndicatorGroup,
        indicator: &Indicator,
    ) -> Option<&'a Indicator> {
        self.subject
            .indicator_group_by_label(&group.label)?
            .indicator_by_name(&indicator.name)
    }

    /// Names of filters in `self` that `original` does not have.
    pub fn introduced_filters(&self, original: &SubjectIndex<'_>) -> Vec<String> {
        self.subject
            .filters
            .iter()
            .filter(|filter| original.subject.filter_by_name(&filter.name).is_none())
            .map(|filter| filter.name.clone())
            .collect()
    }
}
