//! Statistics and content entities consumed by the planner.
//!
//! These are plain DTOs materialised from the statistics store. Nothing here
//! tracks changes or navigates to related rows; related entities are referenced
//! by id and resolved through the lookups in [`crate::lookup`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    location::Location,
    time_period::{TimePeriod, TimePeriodRange},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterItem {
    pub id: Uuid,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterGroup {
    pub id: Uuid,
    pub label: String,
    #[serde(default)]
    pub items: Vec<FilterItem>,
}

impl FilterGroup {
    pub fn item_by_label(&self, label: &str) -> Option<&FilterItem> {
        self.items.iter().find(|item| item.label == label)
    }
}

/// A filter column of a subject. `name` is the column header and is stable
/// across replacement files; `label` is the display text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Filter {
    pub id: Uuid,
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub groups: Vec<FilterGroup>,
}

impl Filter {
    pub fn group_by_label(&self, label: &str) -> Option<&FilterGroup> {
        self.groups.iter().find(|group| group.label == label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Indicator {
    pub id: Uuid,
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndicatorGroup {
    pub id: Uuid,
    pub label: String,
    #[serde(default)]
    pub indicators: Vec<Indicator>,
}

impl IndicatorGroup {
    pub fn indicator_by_name(&self, name: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|indicator| indicator.name == name)
    }
}

/// The tabular data set behind a data file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub indicator_groups: Vec<IndicatorGroup>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub time_periods: Vec<TimePeriod>,
}

impl Subject {
    pub fn filter_by_name(&self, name: &str) -> Option<&Filter> {
        self.filters.iter().find(|filter| filter.name == name)
    }

    pub fn indicator_group_by_label(&self, label: &str) -> Option<&IndicatorGroup> {
        self.indicator_groups
            .iter()
            .find(|group| group.label == label)
    }
}

/// The observation query saved by a data block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObservationQuery {
    pub subject_id: Uuid,
    #[serde(default)]
    pub filters: Vec<Uuid>,
    #[serde(default)]
    pub indicators: Vec<Uuid>,
    #[serde(default)]
    pub locations: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_period: Option<TimePeriodRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataBlock {
    pub id: Uuid,
    pub release_version_id: Uuid,
    pub name: String,
    pub query: ObservationQuery,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Footnote {
    pub id: Uuid,
    pub release_version_id: Uuid,
    pub content: String,
    #[serde(default)]
    pub subjects: Vec<Uuid>,
    #[serde(default)]
    pub filters: Vec<Uuid>,
    #[serde(default)]
    pub filter_groups: Vec<Uuid>,
    #[serde(default)]
    pub filter_items: Vec<Uuid>,
    #[serde(default)]
    pub indicators: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl Footnote {
    pub fn has_element_links(&self) -> bool {
        !(self.filters.is_empty()
            && self.filter_groups.is_empty()
            && self.filter_items.is_empty()
            && self.indicators.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseVersion {
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
}

/// A data file upload. `replaced_by` and `replacing` link an original file to
/// the replacement that will supersede it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataFile {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced_by: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacing: Option<Uuid>,
}

/// Membership of a data file in a release version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseFile {
    pub release_version_id: Uuid,
    pub file_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_api_data_set_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_api_data_set_version: Option<String>,
}

impl ReleaseFile {
    /// The public API data set version this file feeds, if any.
    pub fn public_api_link(&self) -> Option<(Uuid, &str)> {
        match (&self.public_api_data_set_id, &self.public_api_data_set_version) {
            (Some(id), Some(version)) => Some((*id, version.as_str())),
            _ => None,
        }
    }
}

/// Both sides of a replacement, resolved from the release version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedFiles {
    pub original_release_file: ReleaseFile,
    pub original: DataFile,
    pub replacement_release_file: ReleaseFile,
    pub replacement: DataFile,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DataSetVersionStatus {
    Processing,
    Failed,
    Mapping,
    Draft,
    Published,
    Deprecated,
    Withdrawn,
    Cancelled,
}

/// A version of a data set exposed by the public statistics API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataSetVersion {
    pub id: Uuid,
    pub data_set_id: Uuid,
    pub data_set_title: String,
    pub version: String,
    pub status: DataSetVersionStatus,
}

/// How far the mapping of a draft API data set version onto its predecessor
/// has progressed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MappingStatus {
    pub filters_complete: bool,
    pub locations_complete: bool,
    pub has_deletion_changes: bool,
    pub filters_have_major_change: bool,
    pub locations_have_major_change: bool,
}

impl MappingStatus {
    pub fn is_major_version_update(&self) -> bool {
        self.has_deletion_changes
            || self.filters_have_major_change
            || self.locations_have_major_change
    }

    /// Mapping finished and only produced a minor version update.
    pub fn is_valid(&self) -> bool {
        self.filters_complete && self.locations_complete && !self.is_major_version_update()
    }
}
