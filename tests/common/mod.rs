#![allow(dead_code)]

use std::path::{Path, PathBuf};

use replacement_planner::{
    config::PlannerConfig,
    error::PlanError,
    location::{GeographicLevel, Location},
    model::{
        DataBlock, DataFile, Filter, FilterGroup, FilterItem, Footnote, Indicator,
        IndicatorGroup, ObservationQuery, ReleaseFile, ReleaseVersion, Subject,
    },
    plan::ReplacementPlan,
    service::ReplacementPlanService,
    store::ReleaseStore,
    time_period::{TimeIdentifier, TimePeriod, TimePeriodRange},
};
use tempfile::{TempDir, tempdir};
use uuid::Uuid;

pub fn item(label: &str) -> FilterItem {
    FilterItem {
        id: Uuid::new_v4(),
        label: label.to_string(),
    }
}

pub fn group(label: &str, items: &[&str]) -> FilterGroup {
    FilterGroup {
        id: Uuid::new_v4(),
        label: label.to_string(),
        items: items.iter().map(|label| item(label)).collect(),
    }
}

pub fn filter(name: &str, label: &str, groups: Vec<FilterGroup>) -> Filter {
    Filter {
        id: Uuid::new_v4(),
        name: name.to_string(),
        label: label.to_string(),
        groups,
    }
}

pub fn indicator_group(label: &str, names: &[&str]) -> IndicatorGroup {
    IndicatorGroup {
        id: Uuid::new_v4(),
        label: label.to_string(),
        indicators: names
            .iter()
            .map(|name| Indicator {
                id: Uuid::new_v4(),
                name: name.to_string(),
                label: name.replace('_', " "),
            })
            .collect(),
    }
}

pub fn country(code: &str, label: &str) -> Location {
    Location::new(Uuid::new_v4(), GeographicLevel::Country, code, label)
}

pub fn local_authority(code: &str, old_code: &str, label: &str) -> Location {
    Location::new(Uuid::new_v4(), GeographicLevel::LocalAuthority, code, label)
        .with_old_code(old_code)
}

pub fn academic_years(years: &[i32]) -> Vec<TimePeriod> {
    years
        .iter()
        .map(|year| TimePeriod::new(*year, TimeIdentifier::AcademicYear))
        .collect()
}

pub fn academic_year_range(start: i32, end: i32) -> TimePeriodRange {
    TimePeriodRange {
        start: TimePeriod::new(start, TimeIdentifier::AcademicYear),
        end: TimePeriod::new(end, TimeIdentifier::AcademicYear),
    }
}

/// Subject with a "School type" filter, one indicator group, England, and 2018/19 AY.
pub fn school_subject(items: &[&str]) -> Subject {
    Subject {
        id: Uuid::new_v4(),
        name: "Absence by characteristic".to_string(),
        filters: vec![filter(
            "school_type",
            "School type",
            vec![group("Individual", items)],
        )],
        indicator_groups: vec![indicator_group(
            "Absence fields",
            &["sess_authorised", "sess_unauthorised"],
        )],
        locations: vec![country("E92000001", "England")],
        time_periods: academic_years(&[2018, 2019]),
    }
}

pub fn item_id(subject: &Subject, filter_name: &str, group_label: &str, item_label: &str) -> Uuid {
    subject
        .filter_by_name(filter_name)
        .and_then(|filter| filter.group_by_label(group_label))
        .and_then(|group| group.item_by_label(item_label))
        .map(|item| item.id)
        .expect("filter item exists")
}

pub fn indicator_id(subject: &Subject, name: &str) -> Uuid {
    subject
        .indicator_groups
        .iter()
        .flat_map(|group| group.indicators.iter())
        .find(|indicator| indicator.name == name)
        .map(|indicator| indicator.id)
        .expect("indicator exists")
}

pub fn location_id(subject: &Subject, code: &str) -> Uuid {
    subject
        .locations
        .iter()
        .find(|location| location.display_code() == code)
        .map(|location| location.id)
        .expect("location exists")
}

/// A release version holding an original file and its linked replacement.
pub struct Fixture {
    pub store: ReleaseStore,
    pub release_version_id: Uuid,
    pub original_file_id: Uuid,
    pub replacement_file_id: Uuid,
    pub original: Subject,
    pub replacement: Subject,
}

impl Fixture {
    pub fn new(original: Subject, replacement: Subject) -> Self {
        let release_version_id = Uuid::new_v4();
        let original_file_id = Uuid::new_v4();
        let replacement_file_id = Uuid::new_v4();
        let store = ReleaseStore {
            generated_at: None,
            release_versions: vec![ReleaseVersion {
                id: release_version_id,
                title: "Academic year 2019/20".to_string(),
            }],
            release_files: vec![
                ReleaseFile {
                    release_version_id,
                    file_id: original_file_id,
                    public_api_data_set_id: None,
                    public_api_data_set_version: None,
                },
                ReleaseFile {
                    release_version_id,
                    file_id: replacement_file_id,
                    public_api_data_set_id: None,
                    public_api_data_set_version: None,
                },
            ],
            files: vec![
                DataFile {
                    id: original_file_id,
                    subject_id: original.id,
                    filename: "absence.csv".to_string(),
                    replaced_by: Some(replacement_file_id),
                    replacing: None,
                },
                DataFile {
                    id: replacement_file_id,
                    subject_id: replacement.id,
                    filename: "absence-replacement.csv".to_string(),
                    replaced_by: None,
                    replacing: Some(original_file_id),
                },
            ],
            subjects: vec![original.clone(), replacement.clone()],
            data_blocks: Vec::new(),
            footnotes: Vec::new(),
            data_set_versions: Vec::new(),
            mapping_statuses: Vec::new(),
        };
        Self {
            store,
            release_version_id,
            original_file_id,
            replacement_file_id,
            original,
            replacement,
        }
    }

    pub fn query(&self) -> ObservationQuery {
        ObservationQuery {
            subject_id: self.original.id,
            filters: Vec::new(),
            indicators: Vec::new(),
            locations: Vec::new(),
            time_period: None,
        }
    }

    pub fn add_data_block(&mut self, name: &str, query: ObservationQuery) -> Uuid {
        let id = Uuid::new_v4();
        self.store.data_blocks.push(DataBlock {
            id,
            release_version_id: self.release_version_id,
            name: name.to_string(),
            query,
            updated: None,
        });
        id
    }

    pub fn footnote(&self, content: &str) -> Footnote {
        Footnote {
            id: Uuid::new_v4(),
            release_version_id: self.release_version_id,
            content: content.to_string(),
            subjects: Vec::new(),
            filters: Vec::new(),
            filter_groups: Vec::new(),
            filter_items: Vec::new(),
            indicators: Vec::new(),
            updated: None,
        }
    }

    pub fn add_footnote(&mut self, footnote: Footnote) -> Uuid {
        let id = footnote.id;
        self.store.footnotes.push(footnote);
        id
    }

    pub fn plan_with(&self, config: &PlannerConfig) -> Result<ReplacementPlan, PlanError> {
        ReplacementPlanService::new(&self.store, &self.store, config)
            .get_replacement_plan(self.release_version_id, self.original_file_id)
    }

    pub fn plan(&self) -> ReplacementPlan {
        self.plan_with(&PlannerConfig::default())
            .expect("replacement plan")
    }
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}
