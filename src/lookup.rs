//! Read-only collaborator contracts consumed by the planner.
//!
//! Implementations own all I/O; the planner only calls through these traits.
//! Failures are reported as `anyhow` errors and propagate to the caller
//! unchanged. [`crate::store::ReleaseStore`] implements every trait over an
//! in-memory snapshot.

use anyhow::Result;
use uuid::Uuid;

use crate::{
    location::Location,
    model::{DataBlock, DataSetVersion, Footnote, LinkedFiles, MappingStatus, Subject},
    time_period::TimePeriod,
};

pub trait ReleaseFileLinkLookup {
    fn release_version_exists(&self, release_version_id: Uuid) -> Result<bool>;

    /// Resolves the original file and its linked replacement within a release
    /// version. `None` when either file is missing or the two are not linked.
    fn check_linked_original_and_replacement_files_exist(
        &self,
        release_version_id: Uuid,
        original_file_id: Uuid,
    ) -> Result<Option<LinkedFiles>>;
}

pub trait SubjectMetaLookup {
    /// Filters and indicator groups of a subject.
    fn get_subject(&self, subject_id: Uuid) -> Result<Option<Subject>>;
}

pub trait LocationLookup {
    fn get_distinct_for_subject(&self, subject_id: Uuid) -> Result<Vec<Location>>;
}

pub trait TimePeriodLookup {
    fn get_time_periods(&self, subject_id: Uuid) -> Result<Vec<TimePeriod>>;
}

pub trait FootnoteLookup {
    /// Footnotes of the release version linked to the subject directly or via
    /// any of its filters, filter groups, filter items or indicators.
    fn get_footnotes(&self, release_version_id: Uuid, subject_id: Uuid) -> Result<Vec<Footnote>>;
}

pub trait DataBlockLookup {
    /// Data blocks of the release version whose query targets the subject.
    fn get_data_blocks(&self, release_version_id: Uuid, subject_id: Uuid)
    -> Result<Vec<DataBlock>>;
}

pub trait DataSetVersionLookup {
    fn get_data_set_version(
        &self,
        data_set_id: Uuid,
        version: &str,
    ) -> Result<Option<DataSetVersion>>;
}

pub trait MappingStatusLookup {
    fn get_mapping_status(&self, data_set_version_id: Uuid) -> Result<Option<MappingStatus>>;
}

/// Everything the planner reads from the statistics and content stores.
pub trait StatisticsLookup:
    ReleaseFileLinkLookup
    + SubjectMetaLookup
    + LocationLookup
    + TimePeriodLookup
    + FootnoteLookup
    + DataBlockLookup
{
}

impl<T> StatisticsLookup for T where
    T: ReleaseFileLinkLookup
        + SubjectMetaLookup
        + LocationLookup
        + TimePeriodLookup
        + FootnoteLookup
        + DataBlockLookup
{
}

/// Everything the planner reads from the public API.
pub trait PublicApiLookup: DataSetVersionLookup + MappingStatusLookup {}

impl<T> PublicApiLookup for T where T: DataSetVersionLookup + MappingStatusLookup {}
