//! In-memory snapshot of the statistics and content stores.
//!
//! A [`ReleaseStore`] is loaded from a JSON or YAML document and implements
//! every lookup in [`crate::lookup`], so the CLI and tests can drive the
//! planner without a database.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    document,
    location::Location,
    lookup::{
        DataBlockLookup, DataSetVersionLookup, FootnoteLookup, LocationLookup,
        MappingStatusLookup, ReleaseFileLinkLookup, SubjectMetaLookup, TimePeriodLookup,
    },
    model::{
        DataBlock, DataFile, DataSetVersion, Footnote, LinkedFiles, MappingStatus, ReleaseFile,
        ReleaseVersion, Subject,
    },
    replace::ReplacementOutcome,
    time_period::TimePeriod,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MappingStatusEntry {
    pub data_set_version_id: Uuid,
    #[serde(flatten)]
    pub status: MappingStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReleaseStore {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub release_versions: Vec<ReleaseVersion>,
    pub release_files: Vec<ReleaseFile>,
    pub files: Vec<DataFile>,
    pub subjects: Vec<Subject>,
    pub data_blocks: Vec<DataBlock>,
    pub footnotes: Vec<Footnote>,
    pub data_set_versions: Vec<DataSetVersion>,
    pub mapping_statuses: Vec<MappingStatusEntry>,
}

impl ReleaseStore {
    pub fn load(path: &Path) -> Result<Self> {
        let store: ReleaseStore =
            document::load(path).with_context(|| format!("Loading release snapshot {path:?}"))?;
        info!(
            "Loaded snapshot with {} release version(s), {} file(s), {} subject(s)",
            store.release_versions.len(),
            store.files.len(),
            store.subjects.len()
        );
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        document::save(path, self).with_context(|| format!("Writing release snapshot {path:?}"))
    }

    pub fn subject(&self, subject_id: Uuid) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.id == subject_id)
    }

    pub fn file(&self, file_id: Uuid) -> Option<&DataFile> {
        self.files.iter().find(|file| file.id == file_id)
    }

    pub fn release_file(&self, release_version_id: Uuid, file_id: Uuid) -> Option<&ReleaseFile> {
        self.release_files.iter().find(|release_file| {
            release_file.release_version_id == release_version_id && release_file.file_id == file_id
        })
    }

    fn subject_element_ids(subject: &Subject) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for filter in &subject.filters {
            ids.push(filter.id);
            for group in &filter.groups {
                ids.push(group.id);
                ids.extend(group.items.iter().map(|item| item.id));
            }
        }
        for group in &subject.indicator_groups {
            ids.extend(group.indicators.iter().map(|indicator| indicator.id));
        }
        ids
    }

    /// Persists the result of applying a replacement.
    ///
    /// Data blocks and footnotes are overwritten by id, the original file is
    /// detached from the release version, and the replacement release file
    /// takes over the original's public API data set link.
    pub fn apply_outcome(&mut self, outcome: &ReplacementOutcome) -> Result<()> {
        for updated in &outcome.data_blocks {
            let existing = self
                .data_blocks
                .iter_mut()
                .find(|data_block| data_block.id == updated.id)
                .with_context(|| format!("Data block {} missing from snapshot", updated.id))?;
            *existing = updated.clone();
        }
        for updated in &outcome.footnotes {
            let existing = self
                .footnotes
                .iter_mut()
                .find(|footnote| footnote.id == updated.id)
                .with_context(|| format!("Footnote {} missing from snapshot", updated.id))?;
            *existing = updated.clone();
        }

        let original_release_file = self
            .release_file(outcome.release_version_id, outcome.original_file_id)
            .cloned()
            .with_context(|| {
                format!(
                    "File {} is not part of release version {}",
                    outcome.original_file_id, outcome.release_version_id
                )
            })?;
        self.release_files.retain(|release_file| {
            !(release_file.release_version_id == outcome.release_version_id
                && release_file.file_id == outcome.original_file_id)
        });
        if let Some(replacement_release_file) = self.release_files.iter_mut().find(|release_file| {
            release_file.release_version_id == outcome.release_version_id
                && release_file.file_id == outcome.replacement_file_id
        }) {
            if replacement_release_file.public_api_data_set_id.is_none() {
                replacement_release_file.public_api_data_set_id =
                    original_release_file.public_api_data_set_id;
                replacement_release_file.public_api_data_set_version =
                    original_release_file.public_api_data_set_version;
            }
        }
        if let Some(replacement) = self
            .files
            .iter_mut()
            .find(|file| file.id == outcome.replacement_file_id)
        {
            replacement.replacing = None;
        }
        if let Some(original) = self
            .files
            .iter_mut()
            .find(|file| file.id == outcome.original_file_id)
        {
            original.replaced_by = None;
        }
        debug!(
            "Applied replacement of {} by {} in release version {}",
            outcome.original_file_id, outcome.replacement_file_id, outcome.release_version_id
        );
        Ok(())
    }
}

impl ReleaseFileLinkLookup for ReleaseStore {
    fn release_version_exists(&self, release_version_id: Uuid) -> Result<bool> {
        Ok(self
            .release_versions
            .iter()
            .any(|release_version| release_version.id == release_version_id))
    }

    fn check_linked_original_and_replacement_files_exist(
        &self,
        release_version_id: Uuid,
        original_file_id: Uuid,
    ) -> Result<Option<LinkedFiles>> {
        let Some(original_release_file) = self.release_file(release_version_id, original_file_id)
        else {
            return Ok(None);
        };
        let Some(original) = self.file(original_file_id) else {
            return Ok(None);
        };
        let Some(replacement_id) = original.replaced_by else {
            return Ok(None);
        };
        let Some(replacement) = self.file(replacement_id) else {
            return Ok(None);
        };
        if replacement.replacing != Some(original_file_id) {
            return Ok(None);
        }
        let Some(replacement_release_file) = self.release_file(release_version_id, replacement_id)
        else {
            return Ok(None);
        };
        Ok(Some(LinkedFiles {
            original_release_file: original_release_file.clone(),
            original: original.clone(),
            replacement_release_file: replacement_release_file.clone(),
            replacement: replacement.clone(),
        }))
    }
}

impl SubjectMetaLookup for ReleaseStore {
    fn get_subject(&self, subject_id: Uuid) -> Result<Option<Subject>> {
        Ok(self.subject(subject_id).cloned())
    }
}

impl LocationLookup for ReleaseStore {
    fn get_distinct_for_subject(&self, subject_id: Uuid) -> Result<Vec<Location>> {
        let mut locations: Vec<Location> = Vec::new();
        for location in self
            .subject(subject_id)
            .map(|subject| subject.locations.as_slice())
            .unwrap_or_default()
        {
            if !locations.iter().any(|existing| existing.id == location.id) {
                locations.push(location.clone());
            }
        }
        Ok(locations)
    }
}

impl TimePeriodLookup for ReleaseStore {
    fn get_time_periods(&self, subject_id: Uuid) -> Result<Vec<TimePeriod>> {
        let mut periods = self
            .subject(subject_id)
            .map(|subject| subject.time_periods.clone())
            .unwrap_or_default();
        periods.sort();
        periods.dedup();
        Ok(periods)
    }
}

impl FootnoteLookup for ReleaseStore {
    fn get_footnotes(&self, release_version_id: Uuid, subject_id: Uuid) -> Result<Vec<Footnote>> {
        let element_ids = self
            .subject(subject_id)
            .map(Self::subject_element_ids)
            .unwrap_or_default();
        let touches_subject = |footnote: &Footnote| {
            footnote.subjects.contains(&subject_id)
                || footnote
                    .filters
                    .iter()
                    .chain(&footnote.filter_groups)
                    .chain(&footnote.filter_items)
                    .chain(&footnote.indicators)
                    .any(|id| element_ids.contains(id))
        };
        Ok(self
            .footnotes
            .iter()
            .filter(|footnote| footnote.release_version_id == release_version_id)
            .filter(|footnote| touches_subject(footnote))
            .cloned()
            .collect())
    }
}

impl DataBlockLookup for ReleaseStore {
    fn get_data_blocks(
        &self,
        release_version_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Vec<DataBlock>> {
        Ok(self
            .data_blocks
            .iter()
            .filter(|data_block| {
                data_block.release_version_id == release_version_id
                    && data_block.query.subject_id == subject_id
            })
            .cloned()
            .collect())
    }
}

impl DataSetVersionLookup for ReleaseStore {
    fn get_data_set_version(
        &self,
        data_set_id: Uuid,
        version: &str,
    ) -> Result<Option<DataSetVersion>> {
        Ok(self
            .data_set_versions
            .iter()
            .find(|candidate| candidate.data_set_id == data_set_id && candidate.version == version)
            .cloned())
    }
}

impl MappingStatusLookup for ReleaseStore {
    fn get_mapping_status(&self, data_set_version_id: Uuid) -> Result<Option<MappingStatus>> {
        Ok(self
            .mapping_statuses
            .iter()
            .find(|entry| entry.data_set_version_id == data_set_version_id)
            .map(|entry| entry.status))
    }
}
