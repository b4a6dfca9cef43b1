use log::{debug, info};
use uuid::Uuid;

use crate::{
    config::PlannerConfig,
    error::PlanError,
    lookup::{PublicApiLookup, StatisticsLookup},
    model::{DataBlock, Footnote, LinkedFiles, Subject},
    plan::{
        ApiDataSetVersionPlan, PlanInputs, ReplacementPlan, compute_replacement_plan,
        plan_api_data_set_version,
    },
    replace::{ReplacementOutcome, apply_replacement},
};

/// Data blocks and footnotes of the original subject, as loaded for planning.
struct References {
    data_blocks: Vec<DataBlock>,
    footnotes: Vec<Footnote>,
}

/// Loads everything a replacement plan needs and hands it to the pure
/// computation in [`crate::plan`].
pub struct ReplacementPlanService<'a> {
    statistics: &'a dyn StatisticsLookup,
    public_api: &'a dyn PublicApiLookup,
    config: &'a PlannerConfig,
}

impl<'a> ReplacementPlanService<'a> {
    pub fn new(
        statistics: &'a dyn StatisticsLookup,
        public_api: &'a dyn PublicApiLookup,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            statistics,
            public_api,
            config,
        }
    }

    fn linked_files(
        &self,
        release_version_id: Uuid,
        original_file_id: Uuid,
    ) -> Result<LinkedFiles, PlanError> {
        if !self.statistics.release_version_exists(release_version_id)? {
            return Err(PlanError::not_found("Release version", release_version_id));
        }
        self.statistics
            .check_linked_original_and_replacement_files_exist(release_version_id, original_file_id)?
            .ok_or_else(|| PlanError::not_found("Replacement for file", original_file_id))
    }

    fn subject(&self, subject_id: Uuid) -> Result<Subject, PlanError> {
        self.statistics
            .get_subject(subject_id)?
            .ok_or_else(|| PlanError::not_found("Subject", subject_id))
    }

    fn api_data_set_version_plan(
        &self,
        files: &LinkedFiles,
    ) -> Result<Option<ApiDataSetVersionPlan>, PlanError> {
        let Some((data_set_id, version)) = files.original_release_file.public_api_link() else {
            return Ok(None);
        };
        let data_set_version = self
            .public_api
            .get_data_set_version(data_set_id, version)?
            .ok_or_else(|| PlanError::not_found("Data set", data_set_id))?;
        let enabled = self.config.enable_replacement_of_public_api_data_sets;
        let mapping_status = if enabled {
            self.public_api.get_mapping_status(data_set_version.id)?
        } else {
            debug!("Replacement of public API data sets is disabled");
            None
        };
        Ok(Some(plan_api_data_set_version(
            &data_set_version,
            mapping_status,
            enabled,
        )))
    }

    pub fn get_replacement_plan(
        &self,
        release_version_id: Uuid,
        original_file_id: Uuid,
    ) -> Result<ReplacementPlan, PlanError> {
        let files = self.linked_files(release_version_id, original_file_id)?;
        let (plan, _) = self.plan_for(release_version_id, &files)?;
        Ok(plan)
    }

    /// Computes the plan along with the data blocks and footnotes it was
    /// computed from.
    fn plan_for(
        &self,
        release_version_id: Uuid,
        files: &LinkedFiles,
    ) -> Result<(ReplacementPlan, References), PlanError> {
        let original_subject = self.subject(files.original.subject_id)?;
        let replacement_subject = self.subject(files.replacement.subject_id)?;
        let original_locations = self
            .statistics
            .get_distinct_for_subject(original_subject.id)?;
        let replacement_locations = self
            .statistics
            .get_distinct_for_subject(replacement_subject.id)?;
        let replacement_time_periods = self.statistics.get_time_periods(replacement_subject.id)?;
        let data_blocks = self
            .statistics
            .get_data_blocks(release_version_id, original_subject.id)?;
        let footnotes = self
            .statistics
            .get_footnotes(release_version_id, original_subject.id)?;
        let api_data_set_version_plan = self.api_data_set_version_plan(files)?;

        debug!(
            "Planning replacement of '{}' by '{}': {} data block(s), {} footnote(s)",
            files.original.filename,
            files.replacement.filename,
            data_blocks.len(),
            footnotes.len()
        );

        let plan = compute_replacement_plan(PlanInputs {
            original_subject: &original_subject,
            replacement_subject: &replacement_subject,
            original_locations: &original_locations,
            replacement_locations: &replacement_locations,
            replacement_time_periods: &replacement_time_periods,
            data_blocks: &data_blocks,
            footnotes: &footnotes,
            api_data_set_version_plan,
        });
        info!(
            "Replacement plan for '{}' is {} ({} invalid data block(s), {} invalid footnote(s))",
            files.original.filename,
            if plan.valid { "valid" } else { "invalid" },
            plan.invalid_data_blocks().count(),
            plan.invalid_footnotes().count()
        );
        Ok((plan, References { data_blocks, footnotes }))
    }

    /// Computes the plan and, when it is valid, rewrites the original file's
    /// data blocks and footnotes onto the replacement.
    pub fn replace(
        &self,
        release_version_id: Uuid,
        original_file_id: Uuid,
    ) -> Result<ReplacementOutcome, PlanError> {
        let files = self.linked_files(release_version_id, original_file_id)?;
        let (plan, references) = self.plan_for(release_version_id, &files)?;
        apply_replacement(
            release_version_id,
            original_file_id,
            files.replacement.id,
            &plan,
            &references.data_blocks,
            &references.footnotes,
        )
    }
}
