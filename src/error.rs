use uuid::Uuid;

/// Errors surfaced while computing or applying a replacement plan.
///
/// An element that cannot be matched in the replacement data is not an error;
/// it is reported as invalid inside the plan itself.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("replacement of file {original_file_id} is not valid and cannot be applied")]
    InvalidPlan { original_file_id: Uuid },

    #[error(transparent)]
    Lookup(#[from] anyhow::Error),
}

impl PlanError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        PlanError::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PlanError::NotFound { .. })
    }
}
