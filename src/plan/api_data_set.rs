use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{DataSetVersion, DataSetVersionStatus, MappingStatus};

/// Whether the public API data set version fed by the original file can be
/// moved onto the replacement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiDataSetVersionPlan {
    pub data_set_id: Uuid,
    pub data_set_title: String,
    pub id: Uuid,
    pub version: String,
    pub status: DataSetVersionStatus,
    pub mapping_status: Option<MappingStatus>,
    pub valid: bool,
}

/// Builds the plan. With the feature disabled the mapping status is not
/// consulted and the plan is always invalid.
pub fn plan_api_data_set_version(
    version: &DataSetVersion,
    mapping_status: Option<MappingStatus>,
    feature_enabled: bool,
) -> ApiDataSetVersionPlan {
    let mapping_status = mapping_status.filter(|_| feature_enabled);
    ApiDataSetVersionPlan {
        data_set_id: version.data_set_id,
        data_set_title: version.data_set_title.clone(),
        id: version.id,
        version: version.version.clone(),
        status: version.status,
        mapping_status,
        valid: mapping_status.is_some_and(|status| status.is_valid()),
    }
}
