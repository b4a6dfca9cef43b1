use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::location::{GeographicLevel, Location, find_matching};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationAttributePlan {
    pub id: Uuid,
    pub code: String,
    pub label: String,
    pub target: Option<Uuid>,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationPlan {
    pub geographic_level: GeographicLevel,
    pub label: String,
    pub location_attributes: Vec<LocationAttributePlan>,
    pub valid: bool,
}

/// Plans locations by geographic level and code against the full set of
/// replacement locations, grouped by level in order of first reference.
pub fn plan_locations(
    location_ids: &[Uuid],
    original_locations: &[Location],
    replacement_locations: &[Location],
) -> (Vec<LocationPlan>, Vec<Uuid>) {
    let originals = original_locations
        .iter()
        .map(|location| (location.id, location))
        .collect::<HashMap<_, _>>();
    let mut plans: Vec<LocationPlan> = Vec::new();
    let mut unresolved = Vec::new();

    for &location_id in location_ids.iter().unique() {
        let Some(location) = originals.get(&location_id) else {
            warn!("Location {location_id} is not part of the original subject");
            unresolved.push(location_id);
            continue;
        };
        let target = find_matching(location, replacement_locations).map(|matched| matched.id);
        debug!(
            "Location {} '{}' -> {:?}",
            location.geographic_level,
            location.display_code(),
            target
        );

        let level = location.geographic_level;
        let plan_index = match plans.iter().position(|plan| plan.geographic_level == level) {
            Some(idx) => idx,
            None => {
                plans.push(LocationPlan {
                    geographic_level: level,
                    label: level.to_string(),
                    location_attributes: Vec::new(),
                    valid: true,
                });
                plans.len() - 1
            }
        };
        plans[plan_index]
            .location_attributes
            .push(LocationAttributePlan {
                id: location.id,
                code: location.display_code().to_string(),
                label: location.label.clone(),
                target,
                valid: target.is_some(),
            });
    }

    for plan in &mut plans {
        plan.valid = plan.location_attributes.iter().all(|attribute| attribute.valid);
    }

    (plans, unresolved)
}
