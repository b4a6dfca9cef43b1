mod common;

use common::*;
use replacement_planner::{
    config::PlannerConfig, error::PlanError, location::GeographicLevel, model::Subject,
    time_period::TimeIdentifier,
};
use uuid::Uuid;

#[test]
fn matching_filter_item_targets_replacement_id() {
    let original = school_subject(&["Primary schools", "Secondary schools"]);
    let replacement = school_subject(&["Primary schools", "Secondary schools"]);
    let mut fixture = Fixture::new(original.clone(), replacement.clone());

    let mut query = fixture.query();
    query.filters = vec![item_id(&original, "school_type", "Individual", "Primary schools")];
    let data_block_id = fixture.add_data_block("Primary absence", query);

    let plan = fixture.plan();
    assert!(plan.valid);
    assert_eq!(plan.original_subject_id, original.id);
    assert_eq!(plan.replacement_subject_id, replacement.id);
    let data_block = &plan.data_blocks[0];
    assert_eq!(data_block.id, data_block_id);
    assert!(data_block.valid);
    assert!(data_block.fixable);

    let filter = &data_block.filters[0];
    assert_eq!(filter.name, "school_type");
    assert_eq!(filter.label, "School type");
    let item = &filter.groups[0].filter_items[0];
    assert_eq!(item.label, "Primary schools");
    assert_eq!(
        item.target,
        Some(item_id(&replacement, "school_type", "Individual", "Primary schools"))
    );
    assert!(item.valid);
}

#[test]
fn missing_filter_item_is_invalid_without_target() {
    let original = school_subject(&["Primary schools", "Special schools"]);
    let replacement = school_subject(&["Primary schools"]);
    let mut fixture = Fixture::new(original.clone(), replacement);

    let mut query = fixture.query();
    query.filters = vec![item_id(&original, "school_type", "Individual", "Special schools")];
    fixture.add_data_block("Special schools", query);

    let plan = fixture.plan();
    let item = &plan.data_blocks[0].filters[0].groups[0].filter_items[0];
    assert!(!item.valid);
    assert!(item.target.is_none());
    assert!(!plan.data_blocks[0].filters[0].groups[0].valid);
    assert!(!plan.data_blocks[0].filters[0].valid);
    assert!(!plan.valid);
}

#[test]
fn partially_matched_filters_are_fixable() {
    let original = school_subject(&["Primary schools", "Special schools"]);
    let replacement = school_subject(&["Primary schools"]);
    let mut fixture = Fixture::new(original.clone(), replacement);

    let mut query = fixture.query();
    query.filters = vec![
        item_id(&original, "school_type", "Individual", "Primary schools"),
        item_id(&original, "school_type", "Individual", "Special schools"),
    ];
    fixture.add_data_block("Mixed", query);

    let data_block = &fixture.plan().data_blocks[0];
    assert!(!data_block.valid);
    assert!(data_block.fixable);
    assert_eq!(data_block.matched_filter_items(), 1);
}

#[test]
fn no_matched_filter_items_is_unfixable() {
    let original = school_subject(&["Special schools"]);
    let replacement = school_subject(&["Primary schools"]);
    let mut fixture = Fixture::new(original.clone(), replacement);

    let mut query = fixture.query();
    query.filters = vec![item_id(&original, "school_type", "Individual", "Special schools")];
    fixture.add_data_block("Special schools", query);

    let data_block = &fixture.plan().data_blocks[0];
    assert!(!data_block.valid);
    assert!(!data_block.fixable);
}

#[test]
fn introduced_filter_makes_every_data_block_unfixable() {
    let original = school_subject(&["Primary schools"]);
    let mut replacement = school_subject(&["Primary schools"]);
    replacement.filters.push(filter(
        "characteristic",
        "Characteristic",
        vec![group("Gender", &["Male", "Female"])],
    ));
    let mut fixture = Fixture::new(original.clone(), replacement);

    let mut query = fixture.query();
    query.filters = vec![item_id(&original, "school_type", "Individual", "Primary schools")];
    query.indicators = vec![indicator_id(&original, "sess_authorised")];
    fixture.add_data_block("Fully matched", query);

    let plan = fixture.plan();
    assert_eq!(plan.introduced_filters, vec!["characteristic".to_string()]);
    let data_block = &plan.data_blocks[0];
    assert!(data_block.filters[0].valid);
    assert!(data_block.indicator_groups[0].valid);
    assert!(!data_block.valid);
    assert!(!data_block.fixable);
    assert!(!plan.valid);
}

#[test]
fn data_block_without_references_is_valid() {
    let fixture_subject = school_subject(&["Primary schools"]);
    let mut fixture = Fixture::new(fixture_subject, school_subject(&["Primary schools"]));
    let query = fixture.query();
    fixture.add_data_block("Empty query", query);

    let data_block = &fixture.plan().data_blocks[0];
    assert!(data_block.valid);
    assert!(data_block.fixable);
    assert!(data_block.time_periods.is_none());
}

#[test]
fn indicators_match_by_name_within_group() {
    let original = school_subject(&["Primary schools"]);
    let mut replacement = school_subject(&["Primary schools"]);
    replacement.indicator_groups[0]
        .indicators
        .retain(|indicator| indicator.name == "sess_authorised");
    let mut fixture = Fixture::new(original.clone(), replacement.clone());

    let mut query = fixture.query();
    query.indicators = vec![
        indicator_id(&original, "sess_authorised"),
        indicator_id(&original, "sess_unauthorised"),
    ];
    fixture.add_data_block("Indicators", query);

    let plan = fixture.plan();
    let group = &plan.data_blocks[0].indicator_groups[0];
    assert_eq!(group.label, "Absence fields");
    assert_eq!(
        group.indicators[0].target,
        Some(indicator_id(&replacement, "sess_authorised"))
    );
    assert!(!group.indicators[1].valid);
    assert!(!group.valid);
    assert!(!plan.data_blocks[0].valid);
}

#[test]
fn locations_match_by_code_not_id() {
    let original = school_subject(&["Primary schools"]);
    let mut replacement = school_subject(&["Primary schools"]);
    let england = location_id(&original, "E92000001");
    // A replacement row sharing the original's id but describing another place.
    replacement.locations = vec![
        replacement_planner::location::Location::new(
            england,
            GeographicLevel::Country,
            "W92000004",
            "Wales",
        ),
        country("E92000001", "England"),
    ];
    let mut fixture = Fixture::new(original, replacement.clone());

    let mut query = fixture.query();
    query.locations = vec![england];
    fixture.add_data_block("England", query);

    let plan = fixture.plan();
    let location = &plan.data_blocks[0].locations[0];
    assert_eq!(location.geographic_level, GeographicLevel::Country);
    let attribute = &location.location_attributes[0];
    assert_eq!(attribute.code, "E92000001");
    assert_eq!(attribute.target, Some(replacement.locations[1].id));
    assert_ne!(attribute.target, Some(england));
    assert!(plan.valid);
}

#[test]
fn local_authority_matches_on_old_code() {
    let mut original = school_subject(&["Primary schools"]);
    original.locations.push(local_authority("", "370", "Barnsley"));
    let mut replacement = school_subject(&["Primary schools"]);
    replacement
        .locations
        .push(local_authority("E08000016", "370", "Barnsley"));
    let mut fixture = Fixture::new(original.clone(), replacement.clone());

    let mut query = fixture.query();
    query.locations = vec![location_id(&original, "370")];
    fixture.add_data_block("Barnsley", query);

    let plan = fixture.plan();
    let location = &plan.data_blocks[0].locations[0];
    assert_eq!(location.geographic_level, GeographicLevel::LocalAuthority);
    assert_eq!(
        location.location_attributes[0].target,
        Some(location_id(&replacement, "E08000016"))
    );
}

#[test]
fn missing_location_makes_data_block_invalid() {
    let mut original = school_subject(&["Primary schools"]);
    original.locations.push(country("S92000003", "Scotland"));
    let replacement = school_subject(&["Primary schools"]);
    let mut fixture = Fixture::new(original.clone(), replacement);

    let mut query = fixture.query();
    query.locations = vec![
        location_id(&original, "E92000001"),
        location_id(&original, "S92000003"),
    ];
    query.filters = vec![item_id(&original, "school_type", "Individual", "Primary schools")];
    fixture.add_data_block("Nations", query);

    let data_block = &fixture.plan().data_blocks[0];
    assert!(!data_block.locations[0].valid);
    assert!(!data_block.valid);
    // Every filter item matches, so nothing in the filters can be corrected.
    assert!(!data_block.fixable);
    assert_eq!(data_block.invalid_elements(), 1);
}

#[test]
fn fully_matched_filters_with_missing_indicator_are_unfixable() {
    let original = school_subject(&["Primary schools", "Secondary schools"]);
    let mut replacement = school_subject(&["Primary schools", "Secondary schools"]);
    replacement.indicator_groups[0]
        .indicators
        .retain(|indicator| indicator.name != "sess_unauthorised");
    let mut fixture = Fixture::new(original.clone(), replacement);

    let mut query = fixture.query();
    query.filters = vec![
        item_id(&original, "school_type", "Individual", "Primary schools"),
        item_id(&original, "school_type", "Individual", "Secondary schools"),
    ];
    query.indicators = vec![indicator_id(&original, "sess_unauthorised")];
    fixture.add_data_block("Unauthorised absence", query);

    let data_block = &fixture.plan().data_blocks[0];
    assert!(!data_block.valid);
    assert_eq!(data_block.matched_filter_items(), 2);
    assert_eq!(data_block.filter_item_count(), 2);
    assert!(!data_block.fixable);
}

#[test]
fn time_periods_require_exact_year_and_identifier() {
    let original = school_subject(&["Primary schools"]);
    let mut replacement = school_subject(&["Primary schools"]);
    replacement.time_periods = academic_years(&[2019, 2020]);
    let mut fixture = Fixture::new(original, replacement);

    let mut query = fixture.query();
    query.time_period = Some(academic_year_range(2018, 2019));
    fixture.add_data_block("Time series", query);

    let plan = fixture.plan();
    let time_periods = plan.data_blocks[0].time_periods.expect("time periods planned");
    assert_eq!(time_periods.start.year, 2018);
    assert_eq!(time_periods.start.code, TimeIdentifier::AcademicYear);
    assert!(!time_periods.start.valid);
    assert!(time_periods.end.valid);
    assert!(!time_periods.valid);
    assert!(!plan.data_blocks[0].valid);
}

#[test]
fn data_blocks_for_other_subjects_are_not_planned() {
    let original = school_subject(&["Primary schools"]);
    let mut fixture = Fixture::new(original, school_subject(&["Primary schools"]));
    let mut query = fixture.query();
    query.subject_id = Uuid::new_v4();
    fixture.add_data_block("Other subject", query);

    let plan = fixture.plan();
    assert!(plan.data_blocks.is_empty());
    assert!(plan.valid);
}

#[test]
fn dangling_query_reference_invalidates_data_block() {
    let original = school_subject(&["Primary schools"]);
    let mut fixture = Fixture::new(original, school_subject(&["Primary schools"]));
    let stray = Uuid::new_v4();
    let mut query = fixture.query();
    query.indicators = vec![stray];
    fixture.add_data_block("Stray", query);

    let data_block = &fixture.plan().data_blocks[0];
    assert_eq!(data_block.unresolved_references, vec![stray]);
    assert!(!data_block.valid);
}

#[test]
fn unknown_release_version_is_not_found() {
    let fixture = Fixture::new(
        school_subject(&["Primary schools"]),
        school_subject(&["Primary schools"]),
    );
    let err = replacement_planner::service::ReplacementPlanService::new(
        &fixture.store,
        &fixture.store,
        &PlannerConfig::default(),
    )
    .get_replacement_plan(Uuid::new_v4(), fixture.original_file_id)
    .unwrap_err();
    assert!(matches!(err, PlanError::NotFound { entity: "Release version", .. }));
}

#[test]
fn unlinked_original_file_is_not_found() {
    let mut fixture = Fixture::new(
        school_subject(&["Primary schools"]),
        school_subject(&["Primary schools"]),
    );
    fixture.store.files[0].replaced_by = None;

    let err = fixture.plan_with(&PlannerConfig::default()).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains(&fixture.original_file_id.to_string()));
}

#[test]
fn replacement_must_point_back_at_original() {
    let mut fixture = Fixture::new(
        school_subject(&["Primary schools"]),
        school_subject(&["Primary schools"]),
    );
    fixture.store.files[1].replacing = Some(Uuid::new_v4());
    assert!(fixture.plan_with(&PlannerConfig::default()).unwrap_err().is_not_found());
}

#[test]
fn missing_replacement_subject_is_not_found() {
    let mut fixture = Fixture::new(
        school_subject(&["Primary schools"]),
        school_subject(&["Primary schools"]),
    );
    let replacement_subject_id = fixture.replacement.id;
    fixture
        .store
        .subjects
        .retain(|subject: &Subject| subject.id != replacement_subject_id);
    let err = fixture.plan_with(&PlannerConfig::default()).unwrap_err();
    assert!(matches!(err, PlanError::NotFound { entity: "Subject", .. }));
}
