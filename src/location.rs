//! Geographic levels and location attributes.
//!
//! Replacement data files create their own location rows, so a location is never
//! matched across subjects by id. Instead each [`Location`] exposes the code of
//! the attribute at its [`GeographicLevel`], and two locations match when they sit
//! at the same level and share that code. Local authorities additionally match on
//! their legacy (old) code, which older files carry in place of the current code.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GeographicLevel {
    Country,
    EnglishDevolvedArea,
    Institution,
    LocalAuthority,
    LocalAuthorityDistrict,
    LocalEnterprisePartnership,
    LocalSkillsImprovementPlanArea,
    MayoralCombinedAuthority,
    MultiAcademyTrust,
    OpportunityArea,
    ParliamentaryConstituency,
    PlanningArea,
    Provider,
    Region,
    RscRegion,
    School,
    Sponsor,
    Ward,
}

impl GeographicLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeographicLevel::Country => "National",
            GeographicLevel::EnglishDevolvedArea => "English devolved area",
            GeographicLevel::Institution => "Institution",
            GeographicLevel::LocalAuthority => "Local authority",
            GeographicLevel::LocalAuthorityDistrict => "Local authority district",
            GeographicLevel::LocalEnterprisePartnership => "Local enterprise partnership",
            GeographicLevel::LocalSkillsImprovementPlanArea => {
                "Local skills improvement plan area"
            }
            GeographicLevel::MayoralCombinedAuthority => "Mayoral combined authority",
            GeographicLevel::MultiAcademyTrust => "Multi-academy trust",
            GeographicLevel::OpportunityArea => "Opportunity area",
            GeographicLevel::ParliamentaryConstituency => "Parliamentary constituency",
            GeographicLevel::PlanningArea => "Planning area",
            GeographicLevel::Provider => "Provider",
            GeographicLevel::Region => "Regional",
            GeographicLevel::RscRegion => "RSC region",
            GeographicLevel::School => "School",
            GeographicLevel::Sponsor => "Sponsor",
            GeographicLevel::Ward => "Ward",
        }
    }

    /// Whether locations at this level may be identified by a legacy code.
    pub fn has_old_code(&self) -> bool {
        matches!(self, GeographicLevel::LocalAuthority)
    }
}

impl fmt::Display for GeographicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub id: Uuid,
    pub geographic_level: GeographicLevel,
    pub code: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_code: Option<String>,
}

impl Location {
    pub fn new(
        id: Uuid,
        geographic_level: GeographicLevel,
        code: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id,
            geographic_level,
            code: code.into(),
            label: label.into(),
            old_code: None,
        }
    }

    pub fn with_old_code(mut self, old_code: impl Into<String>) -> Self {
        self.old_code = Some(old_code.into());
        self
    }

    fn current_code(&self) -> Option<&str> {
        Some(self.code.trim()).filter(|code| !code.is_empty())
    }

    fn legacy_code(&self) -> Option<&str> {
        if !self.geographic_level.has_old_code() {
            return None;
        }
        self.old_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// The code shown to reviewers: the current code, falling back to the legacy one.
    pub fn display_code(&self) -> &str {
        self.current_code()
            .or_else(|| self.legacy_code())
            .unwrap_or_default()
    }

    /// Whether `other` describes the same place as `self`.
    ///
    /// Locations at different levels never match, and blank codes match nothing.
    pub fn matches(&self, other: &Location) -> bool {
        if self.geographic_level != other.geographic_level {
            return false;
        }
        if let (Some(left), Some(right)) = (self.current_code(), other.current_code())
            && left == right
        {
            return true;
        }
        matches!(
            (self.legacy_code(), other.legacy_code()),
            (Some(left), Some(right)) if left == right
        )
    }
}

/// Finds the first replacement location describing the same place as `original`.
pub fn find_matching<'a>(original: &Location, candidates: &'a [Location]) -> Option<&'a Location> {
    candidates.iter().find(|candidate| original.matches(candidate))
}
