//! Candidate profile entity and its partial update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_PROFILE_FIELD_LENGTH, MAX_PROFILE_SUMMARY_LENGTH};
use crate::error::{DomainError, DomainResult};
use crate::patch::Patch;

/// Candidate profile, one per candidate user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Profile {
    pub user_id: Uuid,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub salary_expectation: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Profile with every attribute unset
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            headline: None,
            summary: None,
            location: None,
            salary_expectation: None,
            updated_at: crate::now(),
        }
    }

    /// Merge a validated update. Absent fields keep their stored value.
    pub fn apply(&mut self, update: ProfileUpdate) -> DomainResult<()> {
        let update = update.normalize()?;

        self.headline = update.headline.apply_to(self.headline.take());
        self.summary = update.summary.apply_to(self.summary.take());
        self.location = update.location.apply_to(self.location.take());
        self.salary_expectation = update.salary_expectation.apply_to(self.salary_expectation);
        self.updated_at = crate::now();
        Ok(())
    }
}

/// Partial profile update. See [`Patch`] for the absent/null/value semantics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProfileUpdate {
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub headline: Patch<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub summary: Patch<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub location: Patch<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub salary_expectation: Patch<f64>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        check_length("headline", self.headline.as_value(), MAX_PROFILE_FIELD_LENGTH)?;
        check_length("summary", self.summary.as_value(), MAX_PROFILE_SUMMARY_LENGTH)?;
        check_length("location", self.location.as_value(), MAX_PROFILE_FIELD_LENGTH)?;
        if let Some(salary) = self.salary_expectation.as_value() {
            validate_amount("salary_expectation", *salary)?;
        }
        Ok(())
    }

    /// Validated copy with text trimmed. Blank text becomes `Null`.
    pub fn normalize(self) -> DomainResult<Self> {
        self.validate()?;
        Ok(Self {
            headline: normalize_text(self.headline),
            summary: normalize_text(self.summary),
            location: normalize_text(self.location),
            salary_expectation: self.salary_expectation,
        })
    }
}

/// Validate a monetary amount: finite and non-negative.
pub fn validate_amount(field: &str, amount: f64) -> DomainResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(DomainError::validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}

pub(crate) fn check_length(field: &str, value: Option<&String>, max: usize) -> DomainResult<()> {
    match value {
        Some(value) if value.chars().count() > max => Err(DomainError::validation(format!(
            "{} must be at most {} characters",
            field, max
        ))),
        _ => Ok(()),
    }
}

pub(crate) fn normalize_text(patch: Patch<String>) -> Patch<String> {
    match patch.map(|value| value.trim().to_string()) {
        Patch::Value(value) if value.is_empty() => Patch::Null,
        other => other,
    }
}

/// Merge optional free text; blank strings are stored as absent values.
pub(crate) fn merge_text(patch: Patch<String>, current: Option<String>) -> Option<String> {
    normalize_text(patch).apply_to(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_profile() -> Profile {
        let mut profile = Profile::empty(Uuid::new_v4());
        profile.headline = Some("Backend engineer".to_string());
        profile.summary = Some("Ten years of Rust".to_string());
        profile.location = Some("Berlin".to_string());
        profile.salary_expectation = Some(90_000.0);
        profile
    }

    #[test]
    fn test_partial_update_keeps_absent_fields() {
        let mut profile = stored_profile();
        profile
            .apply(ProfileUpdate {
                location: Patch::Value("Lisbon".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(profile.location.as_deref(), Some("Lisbon"));
        assert_eq!(profile.headline.as_deref(), Some("Backend engineer"));
        assert_eq!(profile.summary.as_deref(), Some("Ten years of Rust"));
        assert_eq!(profile.salary_expectation, Some(90_000.0));
    }

    #[test]
    fn test_null_clears_field() {
        let mut profile = stored_profile();
        profile
            .apply(ProfileUpdate {
                summary: Patch::Null,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(profile.summary, None);
        assert_eq!(profile.headline.as_deref(), Some("Backend engineer"));
    }

    #[test]
    fn test_negative_salary_rejected() {
        let mut profile = stored_profile();
        let result = profile.apply(ProfileUpdate {
            salary_expectation: Patch::Value(-1.0),
            ..Default::default()
        });

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(profile.salary_expectation, Some(90_000.0));
    }

    #[test]
    fn test_blank_text_is_cleared() {
        let mut profile = stored_profile();
        profile
            .apply(ProfileUpdate {
                headline: Patch::Value("   ".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(profile.headline, None);
    }

    #[test]
    fn test_normalize_trims_and_keeps_absent_fields() {
        let update = ProfileUpdate {
            headline: Patch::Value("  Rust developer ".to_string()),
            summary: Patch::Value(" ".to_string()),
            ..Default::default()
        }
        .normalize()
        .unwrap();

        assert_eq!(update.headline, Patch::Value("Rust developer".to_string()));
        assert_eq!(update.summary, Patch::Null);
        assert!(update.location.is_absent());
        assert!(update.salary_expectation.is_absent());
    }
}
