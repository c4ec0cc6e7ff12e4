//! Pure payload validation. Nothing here touches the data store; callers
//! treat a failed result as fatal for the request (400).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{
    is_known_category, AgeRange, GoalStatus, GoalType, IntentLevel, RetroType, SkillLevel,
    Timeframe,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Declared as "MIN-MAX", e.g. "15-17"
    pub age_range: String,
    #[serde(default)]
    pub parental_consent: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingInterest {
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub skill_level: String,
    pub intent_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    pub interests: Vec<OnboardingInterest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCreateRequest {
    pub category: String,
    pub goal_type: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub target_level: String,
    pub timeframe: String,
    #[serde(default)]
    pub target_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdateRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_level: Option<String>,
    #[serde(default)]
    pub target_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrospectiveRequest {
    pub retro_type: String,
    pub insights: String,
    #[serde(default)]
    pub skill_updates: Option<Value>,
    #[serde(default)]
    pub goals_reviewed: Option<Value>,
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

pub fn validate_registration(req: &RegisterRequest) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if req.email.trim().is_empty() {
        result.push("email", "Email is required");
    } else if !looks_like_email(&req.email) {
        result.push("email", "Email address is not valid");
    }

    if req.password.len() < 8 {
        result.push("password", "Password must be at least 8 characters");
    }

    match AgeRange::parse(&req.age_range) {
        None => result.push("ageRange", "Age range must be of the form MIN-MAX"),
        Some(range) => {
            if range.requires_parental_consent() && req.parental_consent != Some(true) {
                result.push(
                    "parentalConsent",
                    "Parental consent is required for users under 13",
                );
            }
        }
    }

    result
}

pub fn validate_onboarding(req: &OnboardingRequest) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if req.interests.is_empty() {
        result.push("interests", "At least one interest is required");
        return result;
    }

    let mut seen = Vec::new();
    for (i, interest) in req.interests.iter().enumerate() {
        let field = |name: &str| format!("interests[{}].{}", i, name);

        if !is_known_category(&interest.category) {
            result.push(&field("category"), "Unknown interest category");
        } else if seen.contains(&interest.category.as_str()) {
            result.push(&field("category"), "Duplicate interest category");
        }
        seen.push(interest.category.as_str());

        if SkillLevel::parse(&interest.skill_level).is_none() {
            result.push(&field("skillLevel"), "Unknown skill level");
        }
        if IntentLevel::parse(&interest.intent_level).is_none() {
            result.push(&field("intentLevel"), "Unknown intent level");
        }
    }

    result
}

pub fn validate_goal(req: &GoalCreateRequest, now: DateTime<Utc>) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if req.title.trim().is_empty() {
        result.push("title", "Title is required");
    }
    if !is_known_category(&req.category) {
        result.push("category", "Unknown interest category");
    }
    if GoalType::parse(&req.goal_type).is_none() {
        result.push("goalType", "Unknown goal type");
    }
    if SkillLevel::parse(&req.target_level).is_none() {
        result.push("targetLevel", "Unknown target level");
    }
    if Timeframe::parse(&req.timeframe).is_none() {
        result.push("timeframe", "Unknown timeframe");
    }
    if let Some(date) = &req.target_date {
        match DateTime::parse_from_rfc3339(date) {
            Err(_) => result.push("targetDate", "Target date must be RFC 3339"),
            Ok(d) if d.with_timezone(&Utc) < now => {
                result.push("targetDate", "Target date must not be in the past")
            }
            Ok(_) => {}
        }
    }

    result
}

pub fn validate_goal_update(req: &GoalUpdateRequest, now: DateTime<Utc>) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if let Some(status) = &req.status {
        if GoalStatus::parse(status).is_none() {
            result.push("status", "Status must be active, completed, paused or cancelled");
        }
    }
    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            result.push("title", "Title must not be empty");
        }
    }
    if let Some(level) = &req.target_level {
        if SkillLevel::parse(level).is_none() {
            result.push("targetLevel", "Unknown target level");
        }
    }
    if let Some(date) = &req.target_date {
        match DateTime::parse_from_rfc3339(date) {
            Err(_) => result.push("targetDate", "Target date must be RFC 3339"),
            Ok(d) if d.with_timezone(&Utc) < now => {
                result.push("targetDate", "Target date must not be in the past")
            }
            Ok(_) => {}
        }
    }

    result
}

pub fn validate_retrospective(req: &RetrospectiveRequest) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if RetroType::parse(&req.retro_type).is_none() {
        result.push("retroType", "Unknown retrospective type");
    }
    if req.insights.trim().is_empty() {
        result.push("insights", "Insights must not be empty");
    }

    result
}

/// Minimal shape check. Real deliverability is out of scope; this only
/// rejects obvious garbage before it reaches the store.
fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(age_range: &str, consent: Option<bool>) -> RegisterRequest {
        RegisterRequest {
            email: "a@x.com".into(),
            password: "longenough".into(),
            age_range: age_range.into(),
            parental_consent: consent,
        }
    }

    #[test]
    fn rejects_under_13_without_consent() {
        let result = validate_registration(&register("10-12", None));
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "parentalConsent"));

        let result = validate_registration(&register("10-12", Some(false)));
        assert!(!result.is_valid());
    }

    #[test]
    fn accepts_under_13_with_consent() {
        assert!(validate_registration(&register("10-12", Some(true))).is_valid());
    }

    #[test]
    fn teens_do_not_need_consent() {
        // 15 >= 13, so parentalConsent:false is fine
        assert!(validate_registration(&register("15-17", Some(false))).is_valid());
        assert!(validate_registration(&register("13-15", None)).is_valid());
    }

    #[test]
    fn rejects_short_password_and_bad_email() {
        let mut req = register("18-24", None);
        req.password = "short".into();
        req.email = "not-an-email".into();
        let result = validate_registration(&req);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn onboarding_rejects_empty_and_duplicates() {
        let result = validate_onboarding(&OnboardingRequest { interests: vec![] });
        assert!(!result.is_valid());

        let interest = OnboardingInterest {
            category: "music".into(),
            subcategory: None,
            skill_level: "beginner".into(),
            intent_level: "casual".into(),
        };
        let result = validate_onboarding(&OnboardingRequest {
            interests: vec![interest.clone(), interest],
        });
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("Duplicate")));
    }

    #[test]
    fn onboarding_checks_enum_membership() {
        let result = validate_onboarding(&OnboardingRequest {
            interests: vec![OnboardingInterest {
                category: "underwater-basket-weaving".into(),
                subcategory: None,
                skill_level: "wizard".into(),
                intent_level: "casual".into(),
            }],
        });
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn goal_validation_covers_enums_and_dates() {
        let now = Utc::now();
        let mut req = GoalCreateRequest {
            category: "fitness".into(),
            goal_type: "skill".into(),
            title: "Run a 5k".into(),
            description: None,
            target_level: "intermediate".into(),
            timeframe: "three_months".into(),
            target_date: None,
        };
        assert!(validate_goal(&req, now).is_valid());

        req.target_date = Some("2001-01-01T00:00:00Z".into());
        assert!(!validate_goal(&req, now).is_valid());

        req.target_date = Some("next tuesday".into());
        assert!(!validate_goal(&req, now).is_valid());
    }

    #[test]
    fn goal_update_requires_known_status() {
        let now = Utc::now();
        let result = validate_goal_update(
            &GoalUpdateRequest {
                status: Some("abandoned".into()),
                title: None,
                description: None,
                target_level: None,
                target_date: None,
            },
            now,
        );
        assert!(!result.is_valid());

        for status in ["active", "completed", "paused", "cancelled"] {
            let result = validate_goal_update(
                &GoalUpdateRequest {
                    status: Some(status.into()),
                    title: None,
                    description: None,
                    target_level: None,
                    target_date: None,
                },
                now,
            );
            assert!(result.is_valid(), "{} should be accepted", status);
        }
    }

    #[test]
    fn goal_update_rejects_past_target_date() {
        // Same rule as creation: dates cannot move into the past
        let now = Utc::now();
        let mut req = GoalUpdateRequest {
            status: None,
            title: None,
            description: None,
            target_level: None,
            target_date: Some("2001-01-01T00:00:00Z".into()),
        };
        let result = validate_goal_update(&req, now);
        assert!(result.errors.iter().any(|e| e.field == "targetDate"));

        req.target_date = Some("2999-01-01T00:00:00Z".into());
        assert!(validate_goal_update(&req, now).is_valid());
    }

    #[test]
    fn retrospective_requires_type_and_insights() {
        let result = validate_retrospective(&RetrospectiveRequest {
            retro_type: "daily".into(),
            insights: "  ".into(),
            skill_updates: None,
            goals_reviewed: None,
        });
        assert_eq!(result.errors.len(), 2);
    }
}
