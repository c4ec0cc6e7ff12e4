use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::AgeRange;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub age_range_min: i32,
    pub age_range_max: i32,
    pub family_mode: bool,
    pub onboarding_completed: bool,
    pub allow_peer_comparisons: bool,
    pub share_progress_with_family: bool,
    pub show_on_leaderboards: bool,
    pub allow_mentor_contact: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn age_range(&self) -> AgeRange {
        AgeRange::new(self.age_range_min, self.age_range_max)
    }
}

/// The privacy toggle set, as exposed on /api/user/privacy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPreferences {
    pub allow_peer_comparisons: bool,
    pub share_progress_with_family: bool,
    pub show_on_leaderboards: bool,
    pub allow_mentor_contact: bool,
}

impl From<&User> for PrivacyPreferences {
    fn from(user: &User) -> Self {
        Self {
            allow_peer_comparisons: user.allow_peer_comparisons,
            share_progress_with_family: user.share_progress_with_family,
            show_on_leaderboards: user.show_on_leaderboards,
            allow_mentor_contact: user.allow_mentor_contact,
        }
    }
}
