use super::goal::UserProfileContext;
use super::onboarding::ExtractedProfile;
use serde::{Deserialize, Deserializer, Serialize};

/// Nullable column: SQL `NULL` reads the same as a missing value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Row of the hosted `user_profiles` table, keyed by `user_id`.
///
/// Only `user_id` is required. Every other column may be absent or `NULL`,
/// e.g. for a row created before onboarding finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfileRecord {
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub onboarding_done: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub life_areas: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub direction: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub blockers: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weekly_hours: u32,
}

impl UserProfileRecord {
    /// Record written when the user confirms an onboarding summary.
    pub fn completed(user_id: impl Into<String>, profile: &ExtractedProfile) -> Self {
        Self {
            user_id: user_id.into(),
            onboarding_done: true,
            life_areas: profile.life_areas.clone(),
            direction: profile.direction.clone(),
            values: profile.values.clone(),
            blockers: profile.blockers.clone(),
            weekly_hours: profile.weekly_hours,
        }
    }

    pub fn extracted_profile(&self) -> ExtractedProfile {
        ExtractedProfile {
            life_areas: self.life_areas.clone(),
            direction: self.direction.clone(),
            values: self.values.clone(),
            blockers: self.blockers.clone(),
            weekly_hours: self.weekly_hours,
        }
    }

    pub fn grading_context(&self) -> UserProfileContext {
        UserProfileContext {
            life_areas: self.life_areas.clone(),
            direction: self.direction.clone(),
            values: self.values.clone(),
        }
    }
}
