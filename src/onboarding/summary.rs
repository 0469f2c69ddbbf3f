//! Field-level edits on the extracted profile shown in the summary.

use crate::model::ExtractedProfile;

/// Separator used when life areas are shown or edited as one line.
pub const LIFE_AREA_SEPARATOR: &str = "·";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ProfileField {
    LifeAreas,
    Direction,
    Values,
    Blockers,
    WeeklyHours,
}

impl ProfileField {
    pub const ALL: [Self; 5] = [
        Self::LifeAreas,
        Self::Direction,
        Self::Values,
        Self::Blockers,
        Self::WeeklyHours,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::LifeAreas => "🎯 Focus areas",
            Self::Direction => "✨ Direction",
            Self::Values => "💎 Values",
            Self::Blockers => "🚧 Blockers",
            Self::WeeklyHours => "⏱️ Time available",
        }
    }

    /// How the field reads in the summary card.
    pub fn display(self, profile: &ExtractedProfile) -> String {
        match self {
            Self::LifeAreas => profile.life_areas.join(&format!(" {LIFE_AREA_SEPARATOR} ")),
            Self::Direction => profile.direction.clone(),
            Self::Values => profile.values.clone(),
            Self::Blockers => profile.blockers.clone(),
            Self::WeeklyHours => format!("~{} hrs / week", profile.weekly_hours),
        }
    }

    /// Prefill text when the user starts editing the field.
    pub fn edit_text(self, profile: &ExtractedProfile) -> String {
        match self {
            Self::WeeklyHours => profile.weekly_hours.to_string(),
            other => other.display(profile),
        }
    }

    /// Overwrite this field from raw input, leaving every other field alone.
    /// Returns false when the input was ignored.
    pub fn apply(self, profile: &mut ExtractedProfile, input: &str) -> bool {
        match self {
            Self::LifeAreas => profile.life_areas = split_life_areas(input),
            Self::Direction => profile.direction = input.to_string(),
            Self::Values => profile.values = input.to_string(),
            Self::Blockers => profile.blockers = input.to_string(),
            Self::WeeklyHours => match leading_integer(input) {
                Some(hours) => profile.weekly_hours = hours,
                None => return false,
            },
        }
        true
    }
}

pub fn split_life_areas(input: &str) -> Vec<String> {
    input
        .split(LIFE_AREA_SEPARATOR)
        .map(str::trim)
        .filter(|area| !area.is_empty())
        .map(String::from)
        .collect()
}

/// Leading run of digits after optional whitespace, e.g. "6 hours" -> 6.
fn leading_integer(input: &str) -> Option<u32> {
    let trimmed = input.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}
