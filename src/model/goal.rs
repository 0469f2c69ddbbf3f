use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Evidence a user commits to posting for a goal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProofType {
    Photo,
    Video,
    Screenshot,
    Text,
    Voice,
}

impl ProofType {
    pub const ALL: [Self; 5] = [
        Self::Photo,
        Self::Video,
        Self::Screenshot,
        Self::Text,
        Self::Voice,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Photo => "📷 Photo",
            Self::Video => "📹 Video",
            Self::Screenshot => "📸 Screenshot",
            Self::Text => "📝 Text",
            Self::Voice => "🎤 Voice",
        }
    }

    pub fn parse_lenient(raw: &str) -> Option<Self> {
        Self::from_str(raw.trim().to_ascii_lowercase().as_str()).ok()
    }
}

/// Profile context attached to grading requests so the model can judge
/// relevance against what the user said during onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileContext {
    pub life_areas: Vec<String>,
    pub direction: String,
    pub values: String,
}

// ── smart-grade ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartGradeRequest {
    #[serde(default)]
    pub goal_text: String,
    #[serde(default)]
    pub proof_types: Vec<ProofType>,
    #[serde(default)]
    pub proof_description: String,
    #[serde(default)]
    pub user_profile: Option<UserProfileContext>,
    #[serde(default)]
    pub parsed_frequency: Option<String>,
}

/// The five SMART dimensions, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SmartDimension {
    Specific,
    Measurable,
    Achievable,
    Relevant,
    TimeBound,
}

impl SmartDimension {
    pub const ALL: [Self; 5] = [
        Self::Specific,
        Self::Measurable,
        Self::Achievable,
        Self::Relevant,
        Self::TimeBound,
    ];

    pub fn letter(self) -> char {
        match self {
            Self::Specific => 'S',
            Self::Measurable => 'M',
            Self::Achievable => 'A',
            Self::Relevant => 'R',
            Self::TimeBound => 'T',
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Specific => "Specific",
            Self::Measurable => "Measurable",
            Self::Achievable => "Achievable",
            Self::Relevant => "Relevant",
            Self::TimeBound => "Time-bound",
        }
    }
}

/// Per-dimension scores. Dimensions the model omitted read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartScores {
    pub specific: u8,
    pub measurable: u8,
    pub achievable: u8,
    pub relevant: u8,
    pub time_bound: u8,
}

impl SmartScores {
    pub fn get(&self, dimension: SmartDimension) -> u8 {
        match dimension {
            SmartDimension::Specific => self.specific,
            SmartDimension::Measurable => self.measurable,
            SmartDimension::Achievable => self.achievable,
            SmartDimension::Relevant => self.relevant,
            SmartDimension::TimeBound => self.time_bound,
        }
    }
}

/// Per-dimension improvement tips; `None` when the dimension is already fine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartTips {
    pub specific: Option<String>,
    pub measurable: Option<String>,
    pub achievable: Option<String>,
    pub relevant: Option<String>,
    pub time_bound: Option<String>,
}

impl SmartTips {
    pub fn get(&self, dimension: SmartDimension) -> Option<&str> {
        match dimension {
            SmartDimension::Specific => self.specific.as_deref(),
            SmartDimension::Measurable => self.measurable.as_deref(),
            SmartDimension::Achievable => self.achievable.as_deref(),
            SmartDimension::Relevant => self.relevant.as_deref(),
            SmartDimension::TimeBound => self.time_bound.as_deref(),
        }
    }
}

/// Dimension scores at or above this are considered acceptable.
pub const ACCEPTABLE_DIMENSION_SCORE: u8 = 80;
const FAIR_SCORE: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn of(score: u8) -> Self {
        if score >= ACCEPTABLE_DIMENSION_SCORE {
            Self::Strong
        } else if score >= FAIR_SCORE {
            Self::Fair
        } else {
            Self::Weak
        }
    }
}

/// Multi-dimensional goal quality assessment.
///
/// The overall score is weighted by the model; nothing here recomputes it
/// from the dimension scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartGradeResult {
    pub score: u8,
    #[serde(default)]
    pub scores: SmartScores,
    #[serde(default)]
    pub tips: SmartTips,
}

impl SmartGradeResult {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::of(self.score)
    }

    /// Tips worth showing: present, and attached to a dimension that has not
    /// reached the acceptable score yet.
    pub fn visible_tips(&self) -> Vec<(SmartDimension, &str)> {
        SmartDimension::ALL
            .into_iter()
            .filter(|dim| self.scores.get(*dim) < ACCEPTABLE_DIMENSION_SCORE)
            .filter_map(|dim| self.tips.get(dim).map(|tip| (dim, tip)))
            .collect()
    }
}

// ── goal-parse ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalParseRequest {
    #[serde(default)]
    pub goal_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FrequencyUnit {
    Day,
    Week,
    Month,
}

/// Frequency and duration hints extracted from free goal text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalParseResult {
    pub frequency_count: Option<u32>,
    pub frequency_unit: Option<FrequencyUnit>,
    pub duration_value: Option<String>,
    pub human_readable: Option<String>,
}

impl GoalParseResult {
    /// The human readable frequency, if the model produced a non-blank one.
    pub fn readable_frequency(&self) -> Option<&str> {
        self.human_readable
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

// ── reality-check ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealityCheckRequest {
    pub goal_text: String,
    #[serde(default)]
    pub proof_types: Vec<ProofType>,
    #[serde(default)]
    pub parsed_frequency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealityCheckResult {
    pub likelihood: u8,
    #[serde(default)]
    pub pitfalls: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}
