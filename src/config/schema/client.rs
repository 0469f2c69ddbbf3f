use serde::{Deserialize, Serialize};

/// Goal composer timing and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Quiet period before grading fires (default: 800)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Minimum trimmed goal length that gets graded (default: 5)
    #[serde(default = "default_min_goal_chars")]
    pub min_goal_chars: usize,
}

fn default_debounce_ms() -> u64 {
    800
}

fn default_min_goal_chars() -> usize {
    5
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_goal_chars: default_min_goal_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingConfig {
    /// Pause between the closing message and the summary (default: 1500)
    #[serde(default = "default_closing_pause_ms")]
    pub closing_pause_ms: u64,
}

fn default_closing_pause_ms() -> u64 {
    1500
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            closing_pause_ms: default_closing_pause_ms(),
        }
    }
}
