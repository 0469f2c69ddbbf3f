use serde::{Deserialize, Serialize};

const GEMINI_FLASH_LITE: &str = "gemini-2.5-flash-lite";
const CLAUDE_HAIKU: &str = "claude-haiku-4-5-20251001";

/// Which upstream model serves one function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRoute {
    /// "gemini" | "anthropic"
    pub provider: String,
    pub model: String,
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_temperature() -> f64 {
    1.0
}

impl FunctionRoute {
    fn new(provider: &str, model: &str, max_tokens: u32) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            max_tokens,
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionsConfig {
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    /// Override for the Gemini endpoint (tests, proxies).
    #[serde(default)]
    pub gemini_base_url: Option<String>,
    /// Override for the Anthropic endpoint (tests, proxies).
    #[serde(default)]
    pub anthropic_base_url: Option<String>,

    #[serde(default = "default_smart_grade")]
    pub smart_grade: FunctionRoute,
    #[serde(default = "default_goal_parse")]
    pub goal_parse: FunctionRoute,
    #[serde(default = "default_reality_check")]
    pub reality_check: FunctionRoute,
    #[serde(default = "default_onboarding_chat")]
    pub onboarding_chat: FunctionRoute,
}

fn default_smart_grade() -> FunctionRoute {
    FunctionRoute::new("anthropic", CLAUDE_HAIKU, 300)
}

fn default_goal_parse() -> FunctionRoute {
    FunctionRoute::new("gemini", GEMINI_FLASH_LITE, 1024)
}

fn default_reality_check() -> FunctionRoute {
    FunctionRoute::new("anthropic", CLAUDE_HAIKU, 400)
}

fn default_onboarding_chat() -> FunctionRoute {
    FunctionRoute::new("gemini", GEMINI_FLASH_LITE, 2048)
}

impl Default for FunctionsConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            anthropic_api_key: None,
            gemini_base_url: None,
            anthropic_base_url: None,
            smart_grade: default_smart_grade(),
            goal_parse: default_goal_parse(),
            reality_check: default_reality_check(),
            onboarding_chat: default_onboarding_chat(),
        }
    }
}

impl FunctionsConfig {
    pub fn api_key_for(&self, provider: &str) -> Option<&str> {
        match provider {
            "gemini" | "google" => self.gemini_api_key.as_deref(),
            "anthropic" | "claude" => self.anthropic_api_key.as_deref(),
            _ => None,
        }
    }

    pub fn base_url_for(&self, provider: &str) -> Option<&str> {
        match provider {
            "gemini" | "google" => self.gemini_base_url.as_deref(),
            "anthropic" | "claude" => self.anthropic_base_url.as_deref(),
            _ => None,
        }
    }

    pub fn routes(&self) -> [(&'static str, &FunctionRoute); 4] {
        [
            ("smart-grade", &self.smart_grade),
            ("goal-parse", &self.goal_parse),
            ("reality-check", &self.reality_check),
            ("onboarding-chat", &self.onboarding_chat),
        ]
    }
}
