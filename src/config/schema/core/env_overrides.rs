use super::Config;

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| std::env::var(key).ok().filter(|value| !value.is_empty()))
}

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = first_env(&["PROVA_BACKEND_URL", "EXPO_PUBLIC_SUPABASE_URL"]) {
            self.backend.url = Some(url);
        }

        if let Some(key) = first_env(&[
            "PROVA_BACKEND_ANON_KEY",
            "EXPO_PUBLIC_SUPABASE_PUBLISHABLE_KEY",
        ]) {
            self.backend.anon_key = Some(key);
        }

        if let Ok(token) = std::env::var("PROVA_ACCESS_TOKEN")
            && !token.is_empty()
        {
            self.backend.access_token = Some(token);
        }

        if let Some(key) = first_env(&["AI_SDK_GEMINI_KEY", "GEMINI_API_KEY"]) {
            self.functions.gemini_api_key = Some(key);
        }

        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY")
            && !key.is_empty()
        {
            self.functions.anthropic_api_key = Some(key);
        }

        if let Some(port_str) = first_env(&["PROVA_GATEWAY_PORT", "PORT"])
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Some(host) = first_env(&["PROVA_GATEWAY_HOST", "HOST"]) {
            self.gateway.host = host;
        }

        if let Ok(level) = std::env::var("PROVA_LOG_LEVEL")
            && !level.is_empty()
        {
            self.observability.log_level = level;
        }
    }
}
