use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
}

impl Config {
    /// The credential, if one was supplied and is not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.openai
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn model(&self) -> &str {
        non_blank(self.openai.model.as_deref()).unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        non_blank(self.openai.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_key_counts_as_missing() {
        let config: Config = serde_json::from_value(json!({
            "openai": {"api_key": "   "}
        }))
        .unwrap();
        assert_eq!(config.api_key(), None);
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn explicit_values_win() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            openai: OpenAiConfig {
                api_key: Some(" sk-test ".to_string()),
                model: Some("gpt-4o-mini".to_string()),
                base_url: Some("http://localhost:11434/v1/".to_string()),
                timeout_secs: Some(5),
            },
        };
        assert_eq!(config.api_key(), Some("sk-test"));
        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(config.base_url(), "http://localhost:11434/v1");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }
}
