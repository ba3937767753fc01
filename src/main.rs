use clap::Parser;

use just_begin::config::{Config, OpenAiConfig, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use just_begin::error::Result;

#[derive(Parser, Debug)]
#[command(name = "just-begin")]
#[command(about = "Business plan generator web server")]
struct Cli {
    #[arg(long, env = "JUST_BEGIN_HOST", default_value = DEFAULT_HOST)]
    host: String,

    #[arg(long, env = "JUST_BEGIN_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "JUST_BEGIN_MODEL")]
    model: Option<String>,

    #[arg(long, env = "JUST_BEGIN_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            server: ServerConfig {
                host: self.host,
                port: self.port,
            },
            openai: OpenAiConfig {
                api_key: self.api_key,
                model: self.model,
                base_url: self.base_url,
                timeout_secs: self.timeout_secs,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Ignoring unreadable .env file: {err}");
        }
    }
    just_begin::logging::init_tracing("just_begin");

    let config = Cli::parse().into_config();
    just_begin::server::run(config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_config() {
        let cli = Cli::try_parse_from([
            "just-begin",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--api-key",
            "sk-test",
            "--model",
            "gpt-4o-mini",
        ])
        .unwrap();
        let config = cli.into_config();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.api_key(), Some("sk-test"));
        assert_eq!(config.model(), "gpt-4o-mini");
    }
}
