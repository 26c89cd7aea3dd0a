use anyhow::{bail, Context, Result};
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

const DEFAULT_PORT: u16 = 10000;
const DEFAULT_GRAPH_API_VERSION: &str = "v19.0";
const DEFAULT_LANGUAGE: &str = "English";
const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub whatsapp: WhatsAppConfig,
    pub ai: AiConfig,
}
impl AppConfig {
    /// Reads the full configuration from the environment, once at startup.
    /// Components receive their section instead of reading env vars ad hoc.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http: HttpConfig::from_env()?,
            whatsapp: WhatsAppConfig::from_env()?,
            ai: AiConfig::from_env()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub port: u16,
}
impl HttpConfig {
    fn from_env() -> Result<Self> {
        let port = match optional_var("PORT") {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {value}"))?,
            None => DEFAULT_PORT,
        };
        Ok(Self { port })
    }

    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub access_token: String,
    pub phone_number_id: String,
    pub verify_token: String,
    pub graph_api_version: String,
}
impl WhatsAppConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            access_token: required_var("WHATSAPP_TOKEN")?,
            phone_number_id: required_var("PHONE_NUMBER_ID")?,
            verify_token: required_var("VERIFY_TOKEN")?,
            graph_api_version: optional_var("GRAPH_API_VERSION")
                .unwrap_or_else(|| DEFAULT_GRAPH_API_VERSION.to_string()),
        })
    }

    pub fn messages_url(&self) -> String {
        format!(
            "https://graph.facebook.com/{}/{}/messages",
            self.graph_api_version, self.phone_number_id
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiBackend {
    Gemini,
    Groq,
}
impl AiBackend {
    pub fn name(&self) -> &'static str {
        match self {
            AiBackend::Gemini => "gemini",
            AiBackend::Groq => "groq",
        }
    }
}
impl FromStr for AiBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "gemini" => Ok(AiBackend::Gemini),
            "groq" => Ok(AiBackend::Groq),
            other => bail!("Unknown AI_PROVIDER: {other} (expected gemini or groq)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub backend: AiBackend,
    pub api_key: String,
    pub model: String,
    pub language: String,
}
impl AiConfig {
    fn from_env() -> Result<Self> {
        let backend = match optional_var("AI_PROVIDER") {
            Some(value) => value.parse()?,
            None => AiBackend::Gemini,
        };

        let (key_var, model_var, default_model) = match backend {
            AiBackend::Gemini => ("GEMINI_API_KEY", "GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            AiBackend::Groq => ("GROQ_API_KEY", "GROQ_MODEL", DEFAULT_GROQ_MODEL),
        };

        Ok(Self {
            backend,
            api_key: required_var(key_var)?,
            model: optional_var(model_var).unwrap_or_else(|| default_model.to_string()),
            language: optional_var("BOT_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("Missing required environment variable: {name}"))
}

/// Unset and empty are both treated as absent.
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
