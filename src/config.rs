use crate::meeting::{DEFAULT_REASON, DEFAULT_TEMPLATE};
use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};

/// Environment variables override file values, e.g. `RELAY__WORKSPACE__TOKEN`
pub const ENV_PREFIX: &str = "RELAY";
pub const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub workspace: WorkspaceConfig,
    pub notifier: NotifierConfig,
    pub formatting: FormattingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "meeting-relay".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    /// Timeout applied to every outbound API call
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 30,
        }
    }
}

/// Document workspace (Notion API) settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub api_base: String,
    pub api_version: String,
    pub token: String,
    /// Database holding one record per lead
    pub database_id: String,
    pub email_property: String,
    pub status_property: String,
    /// Status written once the meeting has been recorded
    pub status_name: String,
    pub transcript_property: String,
    pub summary_property: String,
    /// Formula/text property holding the server-computed parent page id
    pub container_property: Option<String>,
    /// Also write the summary as a child page
    pub create_document: bool,
    /// Maximum characters per rich-text segment
    pub chunk_size: usize,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.notion.com/v1".to_string(),
            api_version: "2022-06-28".to_string(),
            token: String::new(),
            database_id: String::new(),
            email_property: "Email".to_string(),
            status_property: "Status".to_string(),
            status_name: "Reunião Realizada".to_string(),
            transcript_property: "Transcrição".to_string(),
            summary_property: "Resumo Completo".to_string(),
            container_property: None,
            create_document: true,
            chunk_size: 2000,
        }
    }
}

/// Messaging API (Z-API) settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub api_base: String,
    pub instance: String,
    pub token: String,
    pub client_token: String,
    /// Comma-separated destination phone numbers
    pub admin_phones: String,
    pub reason: String,
    pub template: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.z-api.io".to_string(),
            instance: String::new(),
            token: String::new(),
            client_token: String::new(),
            admin_phones: String::new(),
            reason: DEFAULT_REASON.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl NotifierConfig {
    /// Administrator destinations in configured order
    pub fn admins(&self) -> Vec<String> {
        self.admin_phones
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn deserialize_tz<'de, D>(deserializer: D) -> std::result::Result<Tz, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.trim()
        .parse::<Tz>()
        .map_err(|e| serde::de::Error::custom(format!("invalid time zone {:?}: {}", name, e)))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    /// IANA zone used for every rendered time
    #[serde(deserialize_with = "deserialize_tz")]
    pub timezone: Tz,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Sao_Paulo,
        }
    }
}

impl Config {
    /// Load from an optional config file plus `RELAY__*` environment variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?;

        let cfg: Config = settings
            .try_deserialize()
            .context("Failed to parse configuration")?;
        cfg.validate()?;

        Ok(cfg)
    }

    /// Parse a TOML document without touching the environment
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()?;

        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workspace.token.trim().is_empty() {
            bail!("workspace.token is required");
        }
        if self.workspace.database_id.trim().is_empty() {
            bail!("workspace.database_id is required");
        }
        if self.workspace.chunk_size == 0 {
            bail!("workspace.chunk_size must be greater than zero");
        }
        if !self.notifier.admins().is_empty()
            && (self.notifier.instance.trim().is_empty() || self.notifier.token.trim().is_empty())
        {
            bail!("notifier.instance and notifier.token are required when admin_phones is set");
        }
        Ok(())
    }
}
