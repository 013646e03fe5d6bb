use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://cundibotapi-chat.onrender.com";
pub const DEFAULT_ADMIN_BASE: &str = "https://cundibotapi-admin.onrender.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the answering service (`{api_base}/chat`).
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Base URL of the admin API (`{admin_base}/admin/...`).
    #[serde(default = "default_admin_base")]
    pub admin_base: String,
    #[serde(default)]
    pub admin_api_key: Option<String>,
    #[serde(default)]
    pub http_proxy: String,
    #[serde(default)]
    pub https_proxy: String,
    #[serde(default)]
    pub http_proxy_auth: Option<ProxyAuth>,
    #[serde(default)]
    pub https_proxy_auth: Option<ProxyAuth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

const CONFIG_FILE_PATH: &str = "config.toml";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_admin_base() -> String {
    DEFAULT_ADMIN_BASE.to_string()
}

/// Drops trailing slashes so `format!("{base}/chat")` never doubles them.
pub fn normalize_base_url(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            admin_base: default_admin_base(),
            admin_api_key: None,
            http_proxy: String::new(),
            https_proxy: String::new(),
            http_proxy_auth: None,
            https_proxy_auth: None,
        }
    }
}

impl Config {
    /// Loads `config.toml` from the working directory when present, then
    /// applies environment overrides.
    pub fn load() -> Self {
        let mut config = Config::default();

        if std::path::Path::new(CONFIG_FILE_PATH).exists() {
            match std::fs::read_to_string(CONFIG_FILE_PATH) {
                Ok(content) => match Self::from_toml_str(&content) {
                    Ok(file_config) => config = file_config,
                    Err(e) => log::warn!("Ignoring malformed {}: {}", CONFIG_FILE_PATH, e),
                },
                Err(e) => log::warn!("Failed to read {}: {}", CONFIG_FILE_PATH, e),
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Config>(content)
    }

    /// Environment lookups go through `lookup` so tests do not touch the
    /// process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_base) = lookup("CUNDIBOT_API_BASE") {
            self.api_base = api_base;
        }
        if let Some(admin_base) = lookup("CUNDIBOT_ADMIN_BASE") {
            self.admin_base = admin_base;
        }
        if let Some(key) = lookup("CUNDIBOT_ADMIN_KEY") {
            let key = key.trim().to_string();
            self.admin_api_key = (!key.is_empty()).then_some(key);
        }
        if let Some(http_proxy) = lookup("HTTP_PROXY") {
            self.http_proxy = http_proxy;
        }
        if let Some(https_proxy) = lookup("HTTPS_PROXY") {
            self.https_proxy = https_proxy;
        }
        self.api_base = normalize_base_url(&self.api_base);
        self.admin_base = normalize_base_url(&self.admin_base);
    }

    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.api_base)
    }
}
