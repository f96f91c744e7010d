use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use booklog_auth::{AuthConfig, Member};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Token issuance and signing configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Members registered at startup in the in-memory identity store
    #[serde(default)]
    pub members: Vec<SeedMember>,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }

        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }

        self.auth.validate().map_err(|e| format!("auth: {e}"))?;

        let mut seen = std::collections::HashSet::new();
        for member in &self.members {
            if !seen.insert(member.idx) {
                return Err(format!("members: duplicate idx {}", member.idx));
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    /// Mounts `POST /dev/token/{idx}`, which issues a pair to any member
    /// without credentials. Login is handled by another service, so this is
    /// the only way to get a first pair from this binary alone.
    #[serde(default)]
    pub dev_issue_route: bool,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_body_limit() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
            dev_issue_route: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// A member entry in the config file.
///
/// ```toml
/// [[members]]
/// idx = 42
/// name = "Alice"
/// profile_img = "https://img.example.com/alice.png"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedMember {
    pub idx: i64,
    pub name: String,
    #[serde(default)]
    pub profile_img: String,
}

impl From<&SeedMember> for Member {
    fn from(seed: &SeedMember) -> Self {
        Member::new(seed.idx, seed.name.clone(), seed.profile_img.clone())
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub const DEFAULT_CONFIG_PATH: &str = "booklog.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_PATH));

        let mut builder = Config::builder();
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., BOOKLOG__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("BOOKLOG")
                .try_parsing(true)
                .separator("__"),
        );

        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
