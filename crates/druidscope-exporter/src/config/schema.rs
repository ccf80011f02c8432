use serde::Deserialize;

use druidscope_core::error::{DruidScopeError, Result};
use druidscope_core::registry::Daemon;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,

    /// Daemon roles to accept datapoints from.
    #[serde(default = "default_daemons")]
    pub daemons: Vec<String>,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(DruidScopeError::BadConfig(
                "version must be 1".into(),
            ));
        }
        if self.daemons.is_empty() {
            return Err(DruidScopeError::BadConfig(
                "daemons must not be empty".into(),
            ));
        }
        for role in &self.daemons {
            if Daemon::from_role(role).is_none() {
                return Err(DruidScopeError::BadConfig(format!(
                    "unknown daemon role: {role}"
                )));
            }
        }
        self.exporter.validate()?;
        Ok(())
    }

    /// Parsed daemon set; relies on `validate` having passed.
    pub fn enabled_daemons(&self) -> Vec<Daemon> {
        self.daemons
            .iter()
            .filter_map(|role| Daemon::from_role(role))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(DruidScopeError::BadConfig(
                "exporter.listen must be a valid socket address".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

fn default_daemons() -> Vec<String> {
    vec![
        "coordinator".into(),
        "historical".into(),
        "broker".into(),
    ]
}
