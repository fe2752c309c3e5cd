use std::net::SocketAddr;

use serde::{
    Deserialize,
    Serialize,
};

use crate::dispatch::{
    DispatchPolicy,
    DEFAULT_SHELL,
};
use crate::domain::{
    DomainResult,
    ServiceRule,
};

/// Value shipped in the example configuration; refusing it forces operators
/// to pick their own secret path.
pub const WEBHOOK_PATH_PLACEHOLDER: &str = "CHANGE_ME__DO_NOT_ACTUALLY_USE_THIS_VALUE__SEE_README";

pub(super) const DEFAULT_BIND_ADDR: &str = "0.0.0.0:2000";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuayhookConfig {
    #[serde(default)]
    pub webhook_path: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack: Option<SlackConfig>,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

impl QuayhookConfig {
    /// Request target the webhook must be posted to, e.g. `/s3cr3t`.
    pub fn webhook_route(&self) -> String {
        format!("/{}", self.webhook_path.trim_start_matches('/'))
    }

    pub fn build_rules(&self) -> DomainResult<Vec<ServiceRule>> {
        self.services.iter().map(ServiceConfig::to_rule).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr.parse()
    }

    /// Applies a `PORT` style override, keeping the configured host.
    pub fn socket_addr_with_port(
        &self, port: Option<&str>,
    ) -> Result<SocketAddr, std::net::AddrParseError> {
        let mut addr = self.socket_addr()?;
        if let Some(port) = port.and_then(|p| p.trim().parse::<u16>().ok()) {
            addr.set_port(port);
        }
        Ok(addr)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SlackConfig {
    #[serde(default)]
    pub webhook_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_shell")]
    pub shell: String,

    #[serde(default)]
    pub serialize_per_service: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_dispatches: Option<usize>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            serialize_per_service: false,
            max_concurrent_dispatches: None,
        }
    }
}

fn default_shell() -> String {
    DEFAULT_SHELL.to_string()
}

impl DispatchConfig {
    pub fn policy(&self) -> DispatchPolicy {
        DispatchPolicy {
            serialize_per_service: self.serialize_per_service,
            max_concurrent_dispatches: self.max_concurrent_dispatches,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub repository: String,

    #[serde(default)]
    pub conditions: String,

    #[serde(default)]
    pub cmd: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub deploy_message: String,
}

impl ServiceConfig {
    pub fn to_rule(&self) -> DomainResult<ServiceRule> {
        ServiceRule::new(
            self.name.clone(),
            self.repository.clone(),
            &self.conditions,
            self.cmd.clone(),
            Some(self.deploy_message.clone()),
        )
    }
}
