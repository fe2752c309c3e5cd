use std::collections::HashSet;
use std::path::Path;

use super::schema::{
    DispatchConfig,
    QuayhookConfig,
    ServiceConfig,
    SlackConfig,
    WEBHOOK_PATH_PLACEHOLDER,
};

/// Shells known to accept `-c` and the `exec 2>&1` prelude used to merge
/// command output.
const POSIX_SHELLS: &[&str] = &["sh", "bash", "dash", "ash", "ksh", "mksh", "zsh", "busybox"];

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<ConfigWarning>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(
        &mut self, field: impl Into<String>, message: impl Into<String>, code: ConfigErrorCode,
    ) {
        self.errors.push(ConfigError {
            field: field.into(),
            message: message.into(),
            code,
        });
    }

    pub fn add_warning(
        &mut self, field: impl Into<String>, message: impl Into<String>, code: ConfigWarningCode,
    ) {
        self.warnings.push(ConfigWarning {
            field: field.into(),
            message: message.into(),
            code,
        });
    }

    pub fn summary(&self) -> String {
        if self.errors.is_empty() && self.warnings.is_empty() {
            "Configuration is valid".to_string()
        } else {
            format!(
                "{} error(s), {} warning(s)",
                self.errors.len(),
                self.warnings.len()
            )
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigError {
    pub field: String,
    pub message: String,
    pub code: ConfigErrorCode,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    MissingRequired,
    PlaceholderValue,
    InvalidValue,
    InvalidPattern,
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired => write!(f, "MISSING_REQUIRED"),
            Self::PlaceholderValue => write!(f, "PLACEHOLDER_VALUE"),
            Self::InvalidValue => write!(f, "INVALID_VALUE"),
            Self::InvalidPattern => write!(f, "INVALID_PATTERN"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub code: ConfigWarningCode,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigWarningCode {
    NoServices,
    DuplicateName,
    NeverMatches,
    NonPosixShell,
}

impl std::fmt::Display for ConfigWarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoServices => write!(f, "NO_SERVICES"),
            Self::DuplicateName => write!(f, "DUPLICATE_NAME"),
            Self::NeverMatches => write!(f, "NEVER_MATCHES"),
            Self::NonPosixShell => write!(f, "NON_POSIX_SHELL"),
        }
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &QuayhookConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        Self::validate_webhook_path(&config.webhook_path, &mut result);

        if config.server.socket_addr().is_err() {
            result.add_error(
                "server.bind_addr",
                format!("'{}' is not a valid socket address", config.server.bind_addr),
                ConfigErrorCode::InvalidValue,
            );
        }

        if let Some(slack) = &config.slack {
            Self::validate_slack(slack, &mut result);
        }

        Self::validate_dispatch(&config.dispatch, &mut result);
        Self::validate_services(&config.services, &mut result);

        result
    }

    fn validate_webhook_path(path: &str, result: &mut ValidationResult) {
        if path.trim_start_matches('/').is_empty() {
            result.add_error(
                "webhook_path",
                "( required ) webhook_path is missing from config",
                ConfigErrorCode::MissingRequired,
            );
        } else if path.trim_start_matches('/') == WEBHOOK_PATH_PLACEHOLDER {
            result.add_error(
                "webhook_path",
                "( required ) webhook_path has not been updated from the example",
                ConfigErrorCode::PlaceholderValue,
            );
        }
    }

    fn validate_slack(slack: &SlackConfig, result: &mut ValidationResult) {
        if slack.webhook_url.is_empty() {
            result.add_error(
                "slack.webhook_url",
                "Slack webhook URL is required when a [slack] table is present",
                ConfigErrorCode::MissingRequired,
            );
        }
    }

    fn validate_dispatch(dispatch: &DispatchConfig, result: &mut ValidationResult) {
        if dispatch.shell.trim().is_empty() {
            result.add_error(
                "dispatch.shell",
                "Shell cannot be empty",
                ConfigErrorCode::InvalidValue,
            );
        } else if !is_posix_shell(&dispatch.shell) {
            result.add_warning(
                "dispatch.shell",
                format!(
                    "'{}' is not a known POSIX shell; commands run as `<shell> -c` after `exec 2>&1`",
                    dispatch.shell
                ),
                ConfigWarningCode::NonPosixShell,
            );
        }

        if dispatch.max_concurrent_dispatches == Some(0) {
            result.add_error(
                "dispatch.max_concurrent_dispatches",
                "Limit must be at least 1; omit it for no limit",
                ConfigErrorCode::InvalidValue,
            );
        }
    }

    fn validate_services(services: &[ServiceConfig], result: &mut ValidationResult) {
        if services.is_empty() {
            result.add_warning(
                "services",
                "No services configured; every webhook will be ignored",
                ConfigWarningCode::NoServices,
            );
        }

        let mut seen = HashSet::new();

        for (index, service) in services.iter().enumerate() {
            let prefix = format!("services[{}]", index);

            if service.name.is_empty() {
                result.add_error(
                    format!("{}.name", prefix),
                    "Service name is required",
                    ConfigErrorCode::MissingRequired,
                );
            } else if !seen.insert(service.name.as_str()) {
                result.add_warning(
                    format!("{}.name", prefix),
                    format!("Service name '{}' is used more than once", service.name),
                    ConfigWarningCode::DuplicateName,
                );
            }

            if service.repository.is_empty() {
                result.add_error(
                    format!("{}.repository", prefix),
                    "Repository is required",
                    ConfigErrorCode::MissingRequired,
                );
            }

            if service.cmd.is_empty() {
                result.add_error(
                    format!("{}.cmd", prefix),
                    "Command is required",
                    ConfigErrorCode::MissingRequired,
                );
            }

            if service.conditions.is_empty() {
                result.add_warning(
                    format!("{}.conditions", prefix),
                    "Empty conditions never produce a non-empty match",
                    ConfigWarningCode::NeverMatches,
                );
            } else if let Err(e) = regex::Regex::new(&service.conditions) {
                result.add_error(
                    format!("{}.conditions", prefix),
                    format!("Invalid regular expression: {}", e),
                    ConfigErrorCode::InvalidPattern,
                );
            }
        }
    }
}

impl QuayhookConfig {
    pub fn validate(&self) -> ValidationResult {
        ConfigValidator::validate(self)
    }
}

fn is_posix_shell(shell: &str) -> bool {
    Path::new(shell.trim())
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| POSIX_SHELLS.contains(&name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(name: &str, conditions: &str) -> ServiceConfig {
        ServiceConfig {
            name: name.to_string(),
            repository: "acme/web".to_string(),
            conditions: conditions.to_string(),
            cmd: "true".to_string(),
            deploy_message: String::new(),
        }
    }

    fn valid_config() -> QuayhookConfig {
        QuayhookConfig {
            webhook_path: "s3cr3t".to_string(),
            services: vec![service("web", "^refs/tags/")],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let result = valid_config().validate();
        assert!(result.is_ok());
        assert!(result.warnings.is_empty());
        assert_eq!(result.summary(), "Configuration is valid");
    }

    #[test]
    fn test_missing_webhook_path() {
        let mut config = valid_config();
        config.webhook_path = String::new();

        let result = config.validate();
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "webhook_path" && e.code == ConfigErrorCode::MissingRequired));
    }

    #[test]
    fn test_placeholder_webhook_path() {
        let mut config = valid_config();
        config.webhook_path = WEBHOOK_PATH_PLACEHOLDER.to_string();

        let result = config.validate();
        assert!(result
            .errors
            .iter()
            .any(|e| e.code == ConfigErrorCode::PlaceholderValue));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let mut config = valid_config();
        config.services.push(service("broken", "refs/(tags"));

        let result = config.validate();
        assert!(!result.is_ok());
        let error = &result.errors[0];
        assert_eq!(error.field, "services[1].conditions");
        assert_eq!(error.code, ConfigErrorCode::InvalidPattern);
    }

    #[test]
    fn test_missing_service_fields() {
        let mut config = valid_config();
        config.services.push(ServiceConfig::default());

        let result = config.validate();
        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["services[1].name", "services[1].repository", "services[1].cmd"]
        );
        assert!(result
            .warnings
            .iter()
            .any(|w| w.code == ConfigWarningCode::NeverMatches));
    }

    #[test]
    fn test_duplicate_names_only_warn() {
        let mut config = valid_config();
        config.services.push(service("web", "^refs/heads/"));

        let result = config.validate();
        assert!(result.is_ok());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.code == ConfigWarningCode::DuplicateName));
    }

    #[test]
    fn test_dispatch_and_server_settings() {
        let mut config = valid_config();
        config.server.bind_addr = "not-an-address".to_string();
        config.dispatch.max_concurrent_dispatches = Some(0);
        config.dispatch.shell = " ".to_string();
        config.slack = Some(SlackConfig::default());

        let result = config.validate();
        assert_eq!(result.errors.len(), 4);
        assert!(result.summary().contains("4 error(s)"));
    }

    #[test]
    fn test_non_posix_shell_warns() {
        let mut config = valid_config();
        config.dispatch.shell = "/usr/bin/fish".to_string();

        let result = config.validate();
        assert!(result.is_ok());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, ConfigWarningCode::NonPosixShell);
        assert_eq!(result.warnings[0].field, "dispatch.shell");

        for shell in ["/bin/sh", "/bin/bash", "dash", "/usr/local/bin/zsh"] {
            config.dispatch.shell = shell.to_string();
            assert!(config.validate().warnings.is_empty(), "{shell} should be accepted");
        }
    }

    #[test]
    fn test_no_services_warns() {
        let mut config = valid_config();
        config.services.clear();

        let result = config.validate();
        assert!(result.is_ok());
        assert_eq!(result.warnings[0].code, ConfigWarningCode::NoServices);
    }
}
