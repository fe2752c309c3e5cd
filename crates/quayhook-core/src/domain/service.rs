use regex::Regex;

use super::error::{
    DomainError,
    DomainResult,
};

/// One deployable unit. The `conditions` pattern both gates the rule and
/// supplies the capture groups its templates may reference.
#[derive(Debug, Clone)]
pub struct ServiceRule {
    name: String,
    repository: String,
    conditions: Regex,
    command_template: String,
    result_message_template: Option<String>,
}

impl ServiceRule {
    pub fn new(
        name: impl Into<String>, repository: impl Into<String>, conditions: &str,
        command_template: impl Into<String>, result_message_template: Option<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let conditions = Regex::new(conditions).map_err(|source| DomainError::InvalidPattern {
            service: name.clone(),
            source,
        })?;

        Ok(Self {
            name,
            repository: repository.into(),
            conditions,
            command_template: command_template.into(),
            result_message_template: result_message_template.filter(|t| !t.is_empty()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn conditions(&self) -> &Regex {
        &self.conditions
    }

    pub fn command_template(&self) -> &str {
        &self.command_template
    }

    pub fn result_message_template(&self) -> Option<&str> {
        self.result_message_template.as_deref()
    }
}
