use std::fmt;

/// Result of running one service's deployment command. Only the text is ever
/// handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentOutcome {
    Succeeded(String),
    Failed(String),
}

impl DeploymentOutcome {
    pub fn message(&self) -> &str {
        match self {
            Self::Succeeded(message) | Self::Failed(message) => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

impl fmt::Display for DeploymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
