pub mod config;
pub mod dispatch;
pub mod domain;
pub mod logging;
pub mod notify;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

pub use config::{
    ConfigLoader,
    QuayhookConfig,
    ValidationResult,
};
pub use dispatch::{
    DispatchPolicy,
    Dispatcher,
    Executor,
};
pub use domain::{
    DeploymentOutcome,
    DomainError,
    DomainResult,
    IncomingEvent,
    QuayPayload,
    ServiceRule,
};
pub use notify::{
    MemoryNotifier,
    NoOpNotifier,
    Notifier,
    SlackNotifier,
};

/// Everything the HTTP boundary needs, assembled once from a validated
/// configuration.
pub struct CoreContext {
    pub config: Arc<QuayhookConfig>,

    pub notifier: Arc<dyn Notifier>,

    pub dispatcher: Dispatcher,
}

impl CoreContext {
    pub fn new(config: QuayhookConfig) -> anyhow::Result<Self> {
        let notifier: Arc<dyn Notifier> = match &config.slack {
            Some(slack) => {
                tracing::info!(
                    channel = slack.channel.as_deref().unwrap_or("<webhook default>"),
                    "Slack notifications enabled"
                );
                Arc::new(SlackNotifier::new(slack.clone())?)
            }
            None => {
                tracing::info!("No [slack] table configured - notifications disabled");
                Arc::new(NoOpNotifier)
            }
        };

        Self::with_notifier(config, notifier)
    }

    pub fn with_notifier(
        config: QuayhookConfig, notifier: Arc<dyn Notifier>,
    ) -> anyhow::Result<Self> {
        let rules = config.build_rules()?;
        let executor = Executor::with_shell(config.dispatch.shell.clone());
        let policy = config.dispatch.policy();

        tracing::info!(
            services = rules.len(),
            serialize_per_service = policy.serialize_per_service,
            max_concurrent_dispatches = ?policy.max_concurrent_dispatches,
            "Dispatcher ready"
        );

        let dispatcher = Dispatcher::new(rules, executor, Arc::clone(&notifier), policy);

        Ok(Self {
            config: Arc::new(config),
            notifier,
            dispatcher,
        })
    }
}
