use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{
    Mutex,
    OwnedMutexGuard,
    Semaphore,
};
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::executor::Executor;
use super::matcher::match_rules;
use crate::domain::{
    IncomingEvent,
    ServiceRule,
};
use crate::notify::Notifier;

/// Knobs for how dispatch units share resources. The default reproduces the
/// unserialized, unbounded behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchPolicy {
    pub serialize_per_service: bool,
    pub max_concurrent_dispatches: Option<usize>,
}

struct DispatcherInner {
    rules: Vec<ServiceRule>,
    executor: Executor,
    notifier: Arc<dyn Notifier>,
    service_locks: Option<DashMap<String, Arc<Mutex<()>>>>,
    permits: Option<Semaphore>,
}

#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl Dispatcher {
    pub fn new(
        rules: Vec<ServiceRule>, executor: Executor, notifier: Arc<dyn Notifier>,
        policy: DispatchPolicy,
    ) -> Self {
        let service_locks = policy.serialize_per_service.then(DashMap::new);
        let permits = policy
            .max_concurrent_dispatches
            .map(|limit| Semaphore::new(limit.max(1)));

        Self {
            inner: Arc::new(DispatcherInner {
                rules,
                executor,
                notifier,
                service_locks,
                permits,
            }),
        }
    }

    pub fn rules(&self) -> &[ServiceRule] {
        &self.inner.rules
    }

    /// Evaluates `event` on its own task and returns immediately. The task
    /// resolves to the number of services that matched.
    pub fn dispatch(&self, event: IncomingEvent) -> JoinHandle<usize> {
        let dispatcher = self.clone();
        let span = tracing::info_span!(
            "dispatch",
            repository = %event.repository,
            reference = %event.reference
        );

        tokio::spawn(async move { dispatcher.run(&event).await }.instrument(span))
    }

    /// Processes every matching service in configuration order, one after
    /// another, reporting "Deploying" before and the outcome after each run.
    pub async fn run(&self, event: &IncomingEvent) -> usize {
        let _permit = match &self.inner.permits {
            Some(permits) => permits.acquire().await.ok(),
            None => None,
        };

        let mut matched = 0;
        for rule in match_rules(event, &self.inner.rules) {
            matched += 1;

            self.inner
                .notifier
                .notify(&format!("Deploying {}", rule.name()))
                .await;

            let outcome = {
                let _guard = self.lock_service(rule.name()).await;
                self.inner.executor.execute(rule, &event.reference).await
            };

            if !outcome.is_success() {
                tracing::warn!(service = rule.name(), "Continuing after failed deployment");
            }

            self.inner.notifier.notify(outcome.message()).await;
        }

        if matched == 0 {
            tracing::debug!("No service matched event");
        }

        matched
    }

    async fn lock_service(&self, name: &str) -> Option<OwnedMutexGuard<()>> {
        let locks = self.inner.service_locks.as_ref()?;
        let lock = locks.entry(name.to_string()).or_default().clone();
        Some(lock.lock_owned().await)
    }
}
