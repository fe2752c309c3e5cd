//! Match-and-expand dispatch engine.
//!
//! An incoming build event is matched against the configured service rules;
//! each matching rule has its command expanded from the rule's conditions
//! pattern, executed under a shell, and the outcome reported to a notifier.

pub mod executor;
pub mod expand;
pub mod matcher;
pub mod orchestrator;

pub use executor::{
    CommandRunner,
    ExecError,
    Executor,
    ShellRunner,
    DEFAULT_SHELL,
};
pub use expand::expand;
pub use matcher::{
    match_rules,
    rule_matches,
};
pub use orchestrator::{
    DispatchPolicy,
    Dispatcher,
};
