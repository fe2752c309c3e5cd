pub mod error;
pub mod event;
pub mod outcome;
pub mod service;

pub use error::{
    DomainError,
    DomainResult,
};
pub use event::{
    IncomingEvent,
    QuayPayload,
};
pub use outcome::DeploymentOutcome;
pub use service::ServiceRule;
