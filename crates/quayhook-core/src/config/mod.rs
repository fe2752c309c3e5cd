pub mod interpolation;
pub mod loader;
pub mod schema;
pub mod validation;

pub use interpolation::{
    interpolate,
    InterpolationError,
};
pub use loader::{
    ConfigLoadError,
    ConfigLoader,
};
pub use schema::{
    DispatchConfig,
    QuayhookConfig,
    ServerConfig,
    ServiceConfig,
    SlackConfig,
    WEBHOOK_PATH_PLACEHOLDER,
};
pub use validation::{
    ConfigError,
    ConfigErrorCode,
    ConfigWarning,
    ConfigWarningCode,
    ValidationResult,
};
