//! Environment - request context, clock, identity generation and configuration.

mod clock;
mod config;
mod context;
mod identity;

pub use clock::now;
pub use config::{DeploymentMode, EngineConfig, DATABASE_VAR, MODE_VAR, URI_VAR};
pub use context::{CancelToken, Context};
pub use identity::{IdentityGenerator, RandomIdentity, SequentialIdentity, TOKEN_LENGTH};
