// Lets `#[derive(Model)]` expand to `bark_rust::...` paths inside this crate too.
extern crate self as bark_rust;

mod collection;
pub mod driver;
mod engine;
mod env;
mod error;
mod model;
mod registry;
mod result;

pub use collection::Collection;
pub use driver::{
    CollectionHandle, Condition, DatabaseHandle, DeleteOutcome, Filter, FindOptions,
    InMemoryDriver, RawDocument, SortOrder, StoreDriver, UpdateOutcome, UpdateSpec,
};
pub use engine::Engine;
pub use env::{
    now, CancelToken, Context, DeploymentMode, EngineConfig, IdentityGenerator, RandomIdentity,
    SequentialIdentity, DATABASE_VAR, MODE_VAR, TOKEN_LENGTH, URI_VAR,
};
pub use error::DocumentError;
pub use model::{Meta, Model};
pub use registry::HandleRegistry;
pub use result::WriteResult;

// Re-export the derive macro; it shares the trait's name like serde's derives.
pub use bark_rust_macros::Model;
