//! Models and setup shared by the lifecycle tests.

use bark_rust::{Context, DeploymentMode, Engine, EngineConfig, InMemoryDriver, Meta, Model};
use serde::{Deserialize, Serialize};

pub const FIXED_NOW: &str = "2024-03-27T19:55:38.782Z";

#[derive(Clone, Debug, Default, Serialize, Deserialize, Model)]
#[model(collection = "dogs")]
pub struct Dog {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    #[serde(default)]
    pub age: u32,
}

impl Dog {
    pub fn named(name: &str) -> Self {
        Dog {
            meta: Meta::new("dogs"),
            name: name.to_string(),
            age: 0,
        }
    }
}

/// A model whose metadata lives in a field not called `meta`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Model)]
pub struct ChewToy {
    #[serde(flatten)]
    #[model(meta)]
    pub info: Meta,
    pub squeaks: bool,
}

pub struct Setup {
    pub driver: InMemoryDriver,
    pub engine: Engine,
    pub ctx: Context,
}

/// Test-mode engine over a fresh in-memory store with a fixed clock.
pub fn setup(database: &str) -> Setup {
    let driver = InMemoryDriver::new();
    let config = EngineConfig::new("memory://local").with_mode(DeploymentMode::Test);
    let engine = Engine::new(driver.clone(), config);
    let ctx = Context::new().with_database(database).with_now(FIXED_NOW);
    Setup {
        driver,
        engine,
        ctx,
    }
}
