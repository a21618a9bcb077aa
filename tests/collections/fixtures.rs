//! Fixture seeding for collection query tests.

use bark_rust::{
    Collection, Context, DeploymentMode, Engine, EngineConfig, InMemoryDriver, Meta, Model,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, Model)]
#[model(collection = "dogs")]
pub struct Dog {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub owner: Option<Owner>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
}

pub struct Fixture {
    pub driver: InMemoryDriver,
    pub engine: Engine,
    pub ctx: Context,
    pub dogs: Collection<Dog>,
}

/// Seed `dogs` with one document per `(name, age)` pair, in order.
pub fn seed(database: &str, dogs: &[(&str, u32)]) -> Fixture {
    let driver = InMemoryDriver::new();
    let engine = Engine::new(
        driver.clone(),
        EngineConfig::new("memory://local").with_mode(DeploymentMode::Test),
    );
    let ctx = Context::new()
        .with_database(database)
        .with_now("2024-03-27T19:55:38.782Z");
    let collection = engine.models::<Dog>();

    for (name, age) in dogs {
        let mut dog = collection.new_model();
        dog.name = name.to_string();
        dog.age = *age;
        collection.save(&mut dog, &ctx).expect("fixture save");
    }

    Fixture {
        driver,
        engine,
        ctx,
        dogs: collection,
    }
}

pub fn names(dogs: &[Dog]) -> Vec<&str> {
    dogs.iter().map(|d| d.name.as_str()).collect()
}
