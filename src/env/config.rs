//! EngineConfig - connection settings and deployment mode.

use std::env;

pub const URI_VAR: &str = "STORE_URI";
pub const DATABASE_VAR: &str = "STORE_DB";
pub const MODE_VAR: &str = "ENV";

/// Selects how identities are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentMode {
    #[default]
    Production,
    /// Sequential identities for deterministic fixtures.
    Test,
}

impl DeploymentMode {
    pub fn parse(value: &str) -> Self {
        if value == "test" {
            DeploymentMode::Test
        } else {
            DeploymentMode::Production
        }
    }

    pub fn is_test(self) -> bool {
        self == DeploymentMode::Test
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Store endpoint URI handed to the driver on connect.
    pub uri: String,
    /// Database used by `Engine::connect_default`.
    pub default_database: String,
    pub mode: DeploymentMode,
}

impl EngineConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Read `STORE_URI`, `STORE_DB` and `ENV` from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    /// Build from explicit key/value pairs; unknown keys are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            match key.as_ref() {
                URI_VAR => config.uri = value.into(),
                DATABASE_VAR => config.default_database = value.into(),
                MODE_VAR => config.mode = DeploymentMode::parse(&value.into()),
                _ => {}
            }
        }
        config
    }

    pub fn with_default_database(mut self, database: impl Into<String>) -> Self {
        self.default_database = database.into();
        self
    }

    pub fn with_mode(mut self, mode: DeploymentMode) -> Self {
        self.mode = mode;
        self
    }
}
