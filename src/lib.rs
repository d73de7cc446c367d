pub mod cli;
pub mod error;
pub mod fixtures;
pub mod github_provider;
pub mod migration;
pub mod provider;
pub mod reconcile;
pub mod render;
pub mod resolver;
pub mod rule_suite;
pub mod ruleset;
pub mod scope;
pub mod translator;

pub use error::{Error, Result};
