pub mod memory_provider;
pub mod rulesets;
