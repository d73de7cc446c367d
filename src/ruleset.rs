//! Ruleset entity model and its portable config form.
//!
//! `Ruleset` mirrors what the rulesets API returns. `RulesetConfig` is the
//! subset that can travel between scopes or live in a file: the server-owned
//! fields are dropped and `id` is kept only as a hint for re-importing into the
//! same scope.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub target: RulesetTarget,
    pub enforcement: Enforcement,
    #[serde(default)]
    pub bypass_actors: Vec<BypassActor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
    /// The list endpoints leave this empty; fetch by id for the full set.
    #[serde(default)]
    pub rules: Vec<Rule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulesetTarget {
    Branch,
    Tag,
    Push,
}

impl Default for RulesetTarget {
    fn default() -> Self {
        RulesetTarget::Branch
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforcement {
    Disabled,
    Active,
    Evaluate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BypassActor {
    /// Only meaningful inside the scope that issued it.
    #[serde(default)]
    pub actor_id: Option<u64>,
    pub actor_type: BypassActorType,
    #[serde(default)]
    pub bypass_mode: BypassMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BypassActorType {
    Team,
    Integration,
    OrganizationAdmin,
    RepositoryRole,
    DeployKey,
}

impl fmt::Display for BypassActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BypassActorType::Team => "Team",
            BypassActorType::Integration => "Integration",
            BypassActorType::OrganizationAdmin => "OrganizationAdmin",
            BypassActorType::RepositoryRole => "RepositoryRole",
            BypassActorType::DeployKey => "DeployKey",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BypassMode {
    Always,
    PullRequest,
    Exempt,
}

impl Default for BypassMode {
    fn default() -> Self {
        BypassMode::Always
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_name: Option<RefNameCondition>,
    /// Repository name/id/property conditions, carried as-is.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefNameCondition {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// A single rule. Rule types are opaque here and copied verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// Portable form of a ruleset, safe to move between scopes or store in a file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RulesetConfig {
    /// Hint for round-tripping into the same scope, never a guarantee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub target: RulesetTarget,
    pub enforcement: Enforcement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub bypass_actors: Vec<BypassActor>,
}

impl From<&Ruleset> for RulesetConfig {
    fn from(ruleset: &Ruleset) -> Self {
        RulesetConfig {
            id: ruleset.id,
            name: ruleset.name.clone(),
            target: ruleset.target,
            enforcement: ruleset.enforcement,
            conditions: ruleset.conditions.clone(),
            rules: ruleset.rules.clone(),
            bypass_actors: ruleset.bypass_actors.clone(),
        }
    }
}

impl RulesetConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("ruleset name must not be empty".to_string()));
        }

        Ok(())
    }

    /// Builds the ruleset to send to the destination.
    ///
    /// With a matched ruleset the identifying fields come from the match and
    /// every content field is replaced by the config: updates are a full
    /// replace, never a field-level merge. `target` cannot change after
    /// creation, so the match's target wins.
    pub fn into_ruleset(self, existing: Option<&Ruleset>) -> Ruleset {
        match existing {
            Some(existing) => {
                if existing.target != self.target {
                    warn!(
                        name = %self.name,
                        existing = ?existing.target,
                        config = ?self.target,
                        "ruleset target cannot change, keeping the existing target"
                    );
                }

                Ruleset {
                    id: existing.id,
                    name: self.name,
                    target: existing.target,
                    enforcement: self.enforcement,
                    bypass_actors: self.bypass_actors,
                    conditions: self.conditions,
                    rules: self.rules,
                    source_type: existing.source_type.clone(),
                    source: existing.source.clone(),
                    node_id: existing.node_id.clone(),
                    created_at: existing.created_at.clone(),
                    updated_at: existing.updated_at.clone(),
                }
            }
            None => Ruleset {
                id: None,
                name: self.name,
                target: self.target,
                enforcement: self.enforcement,
                bypass_actors: self.bypass_actors,
                conditions: self.conditions,
                rules: self.rules,
                source_type: None,
                source: None,
                node_id: None,
                created_at: None,
                updated_at: None,
            },
        }
    }
}
