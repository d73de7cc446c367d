use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rule_suite::{RuleSuite, RuleSuiteFilter};
use crate::ruleset::Ruleset;
use crate::scope::Scope;

/// A team as listed in an organization's roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub slug: String,
    #[serde(default)]
    pub name: String,
}

/// Everything rulekit needs from the hosting API. Each call is a single
/// request/response exchange (pagination aside); retries are the
/// implementation's business.
#[async_trait]
pub trait RulesetProvider: Send + Sync {
    /// Fails with `Error::NotFound` when the scope has no ruleset `id`.
    /// `includes_parents` also finds rulesets a repository inherits from its
    /// organization; it has no meaning for organization scopes.
    async fn fetch_ruleset(&self, scope: &Scope, id: u64, includes_parents: bool)
        -> Result<Ruleset>;

    async fn list_rulesets(&self, scope: &Scope, includes_parents: bool) -> Result<Vec<Ruleset>>;

    async fn fetch_team_roster(&self, scope: &Scope) -> Result<Vec<Team>>;

    /// Returns the stored ruleset with its newly assigned id.
    async fn create_ruleset(&self, scope: &Scope, ruleset: &Ruleset) -> Result<Ruleset>;

    async fn update_ruleset(&self, scope: &Scope, id: u64, ruleset: &Ruleset) -> Result<Ruleset>;

    async fn delete_ruleset(&self, scope: &Scope, id: u64) -> Result<()>;

    async fn list_rule_suites(
        &self,
        scope: &Scope,
        filter: &RuleSuiteFilter,
    ) -> Result<Vec<RuleSuite>>;

    async fn fetch_rule_suite(&self, scope: &Scope, id: u64) -> Result<RuleSuite>;
}
