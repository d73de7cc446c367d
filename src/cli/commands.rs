//! Command handlers. Each returns what should be printed so the dispatcher in
//! `cli` stays the only place that touches stdout.

use tracing::info;

use crate::error::Result;
use crate::provider::RulesetProvider;
use crate::render::{self, OutputFormat};
use crate::rule_suite::RuleSuiteFilter;
use crate::ruleset::RulesetConfig;
use crate::scope::Scope;

pub async fn list<P>(
    provider: &P,
    scope: &Scope,
    includes_parents: bool,
    format: OutputFormat,
) -> Result<String>
where
    P: RulesetProvider + ?Sized,
{
    let rulesets = provider.list_rulesets(scope, includes_parents).await?;
    if rulesets.is_empty() && format == OutputFormat::Table {
        return Ok(format!("no rulesets found in {}\n", scope));
    }

    render::rulesets(&rulesets, format)
}

pub async fn get<P>(
    provider: &P,
    scope: &Scope,
    id: u64,
    includes_parents: bool,
    format: OutputFormat,
) -> Result<String>
where
    P: RulesetProvider + ?Sized,
{
    let ruleset = provider.fetch_ruleset(scope, id, includes_parents).await?;

    render::ruleset(&ruleset, format)
}

pub async fn delete<P>(provider: &P, scope: &Scope, id: u64) -> Result<()>
where
    P: RulesetProvider + ?Sized,
{
    provider.delete_ruleset(scope, id).await?;
    info!(ruleset_id = id, scope = %scope, "Deleted ruleset");

    Ok(())
}

pub async fn export<P>(
    provider: &P,
    scope: &Scope,
    id: u64,
    includes_parents: bool,
) -> Result<RulesetConfig>
where
    P: RulesetProvider + ?Sized,
{
    let ruleset = provider.fetch_ruleset(scope, id, includes_parents).await?;

    Ok(RulesetConfig::from(&ruleset))
}

pub async fn insight_list<P>(
    provider: &P,
    scope: &Scope,
    filter: &RuleSuiteFilter,
    format: OutputFormat,
) -> Result<String>
where
    P: RulesetProvider + ?Sized,
{
    let suites = provider.list_rule_suites(scope, filter).await?;
    if suites.is_empty() && format == OutputFormat::Table {
        return Ok(format!("no rule suites found in {}\n", scope));
    }

    render::rule_suites(&suites, format)
}

pub async fn insight_get<P>(
    provider: &P,
    scope: &Scope,
    id: u64,
    format: OutputFormat,
) -> Result<String>
where
    P: RulesetProvider + ?Sized,
{
    let suite = provider.fetch_rule_suite(scope, id).await?;

    render::rule_suite(&suite, format)
}
