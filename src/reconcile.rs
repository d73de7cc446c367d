use tracing::info;

use crate::error::{Error, Result};
use crate::provider::RulesetProvider;
use crate::resolver::resolve;
use crate::ruleset::{Ruleset, RulesetConfig};
use crate::scope::Scope;

/// What reconciliation did to the destination.
#[derive(Clone, Debug, PartialEq)]
pub enum Reconciled {
    Created(Ruleset),
    Updated(Ruleset),
}

impl Reconciled {
    pub fn ruleset(&self) -> &Ruleset {
        match self {
            Reconciled::Created(ruleset) | Reconciled::Updated(ruleset) => ruleset,
        }
    }

    pub fn into_ruleset(self) -> Ruleset {
        match self {
            Reconciled::Created(ruleset) | Reconciled::Updated(ruleset) => ruleset,
        }
    }

    /// Destination id. Always present, `apply` refuses results without one.
    pub fn id(&self) -> u64 {
        self.ruleset().id.unwrap_or_default()
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Reconciled::Created(_) => "created",
            Reconciled::Updated(_) => "updated",
        }
    }
}

/// Makes `scope` hold `config`: replaces `existing` when there is one,
/// otherwise creates, but only when `create_if_absent` allows it.
pub async fn apply<P>(
    provider: &P,
    scope: &Scope,
    config: RulesetConfig,
    existing: Option<Ruleset>,
    create_if_absent: bool,
) -> Result<Reconciled>
where
    P: RulesetProvider + ?Sized,
{
    let reconciled = match existing {
        Some(existing) => {
            let id = existing.id.ok_or_else(|| {
                Error::Validation(format!("matched ruleset `{}` has no id", existing.name))
            })?;
            let ruleset = config.into_ruleset(Some(&existing));

            Reconciled::Updated(provider.update_ruleset(scope, id, &ruleset).await?)
        }
        None if create_if_absent => {
            let ruleset = config.into_ruleset(None);

            Reconciled::Created(provider.create_ruleset(scope, &ruleset).await?)
        }
        None => {
            return Err(Error::NotFound(not_found_message(&config)));
        }
    };

    if reconciled.ruleset().id.is_none() {
        return Err(Error::transport(format!(
            "{} ruleset `{}` came back without an id",
            reconciled.verb(),
            reconciled.ruleset().name
        )));
    }

    Ok(reconciled)
}

/// Direct import of a config into `scope`: validate, resolve, reconcile.
pub async fn import<P>(
    provider: &P,
    scope: &Scope,
    config: RulesetConfig,
    create_if_absent: bool,
) -> Result<Reconciled>
where
    P: RulesetProvider + ?Sized,
{
    config.validate()?;

    let existing = resolve(provider, scope, config.id, &config.name).await?;
    let reconciled = apply(provider, scope, config, existing, create_if_absent).await?;

    info!(
        ruleset_id = reconciled.id(),
        name = %reconciled.ruleset().name,
        scope = %scope,
        "Successfully {} ruleset",
        reconciled.verb()
    );

    Ok(reconciled)
}

fn not_found_message(config: &RulesetConfig) -> String {
    match config.id {
        Some(id) => format!("ruleset with ID {} or name '{}'", id, config.name),
        None => format!("ruleset with name '{}'", config.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::memory_provider::{Call, MemoryProvider};
    use crate::fixtures::rulesets::{config, ruleset};
    use crate::ruleset::Enforcement;

    #[tokio::test]
    async fn absent_without_create_is_not_found() {
        let scope = Scope::organization("acme");
        let provider = MemoryProvider::default();

        let result = apply(&provider, &scope, config("main"), None, false).await;

        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(provider.mutations().is_empty());
    }

    #[tokio::test]
    async fn absent_with_create_assigns_id() {
        let scope = Scope::organization("acme");
        let provider = MemoryProvider::default();

        let reconciled = apply(&provider, &scope, config("main"), None, true)
            .await
            .unwrap();

        assert!(matches!(reconciled, Reconciled::Created(_)));
        assert!(reconciled.ruleset().id.is_some());
        assert_eq!(provider.rulesets(&scope).len(), 1);
    }

    #[tokio::test]
    async fn existing_is_replaced_in_full() {
        let scope = Scope::repository("acme", "widgets");
        let existing = ruleset(12, "main");
        let provider = MemoryProvider::default().with_ruleset(&scope, existing.clone());
        let mut desired = config("main");
        desired.enforcement = Enforcement::Evaluate;
        desired.rules.truncate(1);

        let reconciled = apply(&provider, &scope, desired, Some(existing), false)
            .await
            .unwrap();

        assert_eq!(provider.mutations(), vec![Call::UpdateRuleset(scope.clone(), 12)]);
        let stored = &provider.rulesets(&scope)[0];
        assert_eq!(reconciled.ruleset(), stored);
        assert_eq!(stored.enforcement, Enforcement::Evaluate);
        assert_eq!(stored.rules.len(), 1);
    }

    #[tokio::test]
    async fn import_without_match_mutates_nothing() {
        let scope = Scope::organization("acme");
        let provider = MemoryProvider::default().with_ruleset(&scope, ruleset(1, "release"));
        let mut desired = config("main");
        desired.id = Some(44);

        let err = import(&provider, &scope, desired, false).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "ruleset with ID 44 or name 'main' not found"
        );
        assert!(provider.mutations().is_empty());
    }

    #[tokio::test]
    async fn import_updates_name_match() {
        let scope = Scope::organization("acme");
        let provider = MemoryProvider::default().with_ruleset(&scope, ruleset(3, "main"));

        let reconciled = import(&provider, &scope, config("main"), false)
            .await
            .unwrap();

        assert_eq!(reconciled.verb(), "updated");
        assert_eq!(reconciled.id(), 3);
    }

    #[tokio::test]
    async fn import_rejects_invalid_config_before_any_call() {
        let scope = Scope::organization("acme");
        let provider = MemoryProvider::default();

        let result = import(&provider, &scope, config(""), true).await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(provider.calls().is_empty());
    }
}
