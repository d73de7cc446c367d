//! Batch migration of rulesets from one scope to another.
//!
//! Each ruleset is one unit: export it (with the source teams its bypass
//! actors refer to), translate its actors, find its counterpart in the
//! destination by name, then create or update. Units run one after the other
//! and a failing unit never stops the batch.

use tracing::{error, info};

use crate::error::Result;
use crate::provider::{RulesetProvider, Team};
use crate::reconcile::{apply, Reconciled};
use crate::resolver::resolve;
use crate::ruleset::{BypassActorType, RulesetConfig};
use crate::scope::Scope;
use crate::translator::{needs_team_roster, ActorTranslator};

#[derive(Clone, Debug, PartialEq)]
pub struct MigrationOptions {
    pub source: Scope,
    pub destination: Scope,
    /// Empty means every ruleset in the source scope.
    pub ruleset_ids: Vec<u64>,
    /// Installation id substituted for every `Integration` bypass actor.
    pub integration_override: Option<u64>,
}

/// A source ruleset in portable form, with the source teams its bypass
/// actors reference.
#[derive(Clone, Debug, PartialEq)]
pub struct MigrationExport {
    pub source_ruleset_id: u64,
    pub config: RulesetConfig,
    pub teams: Vec<Team>,
}

#[derive(Debug)]
pub struct MigrationUnit {
    pub source_ruleset_id: u64,
    pub translated: Option<RulesetConfig>,
    pub outcome: Result<Reconciled>,
}

impl MigrationUnit {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub units: Vec<MigrationUnit>,
}

impl MigrationReport {
    pub fn attempted(&self) -> usize {
        self.units.len()
    }

    pub fn succeeded(&self) -> usize {
        self.units.iter().filter(|unit| unit.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Fails only when there was work and none of it went through.
    pub fn is_success(&self) -> bool {
        self.attempted() == 0 || self.succeeded() > 0
    }
}

/// Ruleset ids to migrate: the explicit list as given, or every ruleset the
/// source scope owns.
pub async fn enumerate<P>(provider: &P, source: &Scope, explicit: &[u64]) -> Result<Vec<u64>>
where
    P: RulesetProvider + ?Sized,
{
    if !explicit.is_empty() {
        return Ok(explicit.to_vec());
    }

    let ids = provider
        .list_rulesets(source, false)
        .await?
        .into_iter()
        .filter_map(|ruleset| ruleset.id)
        .collect();

    Ok(ids)
}

pub async fn export_for_migration<P>(provider: &P, scope: &Scope, id: u64) -> Result<MigrationExport>
where
    P: RulesetProvider + ?Sized,
{
    let ruleset = provider.fetch_ruleset(scope, id, false).await?;

    let teams = if needs_team_roster(&ruleset.bypass_actors) {
        provider
            .fetch_team_roster(scope)
            .await?
            .into_iter()
            .filter(|team| {
                ruleset.bypass_actors.iter().any(|actor| {
                    actor.actor_type == BypassActorType::Team && actor.actor_id == Some(team.id)
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(MigrationExport {
        source_ruleset_id: id,
        config: RulesetConfig::from(&ruleset),
        teams,
    })
}

/// Rewrites the export's bypass actors into the destination's id space. The
/// source id is dropped: it means nothing in another scope.
pub async fn translate_export<P>(
    provider: &P,
    destination: &Scope,
    export: &MigrationExport,
    integration_override: Option<u64>,
) -> Result<RulesetConfig>
where
    P: RulesetProvider + ?Sized,
{
    let destination_teams = if needs_team_roster(&export.config.bypass_actors) {
        provider.fetch_team_roster(destination).await?
    } else {
        Vec::new()
    };

    let translator = ActorTranslator::new(&export.teams, &destination_teams, integration_override);
    let bypass_actors = translator.translate(&export.config.bypass_actors)?;

    Ok(RulesetConfig {
        id: None,
        bypass_actors,
        ..export.config.clone()
    })
}

pub async fn migrate<S, D>(
    source_provider: &S,
    destination_provider: &D,
    options: &MigrationOptions,
) -> Result<MigrationReport>
where
    S: RulesetProvider + ?Sized,
    D: RulesetProvider + ?Sized,
{
    let ids = enumerate(source_provider, &options.source, &options.ruleset_ids).await?;

    if ids.is_empty() {
        info!(source = %options.source, "No rulesets to migrate");
        return Ok(MigrationReport::default());
    }

    info!(
        source = %options.source,
        destination = %options.destination,
        count = ids.len(),
        "Starting migration"
    );

    let mut report = MigrationReport::default();
    for id in ids {
        info!(ruleset_id = id, "Migrating ruleset");

        let unit = migrate_one(source_provider, destination_provider, options, id).await;
        match &unit.outcome {
            Ok(reconciled) => info!(
                src_id = id,
                dst_id = reconciled.id(),
                name = %reconciled.ruleset().name,
                action = reconciled.verb(),
                "Successfully migrated ruleset"
            ),
            Err(err) => error!(ruleset_id = id, error = %err, "Failed to migrate ruleset"),
        }

        report.units.push(unit);
    }

    info!(
        total = report.attempted(),
        success = report.succeeded(),
        failed = report.failed(),
        "Migration completed"
    );

    Ok(report)
}

async fn migrate_one<S, D>(
    source_provider: &S,
    destination_provider: &D,
    options: &MigrationOptions,
    id: u64,
) -> MigrationUnit
where
    S: RulesetProvider + ?Sized,
    D: RulesetProvider + ?Sized,
{
    let translated =
        match export_and_translate(source_provider, destination_provider, options, id).await {
            Ok(config) => config,
            Err(err) => {
                return MigrationUnit {
                    source_ruleset_id: id,
                    translated: None,
                    outcome: Err(err),
                }
            }
        };

    let outcome =
        reconcile_translated(destination_provider, &options.destination, translated.clone()).await;

    MigrationUnit {
        source_ruleset_id: id,
        translated: Some(translated),
        outcome,
    }
}

async fn export_and_translate<S, D>(
    source_provider: &S,
    destination_provider: &D,
    options: &MigrationOptions,
    id: u64,
) -> Result<RulesetConfig>
where
    S: RulesetProvider + ?Sized,
    D: RulesetProvider + ?Sized,
{
    let export = export_for_migration(source_provider, &options.source, id).await?;

    translate_export(
        destination_provider,
        &options.destination,
        &export,
        options.integration_override,
    )
    .await
}

async fn reconcile_translated<D>(
    provider: &D,
    destination: &Scope,
    config: RulesetConfig,
) -> Result<Reconciled>
where
    D: RulesetProvider + ?Sized,
{
    // Matched by name only: ruleset ids are never compared across scopes.
    let existing = resolve(provider, destination, None, &config.name).await?;

    apply(provider, destination, config, existing, true).await
}
