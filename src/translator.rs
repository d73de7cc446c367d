//! Rewrites bypass actors from one scope's id space into another's.
//!
//! Role actors carry role ids that mean the same thing everywhere. Teams are
//! matched by slug. Integrations cannot be matched reliably, so a single
//! caller-supplied installation id replaces every one of them. Deploy keys
//! never move.

use crate::error::{Error, Result};
use crate::provider::Team;
use crate::ruleset::{BypassActor, BypassActorType};

pub struct ActorTranslator<'a> {
    source_teams: &'a [Team],
    destination_teams: &'a [Team],
    integration_override: Option<u64>,
}

impl<'a> ActorTranslator<'a> {
    pub fn new(
        source_teams: &'a [Team],
        destination_teams: &'a [Team],
        integration_override: Option<u64>,
    ) -> Self {
        ActorTranslator {
            source_teams,
            destination_teams,
            integration_override,
        }
    }

    /// Translates every actor, failing on the first one that has no
    /// counterpart in the destination.
    pub fn translate(&self, actors: &[BypassActor]) -> Result<Vec<BypassActor>> {
        actors.iter().map(|actor| self.translate_actor(actor)).collect()
    }

    pub fn translate_actor(&self, actor: &BypassActor) -> Result<BypassActor> {
        match actor.actor_type {
            BypassActorType::OrganizationAdmin | BypassActorType::RepositoryRole => {
                Ok(actor.clone())
            }
            BypassActorType::Team => {
                let slug = self.source_slug(actor)?;
                let team = self
                    .destination_teams
                    .iter()
                    .find(|team| team.slug == slug)
                    .ok_or_else(|| {
                        untranslatable(actor, format!("no team with slug `{}` in destination", slug))
                    })?;

                Ok(BypassActor {
                    actor_id: Some(team.id),
                    ..actor.clone()
                })
            }
            BypassActorType::Integration => match self.integration_override {
                Some(id) => Ok(BypassActor {
                    actor_id: Some(id),
                    ..actor.clone()
                }),
                None => Err(untranslatable(
                    actor,
                    "integration actors need an integration id override".to_string(),
                )),
            },
            BypassActorType::DeployKey => Err(untranslatable(
                actor,
                "deploy keys are not portable across scopes".to_string(),
            )),
        }
    }

    fn source_slug(&self, actor: &BypassActor) -> Result<&'a str> {
        self.source_teams
            .iter()
            .find(|team| Some(team.id) == actor.actor_id)
            .map(|team| team.slug.as_str())
            .ok_or_else(|| untranslatable(actor, "team not found in source roster".to_string()))
    }
}

fn untranslatable(actor: &BypassActor, reason: String) -> Error {
    Error::UntranslatableActor {
        actor_type: actor.actor_type,
        actor_id: actor.actor_id,
        reason,
    }
}

/// Whether any actor needs a team roster to be translated.
pub fn needs_team_roster(actors: &[BypassActor]) -> bool {
    actors
        .iter()
        .any(|actor| actor.actor_type == BypassActorType::Team)
}
