use std::sync::Arc;

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::provider::{RulesetProvider, Team};
use crate::rule_suite::{RuleSuite, RuleSuiteFilter};
use crate::ruleset::{BypassActor, Conditions, Enforcement, Rule, Ruleset, RulesetTarget};
use crate::scope::{Scope, DEFAULT_HOST};

const PER_PAGE: u8 = 100;

pub struct GithubProvider {
    instance: Arc<Octocrab>,
}

/// REST base URL for a host; anything other than github.com is treated as
/// GitHub Enterprise Server.
pub fn api_base_url(host: &str) -> String {
    if host == DEFAULT_HOST || host == "api.github.com" {
        "https://api.github.com/".to_string()
    } else {
        format!("https://{host}/api/v3/", host = host)
    }
}

impl GithubProvider {
    pub fn new(token: Option<String>, base_url: &str) -> Result<Self> {
        // Routes are relative, so the base must end with a slash to keep its path.
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token);
        }

        let instance = builder
            .base_url(base_url.as_str())
            .map_err(Error::transport)?
            .build()
            .map_err(Error::transport)?;

        Ok(GithubProvider {
            instance: Arc::new(instance),
        })
    }

    pub fn for_host(host: &str, token: Option<String>) -> Result<Self> {
        Self::new(token, &api_base_url(host))
    }

    async fn get_pages<T, Q>(&self, route: &str, query: &Q) -> octocrab::Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
        Q: Serialize + Sync,
    {
        let mut items = Vec::new();

        for page in 1u32.. {
            let params = Paged {
                query,
                per_page: PER_PAGE,
                page,
            };
            let batch: Vec<T> = self.instance.get(route, Some(&params)).await?;
            let last = batch.len() < PER_PAGE as usize;
            items.extend(batch);

            if last {
                break;
            }
        }

        Ok(items)
    }
}

#[derive(Serialize)]
struct Paged<'a, Q: Serialize> {
    #[serde(flatten)]
    query: &'a Q,
    per_page: u8,
    page: u32,
}

#[derive(Serialize)]
struct NoQuery {}

#[derive(Serialize)]
struct RulesetQuery {
    includes_parents: bool,
}

/// Writable subset of a ruleset, as accepted by create and update.
#[derive(Serialize)]
struct RulesetBody<'a> {
    name: &'a str,
    target: RulesetTarget,
    enforcement: Enforcement,
    bypass_actors: &'a [BypassActor],
    #[serde(skip_serializing_if = "Option::is_none")]
    conditions: Option<&'a Conditions>,
    rules: &'a [Rule],
}

impl<'a> From<&'a Ruleset> for RulesetBody<'a> {
    fn from(ruleset: &'a Ruleset) -> Self {
        RulesetBody {
            name: &ruleset.name,
            target: ruleset.target,
            enforcement: ruleset.enforcement,
            bypass_actors: &ruleset.bypass_actors,
            conditions: ruleset.conditions.as_ref(),
            rules: &ruleset.rules,
        }
    }
}

fn api_error(err: octocrab::Error, what: impl FnOnce() -> String) -> Error {
    match &err {
        octocrab::Error::GitHub { source, .. } if source.message == "Not Found" => {
            Error::NotFound(what())
        }
        _ => Error::transport(err),
    }
}

#[async_trait]
impl RulesetProvider for GithubProvider {
    async fn fetch_ruleset(
        &self,
        scope: &Scope,
        id: u64,
        includes_parents: bool,
    ) -> Result<Ruleset> {
        let route = scope.ruleset_route(id);
        let result: octocrab::Result<Ruleset> = match scope {
            Scope::Repository { .. } => {
                self.instance
                    .get(route, Some(&RulesetQuery { includes_parents }))
                    .await
            }
            Scope::Organization { .. } => self.instance.get(route, None::<&()>).await,
        };

        result.map_err(|err| api_error(err, || format!("ruleset {} in {}", id, scope)))
    }

    async fn list_rulesets(&self, scope: &Scope, includes_parents: bool) -> Result<Vec<Ruleset>> {
        let route = scope.rulesets_route();
        let result = match scope {
            Scope::Repository { .. } => {
                self.get_pages(&route, &RulesetQuery { includes_parents })
                    .await
            }
            Scope::Organization { .. } => self.get_pages(&route, &NoQuery {}).await,
        };

        result.map_err(|err| api_error(err, || format!("rulesets of {}", scope)))
    }

    async fn fetch_team_roster(&self, scope: &Scope) -> Result<Vec<Team>> {
        self.get_pages(&scope.teams_route(), &NoQuery {})
            .await
            .map_err(|err| api_error(err, || format!("team roster of {}", scope.owner())))
    }

    async fn create_ruleset(&self, scope: &Scope, ruleset: &Ruleset) -> Result<Ruleset> {
        self.instance
            .post(scope.rulesets_route(), Some(&RulesetBody::from(ruleset)))
            .await
            .map_err(|err| api_error(err, || scope.to_string()))
    }

    async fn update_ruleset(&self, scope: &Scope, id: u64, ruleset: &Ruleset) -> Result<Ruleset> {
        self.instance
            .put(scope.ruleset_route(id), Some(&RulesetBody::from(ruleset)))
            .await
            .map_err(|err| api_error(err, || format!("ruleset {} in {}", id, scope)))
    }

    async fn delete_ruleset(&self, scope: &Scope, id: u64) -> Result<()> {
        let not_found = || format!("ruleset {} in {}", id, scope);
        let url = self
            .instance
            .absolute_url(scope.ruleset_route(id))
            .map_err(Error::transport)?;

        let response: reqwest::Response = self
            .instance
            ._delete(url, None::<&()>)
            .await
            .map_err(|err| api_error(err, not_found))?;

        octocrab::map_github_error(response)
            .await
            .map(drop)
            .map_err(|err| api_error(err, not_found))
    }

    async fn list_rule_suites(
        &self,
        scope: &Scope,
        filter: &RuleSuiteFilter,
    ) -> Result<Vec<RuleSuite>> {
        self.get_pages(&scope.rule_suites_route(), filter)
            .await
            .map_err(|err| api_error(err, || format!("rule suites of {}", scope)))
    }

    async fn fetch_rule_suite(&self, scope: &Scope, id: u64) -> Result<RuleSuite> {
        self.instance
            .get(scope.rule_suite_route(id), None::<&()>)
            .await
            .map_err(|err| api_error(err, || format!("rule suite {} in {}", id, scope)))
    }
}
