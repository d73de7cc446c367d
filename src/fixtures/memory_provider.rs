use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::provider::{RulesetProvider, Team};
use crate::rule_suite::{RuleSuite, RuleSuiteFilter};
use crate::ruleset::Ruleset;
use crate::scope::Scope;

/// Calls received by a `MemoryProvider`, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    FetchRuleset(Scope, u64),
    ListRulesets(Scope),
    FetchTeamRoster(Scope),
    CreateRuleset(Scope, String),
    UpdateRuleset(Scope, u64),
    DeleteRuleset(Scope, u64),
    ListRuleSuites(Scope),
    FetchRuleSuite(Scope, u64),
}

impl Call {
    pub fn scope(&self) -> &Scope {
        match self {
            Call::FetchRuleset(scope, _)
            | Call::ListRulesets(scope)
            | Call::FetchTeamRoster(scope)
            | Call::CreateRuleset(scope, _)
            | Call::UpdateRuleset(scope, _)
            | Call::DeleteRuleset(scope, _)
            | Call::ListRuleSuites(scope)
            | Call::FetchRuleSuite(scope, _) => scope,
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::CreateRuleset(..) | Call::UpdateRuleset(..) | Call::DeleteRuleset(..)
        )
    }
}

/// In-memory stand-in for the GitHub API.
#[derive(Default)]
pub struct MemoryProvider {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    rulesets: HashMap<Scope, Vec<Ruleset>>,
    teams: HashMap<(String, String), Vec<Team>>,
    rule_suites: HashMap<Scope, Vec<RuleSuite>>,
    failing_fetches: HashSet<(Scope, u64)>,
    last_id: u64,
    calls: Vec<Call>,
}

fn roster_key(scope: &Scope) -> (String, String) {
    (scope.host().to_string(), scope.owner().to_string())
}

impl MemoryProvider {
    pub fn with_ruleset(self, scope: &Scope, ruleset: Ruleset) -> Self {
        self.state
            .lock()
            .unwrap()
            .rulesets
            .entry(scope.clone())
            .or_default()
            .push(ruleset);
        self
    }

    /// Sets the team roster of the organization owning `scope`.
    pub fn with_teams(self, scope: &Scope, teams: Vec<Team>) -> Self {
        self.state
            .lock()
            .unwrap()
            .teams
            .insert(roster_key(scope), teams);
        self
    }

    pub fn with_rule_suite(self, scope: &Scope, rule_suite: RuleSuite) -> Self {
        self.state
            .lock()
            .unwrap()
            .rule_suites
            .entry(scope.clone())
            .or_default()
            .push(rule_suite);
        self
    }

    /// Makes `fetch_ruleset(scope, id, ..)` fail with a transport error.
    pub fn fail_fetch(self, scope: &Scope, id: u64) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_fetches
            .insert((scope.clone(), id));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_for(&self, scope: &Scope) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.scope() == scope)
            .collect()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(Call::is_mutation)
            .collect()
    }

    pub fn rulesets(&self, scope: &Scope) -> Vec<Ruleset> {
        self.state
            .lock()
            .unwrap()
            .rulesets
            .get(scope)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl RulesetProvider for MemoryProvider {
    async fn fetch_ruleset(
        &self,
        scope: &Scope,
        id: u64,
        _includes_parents: bool,
    ) -> Result<Ruleset> {
        self.record(Call::FetchRuleset(scope.clone(), id));
        let state = self.state.lock().unwrap();

        if state.failing_fetches.contains(&(scope.clone(), id)) {
            return Err(Error::transport("connection reset by peer"));
        }

        state
            .rulesets
            .get(scope)
            .and_then(|rulesets| rulesets.iter().find(|ruleset| ruleset.id == Some(id)))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("ruleset {} in {}", id, scope)))
    }

    async fn list_rulesets(&self, scope: &Scope, _includes_parents: bool) -> Result<Vec<Ruleset>> {
        self.record(Call::ListRulesets(scope.clone()));
        Ok(self.rulesets(scope))
    }

    async fn fetch_team_roster(&self, scope: &Scope) -> Result<Vec<Team>> {
        self.record(Call::FetchTeamRoster(scope.clone()));
        let state = self.state.lock().unwrap();

        state
            .teams
            .get(&roster_key(scope))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("team roster of {}", scope.owner())))
    }

    async fn create_ruleset(&self, scope: &Scope, ruleset: &Ruleset) -> Result<Ruleset> {
        self.record(Call::CreateRuleset(scope.clone(), ruleset.name.clone()));
        let mut state = self.state.lock().unwrap();

        state.last_id += 1;
        let mut created = ruleset.clone();
        created.id = Some(1000 + state.last_id);
        state
            .rulesets
            .entry(scope.clone())
            .or_default()
            .push(created.clone());

        Ok(created)
    }

    async fn update_ruleset(&self, scope: &Scope, id: u64, ruleset: &Ruleset) -> Result<Ruleset> {
        self.record(Call::UpdateRuleset(scope.clone(), id));
        let mut state = self.state.lock().unwrap();

        let stored = state
            .rulesets
            .get_mut(scope)
            .and_then(|rulesets| rulesets.iter_mut().find(|ruleset| ruleset.id == Some(id)))
            .ok_or_else(|| Error::NotFound(format!("ruleset {} in {}", id, scope)))?;

        *stored = ruleset.clone();
        stored.id = Some(id);

        Ok(stored.clone())
    }

    async fn delete_ruleset(&self, scope: &Scope, id: u64) -> Result<()> {
        self.record(Call::DeleteRuleset(scope.clone(), id));
        let mut state = self.state.lock().unwrap();

        let rulesets = state.rulesets.entry(scope.clone()).or_default();
        let before = rulesets.len();
        rulesets.retain(|ruleset| ruleset.id != Some(id));

        if rulesets.len() == before {
            return Err(Error::NotFound(format!("ruleset {} in {}", id, scope)));
        }

        Ok(())
    }

    async fn list_rule_suites(
        &self,
        scope: &Scope,
        filter: &RuleSuiteFilter,
    ) -> Result<Vec<RuleSuite>> {
        self.record(Call::ListRuleSuites(scope.clone()));
        let state = self.state.lock().unwrap();

        let suites = state.rule_suites.get(scope).cloned().unwrap_or_default();

        Ok(suites
            .into_iter()
            .filter(|suite| match &filter.rule_suite_result {
                Some(result) if result != "all" => suite.result.as_str() == result,
                _ => true,
            })
            .collect())
    }

    async fn fetch_rule_suite(&self, scope: &Scope, id: u64) -> Result<RuleSuite> {
        self.record(Call::FetchRuleSuite(scope.clone(), id));
        let state = self.state.lock().unwrap();

        state
            .rule_suites
            .get(scope)
            .and_then(|suites| suites.iter().find(|suite| suite.id == id))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("rule suite {} in {}", id, scope)))
    }
}
