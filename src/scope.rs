use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "github.com";

/// The namespace rulesets and their actor ids live in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    Organization {
        host: String,
        org: String,
    },
    Repository {
        host: String,
        owner: String,
        name: String,
    },
}

impl Scope {
    pub fn organization(org: impl Into<String>) -> Self {
        Scope::Organization {
            host: DEFAULT_HOST.to_string(),
            org: org.into(),
        }
    }

    pub fn repository(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Scope::Repository {
            host: DEFAULT_HOST.to_string(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn host(&self) -> &str {
        match self {
            Scope::Organization { host, .. } | Scope::Repository { host, .. } => host,
        }
    }

    /// Organization that owns the scope. Team rosters are looked up here.
    pub fn owner(&self) -> &str {
        match self {
            Scope::Organization { org, .. } => org,
            Scope::Repository { owner, .. } => owner,
        }
    }

    pub fn rulesets_route(&self) -> String {
        match self {
            Scope::Organization { org, .. } => format!("orgs/{org}/rulesets", org = org),
            Scope::Repository { owner, name, .. } => format!(
                "repos/{owner}/{repo}/rulesets",
                owner = owner,
                repo = name
            ),
        }
    }

    pub fn ruleset_route(&self, id: u64) -> String {
        format!("{base}/{id}", base = self.rulesets_route(), id = id)
    }

    pub fn rule_suites_route(&self) -> String {
        format!("{base}/rule-suites", base = self.rulesets_route())
    }

    pub fn rule_suite_route(&self, id: u64) -> String {
        format!("{base}/{id}", base = self.rule_suites_route(), id = id)
    }

    pub fn teams_route(&self) -> String {
        format!("orgs/{org}/teams", org = self.owner())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.host() == DEFAULT_HOST {
            String::new()
        } else {
            format!("{}/", self.host())
        };

        match self {
            Scope::Organization { org, .. } => write!(f, "{}{}", prefix, org),
            Scope::Repository { owner, name, .. } => write!(f, "{}{}/{}", prefix, owner, name),
        }
    }
}
