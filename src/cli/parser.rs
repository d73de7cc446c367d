use regex::Regex;

use crate::error::{Error, Result};
use crate::scope::Scope;

const ORGANIZATION_PATTERN: &str = r"^(?:(?P<host>[^/\s]+)/)?(?P<org>[^/\s]+)$";
const REPOSITORY_PATTERN: &str =
    r"^(?:(?P<host>[^/\s]+)/)?(?P<owner>[^/\s]+)/(?P<repo>[^/\s]+)$";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Organization,
    Repository,
}

impl ScopeKind {
    pub fn label(&self) -> &'static str {
        match self {
            ScopeKind::Organization => "organization",
            ScopeKind::Repository => "repository",
        }
    }
}

/// Parses `[HOST/]ORG` or `[HOST/]OWNER/REPO`, depending on `kind`.
pub fn parse_scope(kind: ScopeKind, input: &str, default_host: &str) -> Result<Scope> {
    let trimmed = strip_decorations(input);
    let pattern = match kind {
        ScopeKind::Organization => ORGANIZATION_PATTERN,
        ScopeKind::Repository => REPOSITORY_PATTERN,
    };
    let re = Regex::new(pattern).map_err(|err| Error::InvalidScope(err.to_string()))?;

    let captures = re
        .captures(trimmed)
        .ok_or_else(|| Error::InvalidScope(input.to_string()))?;
    let host = captures
        .name("host")
        .map(|host| host.as_str().to_string())
        .unwrap_or_else(|| default_host.to_string());

    let scope = match kind {
        ScopeKind::Organization => Scope::Organization {
            host,
            org: captures["org"].to_string(),
        },
        ScopeKind::Repository => Scope::Repository {
            host,
            owner: captures["owner"].to_string(),
            name: captures["repo"].to_string(),
        },
    };

    Ok(scope)
}

fn strip_decorations(input: &str) -> &str {
    let input = input.trim();
    let input = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
        .unwrap_or(input);
    let input = input.trim_end_matches('/');

    input.strip_suffix(".git").unwrap_or(input)
}
