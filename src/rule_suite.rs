//! Read-only rule suite history. Rule suites are recorded by GitHub when it
//! evaluates rulesets against a push; nothing here evaluates them.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSuite {
    pub id: u64,
    #[serde(default)]
    pub actor_id: Option<u64>,
    #[serde(default)]
    pub actor_name: Option<String>,
    #[serde(default)]
    pub before_sha: Option<String>,
    #[serde(default)]
    pub after_sha: Option<String>,
    #[serde(rename = "ref", default)]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub repository_id: Option<u64>,
    #[serde(default)]
    pub repository_name: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
    pub result: RuleSuiteResult,
    #[serde(default)]
    pub evaluation_result: Option<RuleSuiteResult>,
    /// Only present when fetching a single rule suite.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_evaluations: Vec<RuleEvaluation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSuiteResult {
    Pass,
    Fail,
    Bypass,
}

impl RuleSuiteResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSuiteResult::Pass => "pass",
            RuleSuiteResult::Fail => "fail",
            RuleSuiteResult::Bypass => "bypass",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    pub rule_source: RuleSource,
    #[serde(default)]
    pub enforcement: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub rule_type: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSource {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Query filters for listing rule suites. Unset filters are left off the
/// request.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RuleSuiteFilter {
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_suite_result: Option<String>,
}
