use serde_json::json;

use crate::provider::Team;
use crate::rule_suite::{RuleSuite, RuleSuiteResult};
use crate::ruleset::{
    BypassActor, BypassActorType, BypassMode, Conditions, Enforcement, RefNameCondition, Rule,
    Ruleset, RulesetConfig, RulesetTarget,
};

pub fn ruleset(id: u64, name: &str) -> Ruleset {
    Ruleset {
        id: Some(id),
        name: name.to_string(),
        target: RulesetTarget::Branch,
        enforcement: Enforcement::Active,
        bypass_actors: vec![],
        conditions: Some(Conditions {
            ref_name: Some(RefNameCondition {
                include: vec!["~DEFAULT_BRANCH".to_string()],
                exclude: vec![],
            }),
            other: Default::default(),
        }),
        rules: vec![
            Rule {
                rule_type: "deletion".to_string(),
                parameters: None,
            },
            Rule {
                rule_type: "pull_request".to_string(),
                parameters: Some(json!({ "required_approving_review_count": 1 })),
            },
        ],
        source_type: None,
        source: None,
        node_id: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn ruleset_with_actors(id: u64, name: &str, bypass_actors: Vec<BypassActor>) -> Ruleset {
    Ruleset {
        bypass_actors,
        ..ruleset(id, name)
    }
}

pub fn config(name: &str) -> RulesetConfig {
    let mut config = RulesetConfig::from(&ruleset(0, name));
    config.id = None;
    config
}

pub fn actor(actor_type: BypassActorType, actor_id: u64) -> BypassActor {
    BypassActor {
        actor_id: Some(actor_id),
        actor_type,
        bypass_mode: BypassMode::Always,
    }
}

pub fn team(id: u64, slug: &str) -> Team {
    Team {
        id,
        slug: slug.to_string(),
        name: slug.to_string(),
    }
}

pub fn rule_suite(id: u64, result: RuleSuiteResult) -> RuleSuite {
    RuleSuite {
        id,
        actor_id: Some(1),
        actor_name: Some("octocat".to_string()),
        before_sha: Some("93c3f5e".to_string()),
        after_sha: Some("f2b1c4d".to_string()),
        git_ref: Some("refs/heads/main".to_string()),
        repository_id: Some(404),
        repository_name: Some("widgets".to_string()),
        pushed_at: Some("2024-03-01T10:00:00Z".to_string()),
        result,
        evaluation_result: Some(result),
        rule_evaluations: vec![],
    }
}
