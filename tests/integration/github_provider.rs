use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rulekit::error::Error;
use rulekit::github_provider::GithubProvider;
use rulekit::provider::RulesetProvider;
use rulekit::rule_suite::{RuleSuiteFilter, RuleSuiteResult};
use rulekit::scope::Scope;

use crate::mocks::github::{
    delete_mock, get_mock, get_page_mock, not_found_body, ruleset_json, write_mock,
};

async fn provider(server: &MockServer) -> GithubProvider {
    GithubProvider::new(None, &server.uri()).unwrap()
}

#[tokio::test]
async fn fetch_ruleset_keeps_unknown_conditions() {
    let server = MockServer::start().await;
    let scope = Scope::organization("acme");
    get_mock(
        "/orgs/acme/rulesets/42",
        200,
        ruleset_json(42, "main", json!([])),
    )
    .mount(&server)
    .await;

    let ruleset = provider(&server)
        .await
        .fetch_ruleset(&scope, 42, false)
        .await
        .unwrap();

    assert_eq!(ruleset.id, Some(42));
    assert_eq!(ruleset.source.as_deref(), Some("acme"));
    assert_eq!(ruleset.rules.len(), 2);
    let conditions = ruleset.conditions.unwrap();
    assert_eq!(
        conditions.other["repository_name"]["protected"],
        Value::Bool(true)
    );
}

#[tokio::test]
async fn missing_ruleset_is_not_found() {
    let server = MockServer::start().await;
    let scope = Scope::repository("acme", "widgets");
    get_mock("/repos/acme/widgets/rulesets/7", 404, not_found_body())
        .mount(&server)
        .await;

    let err = provider(&server)
        .await
        .fetch_ruleset(&scope, 7, false)
        .await
        .unwrap_err();

    assert!(err.is_not_found(), "unexpected error: {:?}", err);
    assert_eq!(err.to_string(), "ruleset 7 in acme/widgets not found");
}

#[tokio::test]
async fn repository_fetch_can_reach_inherited_rulesets() {
    let server = MockServer::start().await;
    let scope = Scope::repository("acme", "widgets");
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/rulesets/42"))
        .and(query_param("includes_parents", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ruleset_json(
            42,
            "org-main",
            json!([]),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let ruleset = provider(&server)
        .await
        .fetch_ruleset(&scope, 42, true)
        .await
        .unwrap();

    assert_eq!(ruleset.name, "org-main");
    assert_eq!(ruleset.source_type.as_deref(), Some("Organization"));
}

#[tokio::test]
async fn organization_fetch_sends_no_query() {
    let server = MockServer::start().await;
    let scope = Scope::organization("acme");
    get_mock(
        "/orgs/acme/rulesets/42",
        200,
        ruleset_json(42, "main", json!([])),
    )
    .mount(&server)
    .await;

    provider(&server)
        .await
        .fetch_ruleset(&scope, 42, true)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn server_errors_are_transport_failures() {
    let server = MockServer::start().await;
    let scope = Scope::organization("acme");
    get_mock(
        "/orgs/acme/rulesets/7",
        500,
        json!({
            "message": "Server Error",
            "documentation_url": "https://docs.github.com/rest"
        }),
    )
    .mount(&server)
    .await;

    let err = provider(&server)
        .await
        .fetch_ruleset(&scope, 7, false)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn list_follows_pages_until_a_short_one() {
    let server = MockServer::start().await;
    let scope = Scope::organization("acme");
    let first_page: Vec<Value> = (1..=100)
        .map(|id| ruleset_json(id, &format!("ruleset-{}", id), json!([])))
        .collect();
    get_page_mock("/orgs/acme/rulesets", 1, Value::Array(first_page))
        .mount(&server)
        .await;
    get_page_mock(
        "/orgs/acme/rulesets",
        2,
        json!([ruleset_json(101, "ruleset-101", json!([]))]),
    )
    .mount(&server)
    .await;

    let rulesets = provider(&server)
        .await
        .list_rulesets(&scope, false)
        .await
        .unwrap();

    assert_eq!(rulesets.len(), 101);
    assert_eq!(rulesets[100].name, "ruleset-101");
}

#[tokio::test]
async fn create_sends_only_writable_fields() {
    let server = MockServer::start().await;
    let scope = Scope::repository("acme", "widgets");
    write_mock(
        "POST",
        "/repos/acme/widgets/rulesets",
        201,
        ruleset_json(900, "main", json!([])),
    )
    .mount(&server)
    .await;
    let mut ruleset: rulekit::ruleset::Ruleset =
        serde_json::from_value(ruleset_json(3, "main", json!([]))).unwrap();
    ruleset.id = None;

    let created = provider(&server)
        .await
        .create_ruleset(&scope, &ruleset)
        .await
        .unwrap();

    assert_eq!(created.id, Some(900));
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["name"], "main");
    assert!(body.get("id").is_none());
    assert!(body.get("source").is_none());
    assert!(body.get("node_id").is_none());
    assert!(body.get("created_at").is_none());
    assert_eq!(body["conditions"]["repository_name"]["protected"], true);
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let server = MockServer::start().await;
    let scope = Scope::organization("acme");
    delete_mock("/orgs/acme/rulesets/12").mount(&server).await;

    provider(&server)
        .await
        .delete_ruleset(&scope, 12)
        .await
        .unwrap();
}

#[tokio::test]
async fn rule_suites_pass_filters_as_query() {
    let server = MockServer::start().await;
    let scope = Scope::repository("acme", "widgets");
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/rulesets/rule-suites"))
        .and(query_param("ref", "refs/heads/main"))
        .and(query_param("rule_suite_result", "fail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 21,
            "actor_id": 12,
            "actor_name": "octocat",
            "before_sha": "c0ffee",
            "after_sha": "decaf0",
            "ref": "refs/heads/main",
            "repository_id": 404,
            "repository_name": "widgets",
            "pushed_at": "2023-07-06T08:43:03Z",
            "result": "fail",
            "evaluation_result": "fail"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    let filter = RuleSuiteFilter {
        git_ref: Some("refs/heads/main".to_string()),
        rule_suite_result: Some("fail".to_string()),
        ..RuleSuiteFilter::default()
    };

    let suites = provider(&server)
        .await
        .list_rule_suites(&scope, &filter)
        .await
        .unwrap();

    assert_eq!(suites.len(), 1);
    assert_eq!(suites[0].result, RuleSuiteResult::Fail);
    assert_eq!(suites[0].git_ref.as_deref(), Some("refs/heads/main"));
}
