use serde_json::{json, Value};
use wiremock::MockServer;

use rulekit::github_provider::GithubProvider;
use rulekit::migration::{migrate, MigrationOptions};
use rulekit::scope::Scope;

use crate::mocks::github::{get_mock, get_page_mock, ruleset_json, write_mock};

#[tokio::test]
async fn org_to_org_rewrites_teams_and_creates() {
    let server = MockServer::start().await;
    let source = Scope::organization("acme");
    let destination = Scope::organization("acme-next");

    get_mock(
        "/orgs/acme/rulesets/1",
        200,
        ruleset_json(
            1,
            "main",
            json!([
                { "actor_id": 7, "actor_type": "Team", "bypass_mode": "pull_request" },
                { "actor_id": 5, "actor_type": "RepositoryRole", "bypass_mode": "always" }
            ]),
        ),
    )
    .mount(&server)
    .await;
    get_page_mock(
        "/orgs/acme/teams",
        1,
        json!([
            { "id": 7, "slug": "platform", "name": "Platform" },
            { "id": 8, "slug": "security", "name": "Security" }
        ]),
    )
    .mount(&server)
    .await;
    get_page_mock(
        "/orgs/acme-next/teams",
        1,
        json!([{ "id": 71, "slug": "platform", "name": "Platform" }]),
    )
    .mount(&server)
    .await;
    get_page_mock("/orgs/acme-next/rulesets", 1, json!([]))
        .mount(&server)
        .await;
    write_mock(
        "POST",
        "/orgs/acme-next/rulesets",
        201,
        ruleset_json(
            310,
            "main",
            json!([
                { "actor_id": 71, "actor_type": "Team", "bypass_mode": "pull_request" },
                { "actor_id": 5, "actor_type": "RepositoryRole", "bypass_mode": "always" }
            ]),
        ),
    )
    .mount(&server)
    .await;

    let provider = GithubProvider::new(None, &server.uri()).unwrap();
    let options = MigrationOptions {
        source,
        destination,
        ruleset_ids: vec![1],
        integration_override: None,
    };

    let report = migrate(&provider, &provider, &options).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.units[0].outcome.as_ref().unwrap().id(), 310);

    let requests = server.received_requests().await.unwrap();
    let create = requests
        .iter()
        .find(|request| request.method.to_string() == "POST")
        .unwrap();
    let body: Value = serde_json::from_slice(&create.body).unwrap();
    assert!(body.get("id").is_none());
    assert_eq!(
        body["bypass_actors"],
        json!([
            { "actor_id": 71, "actor_type": "Team", "bypass_mode": "pull_request" },
            { "actor_id": 5, "actor_type": "RepositoryRole", "bypass_mode": "always" }
        ])
    );
}

#[tokio::test]
async fn untranslatable_ruleset_is_never_written() {
    let server = MockServer::start().await;

    get_mock(
        "/orgs/acme/rulesets/2",
        200,
        ruleset_json(
            2,
            "deploys",
            json!([{ "actor_id": 99, "actor_type": "Integration", "bypass_mode": "always" }]),
        ),
    )
    .mount(&server)
    .await;

    let provider = GithubProvider::new(None, &server.uri()).unwrap();
    let options = MigrationOptions {
        source: Scope::organization("acme"),
        destination: Scope::organization("acme-next"),
        ruleset_ids: vec![2],
        integration_override: None,
    };

    let report = migrate(&provider, &provider, &options).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failed(), 1);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/orgs/acme/rulesets/2");
}
