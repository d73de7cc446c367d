use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

pub fn not_found_body() -> Value {
    json!({
        "message": "Not Found",
        "documentation_url": "https://docs.github.com/rest/repos/rules"
    })
}

pub fn ruleset_json(id: u64, name: &str, bypass_actors: Value) -> Value {
    json!({
        "id": id,
        "name": name,
        "target": "branch",
        "source_type": "Organization",
        "source": "acme",
        "enforcement": "active",
        "node_id": "RRS_lACqUmVwb3NpdG9yec5",
        "bypass_actors": bypass_actors,
        "conditions": {
            "ref_name": { "include": ["~DEFAULT_BRANCH"], "exclude": [] },
            "repository_name": { "include": ["~ALL"], "exclude": [], "protected": true }
        },
        "rules": [
            { "type": "deletion" },
            { "type": "pull_request", "parameters": { "required_approving_review_count": 1 } }
        ],
        "created_at": "2023-07-15T08:43:03Z",
        "updated_at": "2023-08-23T16:29:47Z"
    })
}

pub fn get_mock(route: &str, status: u16, response: Value) -> Mock {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(response))
        .expect(1)
}

pub fn get_page_mock(route: &str, page: u32, response: Value) -> Mock {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("per_page", "100"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
}

pub fn write_mock(verb: &str, route: &str, status: u16, response: Value) -> Mock {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(response))
        .expect(1)
}

pub fn delete_mock(route: &str) -> Mock {
    Mock::given(method("DELETE"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
}
