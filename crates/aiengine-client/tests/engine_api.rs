//! Integration tests for the function group, function, credit and session endpoints.

mod common;

use std::time::Duration;

use aiengine_client::{
    CreateFunctionRequest, DEFAULT_MODEL_IDS, Error, FunctionArgument, ListFunctionsQuery,
    SessionOptions,
};
use common::*;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ─────────────────────────────────────────────────────────────────────────────
// Function groups
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_groups_private_first_even_when_slower() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta1/function-groups/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"uuid": "p1", "name": "Mine", "isPrivate": true}]))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta1/function-groups/public/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"uuid": "pub1", "name": "Fetch Verified", "isPrivate": false},
            {"uuid": "pub2", "name": "Fetch Public", "isPrivate": false}
        ])))
        .mount(&server)
        .await;

    let groups = client_for(&server).function_groups().list().await.unwrap();
    let ids: Vec<_> = groups.iter().map(|g| g.uuid.as_str()).collect();
    assert_eq!(ids, vec!["p1", "pub1", "pub2"]);
    assert!(groups[0].is_private);
}

#[tokio::test]
async fn test_list_groups_fails_when_either_listing_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta1/function-groups/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta1/function-groups/public/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .function_groups()
        .list()
        .await
        .unwrap_err();
    assert!(err.is_server_error());
}

#[tokio::test]
async fn test_find_group_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta1/function-groups/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta1/function-groups/public/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"uuid": "pub1", "name": "Fetch Verified", "isPrivate": false}
        ])))
        .mount(&server)
        .await;

    let groups = client_for(&server).function_groups();
    let found = groups.find_by_name("Fetch Verified").await.unwrap();
    assert_eq!(found.unwrap().uuid, "pub1");
    assert!(groups.find_by_name("Nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_group_sends_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta1/function-groups/"))
        .and(body_json(json!({"name": "Travel", "isPrivate": true})))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"uuid": "g9", "name": "Travel", "isPrivate": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let group = client_for(&server)
        .function_groups()
        .create("Travel", true)
        .await
        .unwrap();
    assert_eq!(group.uuid, "g9");
}

#[tokio::test]
async fn test_share_requires_target() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .function_groups()
        .share("g1", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingShareTarget));
    assert!(err.is_precondition());
}

#[tokio::test]
async fn test_share_by_email() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1beta1/function-groups/g1/permissions/"))
        .and(body_json(json!({
            "user_email_to_add_permission": "ann@example.com",
            "action": "RETRIEVE"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .function_groups()
        .share("g1", None, Some("ann@example.com"))
        .await
        .unwrap();
    assert_eq!(result["ok"], true);
}

#[tokio::test]
async fn test_create_and_share() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta1/function-groups/"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"uuid": "g9", "name": "Travel", "isPrivate": true})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1beta1/function-groups/g9/permissions/"))
        .and(body_partial_json(json!({"user_email_to_add_permission": "ann@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let group = client_for(&server)
        .function_groups()
        .create_and_share("Travel", true, "ann@example.com")
        .await
        .unwrap();
    assert_eq!(group.name, "Travel");
}

#[tokio::test]
async fn test_delete_group_not_found_maps_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1beta1/function-groups/missing/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .function_groups()
        .delete("missing")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    match err {
        Error::Api {
            method,
            path,
            status,
            message,
        } => {
            assert_eq!(method, "DELETE");
            assert_eq!(path, "/v1beta1/function-groups/missing/");
            assert_eq!(status, 404);
            assert_eq!(message, "not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta1/function-groups/g1/functions/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .function_groups()
        .functions("g1")
        .await
        .unwrap_err();
    assert!(err.is_auth_error());
    assert!(err.to_string().contains("HTTP 401"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Functions
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_group_functions_keep_extra_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta1/function-groups/g1/functions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "uuid": "f1",
            "name": "Flights",
            "description": "Find flights",
            "agent": "agent1q...",
            "type": "PRIMARY",
            "isDialogue": false
        }])))
        .mount(&server)
        .await;

    let functions = client_for(&server)
        .function_groups()
        .functions("g1")
        .await
        .unwrap();
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].function_type.as_deref(), Some("PRIMARY"));
    assert_eq!(functions[0].extra["isDialogue"], false);
}

#[tokio::test]
async fn test_list_functions_with_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta1/functions/"))
        .and(query_param("type", "PRIMARY"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"uuid": "f1", "name": "Flights"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = ListFunctionsQuery::new().param("type", "PRIMARY");
    let functions = client_for(&server)
        .functions()
        .list_with_query(&query)
        .await
        .unwrap();
    assert_eq!(functions[0].uuid, "f1");
}

#[tokio::test]
async fn test_create_function_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta1/functions/"))
        .and(body_json(json!({
            "agent": "agent1qabc",
            "name": "Flights",
            "description": "Find flights",
            "protocolDigest": "proto:1",
            "modelDigest": "model:1",
            "modelName": "FlightRequest",
            "arguments": [
                {"name": "to", "required": true, "type": "str", "description": "Destination"}
            ],
            "type": "PRIMARY",
            "isDialogue": false
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"uuid": "f1", "name": "Flights"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateFunctionRequest {
        agent: "agent1qabc".to_string(),
        name: "Flights".to_string(),
        description: "Find flights".to_string(),
        protocol_digest: "proto:1".to_string(),
        model_digest: "model:1".to_string(),
        model_name: "FlightRequest".to_string(),
        arguments: vec![FunctionArgument {
            name: "to".to_string(),
            required: true,
            arg_type: "str".to_string(),
            description: "Destination".to_string(),
        }],
        function_type: "PRIMARY".to_string(),
        is_dialogue: false,
    };
    let created = client_for(&server)
        .functions()
        .create(&request)
        .await
        .unwrap();
    assert_eq!(created.uuid, "f1");
}

#[tokio::test]
async fn test_groups_of_function() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta1/function/f1/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"uuid": "g1", "name": "Travel", "isPrivate": true}
        ])))
        .mount(&server)
        .await;

    let groups = client_for(&server).functions().groups("f1").await.unwrap();
    assert_eq!(groups[0].name, "Travel");
}

// ─────────────────────────────────────────────────────────────────────────────
// Credits and models
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_credit_balance_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta1/engine/credit/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_credit": 1000,
            "used_credit": 250,
            "available_credit": 750
        })))
        .mount(&server)
        .await;

    let balance = client_for(&server).credits().balance().await.unwrap();
    assert_eq!(balance.total_credits, 1000);
    assert_eq!(balance.used_credits, 250);
    assert_eq!(balance.available_credits, 750);
}

#[tokio::test]
async fn test_model_credits_default_to_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta1/engine/credit/remaining_tokens"))
        .and(query_param("models", "talkative-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"model_tokens": {}})))
        .mount(&server)
        .await;

    let credits = client_for(&server)
        .credits()
        .model_credits("talkative-01")
        .await
        .unwrap();
    assert_eq!(credits, 0);
}

#[tokio::test]
async fn test_models_pair_catalogue_with_credits() {
    let server = MockServer::start().await;
    for (i, id) in DEFAULT_MODEL_IDS.iter().enumerate() {
        let mut tokens = serde_json::Map::new();
        tokens.insert(id.to_string(), json!((i as i64 + 1) * 10));
        Mock::given(method("GET"))
            .and(path("/v1beta1/engine/credit/remaining_tokens"))
            .and(query_param("models", *id))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "model_tokens": tokens })),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let models = client_for(&server).credits().models().await.unwrap();
    assert_eq!(models.len(), DEFAULT_MODEL_IDS.len());
    for (i, model) in models.iter().enumerate() {
        assert_eq!(model.id, DEFAULT_MODEL_IDS[i]);
        assert_eq!(model.credits, (i as i64 + 1) * 10);
        assert!(!model.name.is_empty());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_session_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta1/engine/chat/sessions"))
        .and(body_json(json!({
            "email": "",
            "functionGroup": "g1",
            "preferencesEnabled": false,
            "requestModel": "talkative-01"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"session_id": "s1"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = client_for(&server)
        .sessions()
        .create("g1", SessionOptions::default())
        .await
        .unwrap();
    assert_eq!(session.id(), "s1");
    assert_eq!(session.function_group(), "g1");
}

#[tokio::test]
async fn test_create_session_with_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta1/engine/chat/sessions"))
        .and(body_partial_json(json!({
            "email": "ann@example.com",
            "requestModel": "creative-01"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"session_id": "s2"})))
        .expect(1)
        .mount(&server)
        .await;

    let options = SessionOptions::default()
        .with_email("ann@example.com")
        .with_model("creative-01");
    let session = client_for(&server)
        .sessions()
        .create("g1", options)
        .await
        .unwrap();
    assert_eq!(session.id(), "s2");
}

#[tokio::test]
async fn test_create_session_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta1/engine/chat/sessions"))
        .respond_with(ResponseTemplate::new(403).set_body_string("no access to group"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .sessions()
        .create(GROUP_ID, SessionOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_auth_error());
}
