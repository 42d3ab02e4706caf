use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_register_a_key(ctx: &TestContext) {
    let response = ctx
        .client
        .post_as_admin("/keys", &json!({ "key": "AIzaSyFirstKey" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["message"], "Key saved successfully");
    assert_eq!(body["key"], "AIza****");
    assert_eq!(ctx.keys.usage_of("AIzaSyFirstKey"), Some(0));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_and_duplicate_keys(ctx: &TestContext) {
    let response = ctx.client.post_as_admin("/keys", &json!({})).await.unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Key is required");

    ctx.keys.seed("AIzaSyDuplicate", 0);
    let response = ctx
        .client
        .post_as_admin("/keys", &json!({ "key": "AIzaSyDuplicate" }))
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Key already exists");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_admin_token(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/keys", &json!({ "key": "AIzaSyNoAdmin" }))
        .await
        .unwrap();
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = ctx
        .client
        .request(
            hyper::Method::POST,
            "/keys",
            Some(&json!({ "key": "AIzaSyNoAdmin" })),
            &[("x-admin-token", "wrong")],
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.keys.usage_of("AIzaSyNoAdmin"), None);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_first_available_key(ctx: &TestContext) {
    ctx.keys.seed("AIzaSyExhausted", 16);
    ctx.keys.seed("AIzaSyFresh", 3);
    ctx.keys.seed("AIzaSyLater", 0);

    let response = ctx.client.get_as_admin("/keys").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["usageCount"], 3);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_null_when_pool_is_exhausted(ctx: &TestContext) {
    ctx.keys.seed("AIzaSyExhausted", 16);

    let response = ctx.client.get_as_admin("/keys").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert!(response.data().is_null());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_increment_usage_by_exactly_one(ctx: &TestContext) {
    ctx.keys.seed("AIzaSyCounter", 15);

    let response = ctx
        .client
        .patch_as_admin("/keys", &json!({ "key": "AIzaSyCounter" }))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.data()["usageCount"], 16);

    // Never past the cap
    let response = ctx
        .client
        .patch_as_admin("/keys", &json!({ "key": "AIzaSyCounter" }))
        .await
        .unwrap();
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(ctx.keys.usage_of("AIzaSyCounter"), Some(16));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_for_unknown_key(ctx: &TestContext) {
    let response = ctx
        .client
        .patch_as_admin("/keys", &json!({ "key": "AIzaSyMissing" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Key does not exist");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_never_exceed_cap_under_concurrent_increments(ctx: &TestContext) {
    ctx.keys.seed("AIzaSyRace", 10);

    let requests = (0..20).map(|_| {
        let client = ctx.client.clone();
        async move {
            client
                .patch_as_admin("/keys", &json!({ "key": "AIzaSyRace" }))
                .await
                .unwrap()
                .status
        }
    });
    let statuses = futures::future::join_all(requests).await;

    let succeeded = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let rejected = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();
    assert_eq!(succeeded, 6);
    assert_eq!(rejected, 14);
    assert_eq!(ctx.keys.usage_of("AIzaSyRace"), Some(16));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reset_every_key(ctx: &TestContext) {
    ctx.keys.seed("AIzaSyOne", 16);
    ctx.keys.seed("AIzaSyTwo", 7);

    let response = ctx
        .client
        .post_as_admin("/keys/reset", &json!({}))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.data()["reset"], 2);
    assert_eq!(ctx.keys.usage_of("AIzaSyOne"), Some(0));
    assert_eq!(ctx.keys.usage_of("AIzaSyTwo"), Some(0));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_pool_with_masked_keys(ctx: &TestContext) {
    ctx.keys.seed("AIzaSyOne", 1);
    ctx.keys.seed("AIzaSyTwo", 2);

    let response = ctx.client.get_as_admin("/keys/all").await.unwrap();

    response.assert_status(StatusCode::OK);
    let keys = response.data().as_array().unwrap();
    assert_eq!(keys.len(), 2);
    assert!(keys.iter().all(|k| k["key"] == "AIza****"));
}
