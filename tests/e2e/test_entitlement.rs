use crate::e2e::helpers;

use bootcaster::domain::entitlement::Plan;
use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_register_new_users_on_base_plan(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/newUser", &json!({ "email": "Fresh@Example.com" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["email"], "fresh@example.com");
    assert_eq!(body["plan"], "base");
    assert_eq!(body["allowedCasts"], 3);
    assert_eq!(body["usedCasts"], 0);
    assert_eq!(body["canCompile"], true);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_reset_an_existing_user(ctx: &TestContext) {
    ctx.entitlements.seed("regular@example.com", Plan::Pro, 7, 10);

    let response = ctx
        .client
        .post("/newUser", &json!({ "email": "regular@example.com" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["plan"], "pro");
    assert_eq!(body["usedCasts"], 7);
    assert_eq!(body["allowedCasts"], 10);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_or_malformed_email(ctx: &TestContext) {
    ctx.client
        .post("/newUser", &json!({}))
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Email is required");

    ctx.client
        .post("/newUser", &json!({ "email": "not-an-email" }))
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_look_up_entitlement_by_email(ctx: &TestContext) {
    ctx.entitlements.seed("lookup@example.com", Plan::Base, 1, 3);

    let response = ctx
        .client
        .get("/newUser?email=lookup%40example.com")
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["email"], "lookup@example.com");
    assert_eq!(body["usedCasts"], 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_null_for_unknown_email(ctx: &TestContext) {
    let response = ctx
        .client
        .get("/newUser?email=ghost%40example.com")
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert!(response.body.as_ref().unwrap().is_null());
}
