use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use serde_json::{json, Value};
use test_context::test_context;

fn voice_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Bright and upbeat",
        "voiceUrl": format!("https://cdn.example.com/voices/{}.mp3", name),
        "imageUrl": format!("https://cdn.example.com/voices/{}.png", name)
    })
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_add_and_list_voices(ctx: &TestContext) {
    for name in ["Puck", "Kore"] {
        let response = ctx
            .client
            .post_as_admin("/voices", &voice_body(name))
            .await
            .unwrap();
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.data()["name"], name);
    }

    let response = ctx.client.get("/voices").await.unwrap();

    response.assert_status(StatusCode::OK);
    let voices = response.body.as_ref().unwrap().as_array().unwrap().clone();
    let names: Vec<&str> = voices.iter().map(|v| v["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Kore", "Puck"]);
    assert_eq!(voices[0]["voiceUrl"], "https://cdn.example.com/voices/Kore.mp3");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_repeated_reads_from_cache(ctx: &TestContext) {
    for _ in 0..3 {
        ctx.client
            .get("/voices")
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }
    assert_eq!(ctx.voices.list_calls(), 1);

    // Adding a voice invalidates the cached list
    ctx.client
        .post_as_admin("/voices", &voice_body("Fenrir"))
        .await
        .unwrap()
        .assert_status(StatusCode::CREATED);

    let response = ctx.client.get("/voices").await.unwrap();
    assert_eq!(response.body.as_ref().unwrap().as_array().unwrap().len(), 1);
    assert_eq!(ctx.voices.list_calls(), 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_duplicate_voice(ctx: &TestContext) {
    ctx.client
        .post_as_admin("/voices", &voice_body("Puck"))
        .await
        .unwrap()
        .assert_status(StatusCode::CREATED);

    ctx.client
        .post_as_admin("/voices", &voice_body("Puck"))
        .await
        .unwrap()
        .assert_status(StatusCode::CONFLICT)
        .assert_error_message("Voice already exists");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_incomplete_voice(ctx: &TestContext) {
    let mut body = voice_body("Charon");
    body.as_object_mut().unwrap().remove("imageUrl");

    ctx.client
        .post_as_admin("/voices", &body)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("imageUrl is required");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_admin_to_add_voice(ctx: &TestContext) {
    ctx.client
        .post("/voices", &voice_body("Puck"))
        .await
        .unwrap()
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = ctx.client.get("/voices").await.unwrap();
    assert!(response.body.as_ref().unwrap().as_array().unwrap().is_empty());
}
