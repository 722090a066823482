use chrono::Duration;

use crate::helpers::TestApp;

#[tokio::test]
async fn should_return_200_valid_token() {
    let app = TestApp::new().await;
    let (id, _) = app.create_user().await;
    let pair = app
        .token_service
        .issue_pair(&id)
        .await
        .expect("Failed to issue pair");

    for token in [&pair.access, &pair.refresh] {
        let response = app.verify_token(token).await;
        assert_eq!(response.status().as_u16(), 200);
    }
}

#[tokio::test]
async fn should_return_401_if_invalid_token() {
    let app = TestApp::new().await;

    let response = app.verify_token("invalid.token.here").await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_return_401_if_expired() {
    let app = TestApp::new().await;
    let (id, _) = app.create_user().await;
    let pair = app.token_service.issue_pair(&id).await.unwrap();

    app.clock.advance(Duration::seconds(60));
    let response = app.verify_token(&pair.access).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_return_422_if_malformed_input() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .post(&format!("{}/token/verify", &app.address))
        .json(&serde_json::json!({ "jwt": "x" }))
        .send()
        .await
        .expect("Failed to execute verify token request.");

    assert_eq!(response.status().as_u16(), 422);
}
