use token_service::domain::TokenPair;

use crate::helpers::{get_random_username, TestApp, PASSWORD};

#[tokio::test]
async fn should_return_200_with_token_pair() {
    let app = TestApp::new().await;
    let (_, username) = app.create_user().await;

    let response = app.obtain_pair(&username, PASSWORD).await;
    assert_eq!(response.status().as_u16(), 200);

    let pair = response
        .json::<TokenPair>()
        .await
        .expect("Could not deserialize response body to TokenPair");
    assert_eq!(pair.access.split('.').count(), 3);
    assert_eq!(pair.refresh.split('.').count(), 3);
    assert_ne!(pair.access, pair.refresh);
}

#[tokio::test]
async fn should_return_401_if_incorrect_credentials() {
    let app = TestApp::new().await;
    let (_, username) = app.create_user().await;

    let test_cases = [
        (username.clone(), "wrong password".to_string()),
        (get_random_username(), PASSWORD.to_string()),
    ];

    for (username, password) in test_cases.iter() {
        let response = app.obtain_pair(username, password).await;
        assert_eq!(
            response.status().as_u16(),
            401,
            "Failed for input: {:?}",
            username
        );
    }
}

#[tokio::test]
async fn should_return_401_if_account_inactive() {
    let app = TestApp::new().await;
    let (id, username) = app.create_user().await;
    app.identity_store.set_active(&id, false).await.unwrap();

    let response = app.obtain_pair(&username, PASSWORD).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_return_422_if_malformed_input() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .post(&format!("{}/token", &app.address))
        .json(&serde_json::json!({ "username": "only-a-username" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 422);
}
