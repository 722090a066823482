use chrono::Duration;
use token_service::domain::{RefreshedTokens, TokenPair};

use crate::helpers::{test_config, TestApp, PASSWORD};

async fn login(app: &TestApp) -> TokenPair {
    let (_, username) = app.create_user().await;
    app.obtain_pair(&username, PASSWORD)
        .await
        .json::<TokenPair>()
        .await
        .expect("Could not deserialize response body to TokenPair")
}

#[tokio::test]
async fn should_return_200_with_new_access_token() {
    let app = TestApp::new().await;
    let pair = login(&app).await;

    app.clock.advance(Duration::seconds(120));
    let expired = app.whoami(Some(&format!("Bearer {}", pair.access))).await;
    assert_eq!(expired.status().as_u16(), 401);

    let response = app.refresh(&pair.refresh).await;
    assert_eq!(response.status().as_u16(), 200);

    let refreshed = response.json::<RefreshedTokens>().await.unwrap();
    assert!(refreshed.refresh.is_none());

    let whoami = app
        .whoami(Some(&format!("Bearer {}", refreshed.access)))
        .await;
    assert_eq!(whoami.status().as_u16(), 200);
}

#[tokio::test]
async fn should_rotate_and_reject_replay() {
    let app = TestApp::with_config(test_config().with_rotation(true, true)).await;
    let pair = login(&app).await;

    let response = app.refresh(&pair.refresh).await;
    assert_eq!(response.status().as_u16(), 200);
    let refreshed = response.json::<RefreshedTokens>().await.unwrap();
    let next = refreshed.refresh.expect("rotated refresh token");

    let replay = app.refresh(&pair.refresh).await;
    assert_eq!(replay.status().as_u16(), 401);

    let response = app.refresh(&next).await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn should_return_401_for_access_token() {
    let app = TestApp::new().await;
    let pair = login(&app).await;

    let response = app.refresh(&pair.access).await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(
        response.text().await.unwrap(),
        "Token is invalid or expired"
    );
}

#[tokio::test]
async fn should_return_401_if_invalid_token() {
    let app = TestApp::new().await;

    let response = app.refresh("invalid.token.here").await;
    assert_eq!(response.status().as_u16(), 401);
}
