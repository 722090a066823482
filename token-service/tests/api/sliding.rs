use chrono::Duration;
use token_service::domain::{SlidingTokenResponse, TokenType};

use crate::helpers::{test_config, TestApp, PASSWORD};

#[tokio::test]
async fn sliding_token_lifecycle() {
    let app = TestApp::with_config(test_config().with_auth_token_types(&[TokenType::Sliding])).await;
    let (_, username) = app.create_user().await;

    let response = app.obtain_sliding(&username, PASSWORD).await;
    assert_eq!(response.status().as_u16(), 200);
    let issued = response.json::<SlidingTokenResponse>().await.unwrap();

    let whoami = app.whoami(Some(&format!("Bearer {}", issued.token))).await;
    assert_eq!(whoami.status().as_u16(), 200);

    // t = 4: extend, new exp is t + 5
    app.clock.advance(Duration::seconds(4));
    let response = app.refresh_sliding(&issued.token).await;
    assert_eq!(response.status().as_u16(), 200);
    let extended = response.json::<SlidingTokenResponse>().await.unwrap();

    app.clock.advance(Duration::seconds(4));
    let whoami = app.whoami(Some(&format!("Bearer {}", extended.token))).await;
    assert_eq!(whoami.status().as_u16(), 200);

    // past refresh_exp
    app.clock.advance(Duration::seconds(23));
    let response = app.refresh_sliding(&extended.token).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_return_401_if_not_a_sliding_token() {
    let app = TestApp::new().await;
    let (id, _) = app.create_user().await;
    let pair = app.token_service.issue_pair(&id).await.unwrap();

    let response = app.refresh_sliding(&pair.refresh).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn should_return_401_if_incorrect_credentials() {
    let app = TestApp::new().await;
    let (_, username) = app.create_user().await;

    let response = app.obtain_sliding(&username, "nope").await;
    assert_eq!(response.status().as_u16(), 401);
}
