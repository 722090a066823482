use reqwest::header::WWW_AUTHENTICATE;
use token_service::domain::WhoAmIResponse;

use crate::helpers::TestApp;

#[tokio::test]
async fn should_return_identity_for_valid_token() {
    let app = TestApp::new().await;
    let (id, username) = app.create_user().await;
    let pair = app.token_service.issue_pair(&id).await.unwrap();

    let response = app.whoami(Some(&format!("Bearer {}", pair.access))).await;
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<WhoAmIResponse>().await.unwrap();
    assert_eq!(body.user_id, id);
    assert_eq!(body.username, username);
}

#[tokio::test]
async fn should_challenge_without_credentials() {
    let app = TestApp::new().await;

    let response = app.whoami(None).await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(
        response.headers().get(WWW_AUTHENTICATE).unwrap(),
        "Bearer realm=\"api\""
    );
}

#[tokio::test]
async fn should_give_the_same_answer_for_every_rejection() {
    let app = TestApp::new().await;
    let (id, _) = app.create_user().await;
    let pair = app.token_service.issue_pair(&id).await.unwrap();

    let bad_headers = [
        "Bearer invalid.token.here".to_string(),
        format!("Bearer {}", pair.refresh),
        format!("Basic {}", pair.access),
    ];

    let mut bodies = Vec::new();
    for header in bad_headers.iter() {
        let response = app.whoami(Some(header)).await;
        assert_eq!(response.status().as_u16(), 401, "header {}", header);
        bodies.push(response.text().await.unwrap());
    }
    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn should_return_401_for_removed_user() {
    let app = TestApp::new().await;
    let (id, _) = app.create_user().await;
    let pair = app.token_service.issue_pair(&id).await.unwrap();
    app.identity_store.remove_identity(&id).await.unwrap();

    let response = app.whoami(Some(&format!("Bearer {}", pair.access))).await;
    assert_eq!(response.status().as_u16(), 401);
}
