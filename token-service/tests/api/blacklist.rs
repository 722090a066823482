use crate::helpers::TestApp;

#[tokio::test]
async fn should_revoke_refresh_token() {
    let app = TestApp::new().await;
    let (id, _) = app.create_user().await;
    let pair = app.token_service.issue_pair(&id).await.unwrap();

    let response = app.blacklist(&pair.refresh).await;
    assert_eq!(response.status().as_u16(), 200);

    assert_eq!(app.refresh(&pair.refresh).await.status().as_u16(), 401);
    assert_eq!(app.verify_token(&pair.refresh).await.status().as_u16(), 401);

    // already revoked
    assert_eq!(app.blacklist(&pair.refresh).await.status().as_u16(), 401);
}

#[tokio::test]
async fn should_return_401_for_access_token() {
    let app = TestApp::new().await;
    let (id, _) = app.create_user().await;
    let pair = app.token_service.issue_pair(&id).await.unwrap();

    let response = app.blacklist(&pair.access).await;
    assert_eq!(response.status().as_u16(), 401);
}
