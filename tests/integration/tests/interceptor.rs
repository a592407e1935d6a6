//! Failure classification and forced logout over HTTP.

use std::sync::Arc;

use sd_client::{ApiError, MemoryStorage};
use sd_integration_tests::{connect, TestEnv, PASSWORD};
use sd_model::{BookQuery, LoginRequest};

async fn logged_in(env: &TestEnv) -> anyhow::Result<sd_integration_tests::Client> {
    let client = env.client(Arc::new(MemoryStorage::new()))?;
    client
        .session
        .login(&client.api, &LoginRequest::new("a@b.com", PASSWORD))
        .await?;
    Ok(client)
}

#[tokio::test]
async fn expired_token_forces_single_logout() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let client = logged_in(&env).await?;
    env.backend.revoke_all();

    let query = BookQuery::default();
    let users = client.api.users();
    let books = client.api.books();
    let (a, b, c) = tokio::join!(users.me(), books.list(&query), books.get(100));

    for result in [a.map(|_| ()), b.map(|_| ()), c.map(|_| ())] {
        assert!(result.unwrap_err().is_auth_expired());
    }
    assert!(!client.session.is_authenticated());
    let navigations = client.navigations.all();
    assert_eq!(navigations.len(), 1);
    assert!(navigations[0].is_login());
    assert_eq!(
        client
            .notices
            .errors()
            .iter()
            .filter(|m| m.contains("session has expired"))
            .count(),
        1
    );
    Ok(())
}

#[tokio::test]
async fn informational_failures_keep_the_session() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let client = logged_in(&env).await?;

    for (status, expected) in [
        (403, ApiError::Forbidden),
        (404, ApiError::NotFound),
        (422, ApiError::Validation { message: "forced failure".to_string() }),
        (500, ApiError::Server),
        (409, ApiError::Unknown { status: 409, message: "forced failure".to_string() }),
    ] {
        env.backend.force_status("/users/me", status);

        let err = client.api.users().me().await.unwrap_err();

        assert_eq!(err.api(), Some(&expected));
        assert!(client.session.is_authenticated(), "status {status}");
    }
    assert!(client.navigations.all().is_empty());
    Ok(())
}

#[tokio::test]
async fn validation_message_is_shown_verbatim() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let client = logged_in(&env).await?;

    let err = client
        .api
        .books()
        .create(&sd_model::CreateBookRequest {
            title: "Untitled".to_string(),
            author: String::new(),
            isbn: "1".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.api().map(ApiError::message), Some("title, author and isbn are required"));
    assert_eq!(
        client.notices.errors().last().map(String::as_str),
        Some("title, author and isbn are required")
    );
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_network_failure() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let client = logged_in(&env).await?;
    let offline = connect("http://127.0.0.1:9/api", Arc::new(MemoryStorage::new()))?;

    let err = offline.api.health().await.unwrap_err();

    assert!(matches!(err.api(), Some(ApiError::Network { .. })));
    assert!(offline.navigations.all().is_empty());
    assert!(client.api.health().await.is_ok());
    Ok(())
}
