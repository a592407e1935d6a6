//! Resource clients over HTTP.

use std::sync::Arc;

use sd_client::MemoryStorage;
use sd_integration_tests::{TestEnv, PASSWORD};
use sd_model::{
    BookQuery, CreateBookRequest, LoginRequest, UpdateBookRequest, UpdateProfileRequest, UserQuery,
};

#[tokio::test]
async fn book_lifecycle() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let client = env.client(Arc::new(MemoryStorage::new()))?;
    client
        .session
        .login(&client.api, &LoginRequest::new("a@b.com", PASSWORD))
        .await?;
    let books = client.api.books();

    let created = books
        .create(&CreateBookRequest {
            title: "The Dispossessed".to_string(),
            author: "Ursula K. Le Guin".to_string(),
            isbn: "9780061054884".to_string(),
        })
        .await?;

    let by_isbn = books.by_isbn("9780061054884").await?;
    assert_eq!(by_isbn.id, created.id);

    let filtered = books
        .list(&BookQuery {
            author: Some("Le Guin".to_string()),
            ..BookQuery::default()
        })
        .await?;
    assert_eq!(filtered.total, 1);

    let updated = books
        .update(
            created.id,
            UpdateBookRequest {
                title: Some("The Dispossessed: An Ambiguous Utopia".to_string()),
                ..UpdateBookRequest::default()
            },
        )
        .await?;
    assert_eq!(updated.author, "Ursula K. Le Guin");

    books.delete(created.id).await?;
    let gone = books.get(created.id).await.unwrap_err();
    assert_eq!(gone.api().and_then(sd_client::ApiError::status), Some(404));
    assert!(client.session.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn profile_update_is_persisted_in_session() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let storage = Arc::new(MemoryStorage::new());
    let client = env.client(storage.clone())?;
    client
        .session
        .login(&client.api, &LoginRequest::new("a@b.com", PASSWORD))
        .await?;

    client
        .api
        .users()
        .update_me(&UpdateProfileRequest {
            username: Some("alice".to_string()),
            email: None,
        })
        .await?;

    let restarted = env.client(storage)?;
    restarted.session.check_auth();
    assert_eq!(
        restarted.session.user().map(|u| u.username),
        Some("alice".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn user_listing_filters_by_keyword() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let client = env.client(Arc::new(MemoryStorage::new()))?;
    client
        .session
        .login(&client.api, &LoginRequest::new("a@b.com", PASSWORD))
        .await?;

    let page = client
        .api
        .users()
        .list(&UserQuery {
            keyword: Some("c@d".to_string()),
            ..UserQuery::default()
        })
        .await?;

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].email, "c@d.com");
    Ok(())
}
