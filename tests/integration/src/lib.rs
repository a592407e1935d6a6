//! In-process Shelfdesk backend stub for end-to-end tests.
//!
//! [`TestEnv`] serves the users, books and auth endpoints over real HTTP on an
//! ephemeral port, and hands out client processes wired to it.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use sd_client::{
    ApiClient, ClientConfig, DurableStorage, HttpTransport, Navigator, NoticeLevel, Notifier,
    Redirect, SessionStore,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Password accepted for every seeded account.
pub const PASSWORD: &str = "secret";

#[derive(Debug, Clone)]
struct Account {
    id: u64,
    username: String,
    email: String,
    password: String,
    role: String,
}

impl Account {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "username": self.username,
            "email": self.email,
            "role": self.role,
        })
    }
}

/// In-memory users and books backend speaking the Shelfdesk REST API.
#[derive(Default)]
pub struct Backend {
    accounts: Mutex<Vec<Account>>,
    books: Mutex<Vec<Value>>,
    tokens: Mutex<HashMap<String, u64>>,
    login_delays: Mutex<HashMap<String, Duration>>,
    forced_status: Mutex<HashMap<String, u16>>,
    next_id: AtomicU64,
    next_token: AtomicU64,
}

impl Backend {
    fn seeded() -> Self {
        let backend = Self {
            next_id: AtomicU64::new(1),
            next_token: AtomicU64::new(1),
            ..Self::default()
        };
        backend.add_account("a", "a@b.com", PASSWORD, "admin");
        backend.add_account("c", "c@d.com", PASSWORD, "user");
        backend
            .books
            .lock()
            .push(json!({"id": 100, "title": "Dune", "author": "Frank Herbert", "isbn": "9780441013593"}));
        backend
    }

    fn add_account(&self, username: &str, email: &str, password: &str, role: &str) -> Account {
        let account = Account {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        };
        self.accounts.lock().push(account.clone());
        account
    }

    /// Invalidates every issued token, as a server-side expiry would.
    pub fn revoke_all(&self) {
        self.tokens.lock().clear();
    }

    /// Delays login responses for `email`.
    pub fn delay_login(&self, email: &str, delay: Duration) {
        self.login_delays.lock().insert(email.to_string(), delay);
    }

    /// Answers every request to `path` (below `/api`) with `status`.
    pub fn force_status(&self, path: &str, status: u16) {
        self.forced_status.lock().insert(path.to_string(), status);
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<Account, Response> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        let user_id = token.and_then(|t| self.tokens.lock().get(t).copied());

        user_id
            .and_then(|id| self.accounts.lock().iter().find(|a| a.id == id).cloned())
            .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "invalid or expired token"))
    }

    fn forced(&self, path: &str) -> Option<Response> {
        let status = *self.forced_status.lock().get(path)?;
        let status = StatusCode::from_u16(status).ok()?;
        Some(error(status, "forced failure"))
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

type Shared = State<Arc<Backend>>;

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn health(State(backend): Shared) -> Response {
    if let Some(forced) = backend.forced("/health") {
        return forced;
    }
    Json(json!({"status": "ok"})).into_response()
}

async fn login(State(backend): Shared, Json(body): Json<LoginBody>) -> Response {
    if let Some(forced) = backend.forced("/auth/login") {
        return forced;
    }
    let delay = backend.login_delays.lock().get(&body.email).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let account = backend
        .accounts
        .lock()
        .iter()
        .find(|a| a.email == body.email && a.password == body.password)
        .cloned();
    let Some(account) = account else {
        return error(StatusCode::UNAUTHORIZED, "invalid email or password");
    };

    let token = format!("tok-{}", backend.next_token.fetch_add(1, Ordering::SeqCst));
    backend.tokens.lock().insert(token.clone(), account.id);
    Json(json!({"token": token, "user": account.to_json()})).into_response()
}

#[derive(Deserialize)]
struct RegisterBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn register(State(backend): Shared, Json(body): Json<RegisterBody>) -> Response {
    if let Some(forced) = backend.forced("/auth/register") {
        return forced;
    }
    if body.username.is_empty() || body.email.is_empty() || body.password.len() < 6 {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "username, email and a 6+ character password are required",
        );
    }
    if backend.accounts.lock().iter().any(|a| a.email == body.email) {
        return error(StatusCode::CONFLICT, "email already exists");
    }

    backend.add_account(&body.username, &body.email, &body.password, "user");
    (StatusCode::CREATED, Json(json!({"message": "registered"}))).into_response()
}

async fn me(State(backend): Shared, headers: HeaderMap) -> Response {
    if let Some(forced) = backend.forced("/users/me") {
        return forced;
    }
    match backend.authorize(&headers) {
        Ok(account) => Json(account.to_json()).into_response(),
        Err(rejection) => rejection,
    }
}

#[derive(Deserialize)]
struct ProfileBody {
    username: Option<String>,
    email: Option<String>,
}

async fn update_me(
    State(backend): Shared,
    headers: HeaderMap,
    Json(body): Json<ProfileBody>,
) -> Response {
    let account = match backend.authorize(&headers) {
        Ok(account) => account,
        Err(rejection) => return rejection,
    };
    let mut accounts = backend.accounts.lock();
    let Some(stored) = accounts.iter_mut().find(|a| a.id == account.id) else {
        return error(StatusCode::NOT_FOUND, "user not found");
    };
    if let Some(username) = body.username {
        stored.username = username;
    }
    if let Some(email) = body.email {
        stored.email = email;
    }
    Json(stored.to_json()).into_response()
}

async fn list_users(
    State(backend): Shared,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(forced) = backend.forced("/users") {
        return forced;
    }
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    let keyword = params.get("keyword").cloned().unwrap_or_default();
    let matching: Vec<Value> = backend
        .accounts
        .lock()
        .iter()
        .filter(|a| a.username.contains(&keyword) || a.email.contains(&keyword))
        .map(Account::to_json)
        .collect();
    Json(json!({"total": matching.len(), "items": matching})).into_response()
}

async fn get_user(State(backend): Shared, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    match backend.accounts.lock().iter().find(|a| a.id == id) {
        Some(account) => Json(account.to_json()).into_response(),
        None => error(StatusCode::NOT_FOUND, "user not found"),
    }
}

async fn delete_user(State(backend): Shared, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    let mut accounts = backend.accounts.lock();
    let before = accounts.len();
    accounts.retain(|a| a.id != id);
    if accounts.len() == before {
        return error(StatusCode::NOT_FOUND, "user not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_books(
    State(backend): Shared,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(forced) = backend.forced("/books") {
        return forced;
    }
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    let field_matches = |book: &Value, key: &str| match params.get(key) {
        Some(wanted) => book[key].as_str().is_some_and(|v| v.contains(wanted.as_str())),
        None => true,
    };
    let matching: Vec<Value> = backend
        .books
        .lock()
        .iter()
        .filter(|b| field_matches(b, "title") && field_matches(b, "author"))
        .cloned()
        .collect();
    Json(json!({"total": matching.len(), "items": matching})).into_response()
}

#[derive(Deserialize)]
struct BookBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    isbn: String,
}

async fn create_book(
    State(backend): Shared,
    headers: HeaderMap,
    Json(body): Json<BookBody>,
) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    if body.title.is_empty() || body.author.is_empty() || body.isbn.is_empty() {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "title, author and isbn are required");
    }
    let mut books = backend.books.lock();
    if books.iter().any(|b| b["isbn"] == body.isbn.as_str()) {
        return error(StatusCode::CONFLICT, "isbn already exists");
    }
    let id = backend.next_id.fetch_add(1, Ordering::SeqCst) + 1000;
    let book = json!({"id": id, "title": body.title, "author": body.author, "isbn": body.isbn});
    books.push(book.clone());
    (StatusCode::CREATED, Json(book)).into_response()
}

async fn get_book(State(backend): Shared, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    match backend.books.lock().iter().find(|b| b["id"] == id) {
        Some(book) => Json(book.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "book not found"),
    }
}

async fn update_book(
    State(backend): Shared,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<BookBody>,
) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    if body.title.is_empty() || body.author.is_empty() || body.isbn.is_empty() {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "title, author and isbn are required");
    }
    let mut books = backend.books.lock();
    let Some(book) = books.iter_mut().find(|b| b["id"] == id) else {
        return error(StatusCode::NOT_FOUND, "book not found");
    };
    *book = json!({"id": id, "title": body.title, "author": body.author, "isbn": body.isbn});
    Json(book.clone()).into_response()
}

async fn delete_book(State(backend): Shared, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    let mut books = backend.books.lock();
    let before = books.len();
    books.retain(|b| b["id"] != id);
    if books.len() == before {
        return error(StatusCode::NOT_FOUND, "book not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn book_by_isbn(
    State(backend): Shared,
    headers: HeaderMap,
    Path(isbn): Path<String>,
) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    match backend.books.lock().iter().find(|b| b["isbn"] == isbn.as_str()) {
        Some(book) => Json(book.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "book not found"),
    }
}

fn router(backend: Arc<Backend>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/users", get(list_users))
        .route("/api/users/me", get(me).put(update_me))
        .route("/api/users/{id}", get(get_user).delete(delete_user))
        .route("/api/books", get(list_books).post(create_book))
        .route("/api/books/{id}", get(get_book).put(update_book).delete(delete_book))
        .route("/api/books/isbn/{isbn}", get(book_by_isbn))
        .with_state(backend)
}

/// Records notices.
#[derive(Default)]
pub struct Notices(Mutex<Vec<(NoticeLevel, String)>>);

impl Notices {
    /// Every notice so far.
    pub fn all(&self) -> Vec<(NoticeLevel, String)> {
        self.0.lock().clone()
    }

    /// Error notices so far.
    pub fn errors(&self) -> Vec<String> {
        self.0
            .lock()
            .iter()
            .filter(|(level, _)| *level == NoticeLevel::Error)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Notifier for Notices {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.0.lock().push((level, message.to_string()));
    }
}

/// Records navigations.
#[derive(Default)]
pub struct Navigations(Mutex<Vec<Redirect>>);

impl Navigations {
    /// Every navigation so far.
    pub fn all(&self) -> Vec<Redirect> {
        self.0.lock().clone()
    }
}

impl Navigator for Navigations {
    fn navigate(&self, redirect: &Redirect) {
        self.0.lock().push(redirect.clone());
    }
}

/// A client process: session store and API client over real HTTP.
pub struct Client {
    /// Session store.
    pub session: Arc<SessionStore>,
    /// API client.
    pub api: ApiClient,
    /// Recorded notices.
    pub notices: Arc<Notices>,
    /// Recorded navigations.
    pub navigations: Arc<Navigations>,
}

/// Test environment running the backend stub on an ephemeral port.
pub struct TestEnv {
    /// Backend state, for arranging and inspecting.
    pub backend: Arc<Backend>,
    /// Base URL of the running backend, including `/api`.
    pub base_url: String,
    /// Server shutdown signal.
    _shutdown_tx: oneshot::Sender<()>,
}

impl TestEnv {
    /// Starts a seeded backend.
    pub async fn new() -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("sd_client=debug")
            .with_test_writer()
            .try_init();

        let backend = Arc::new(Backend::seeded());
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router(Arc::clone(&backend));

        let (_shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown).await {
                tracing::error!("Server error: {}", e);
            }
        });

        Ok(Self {
            backend,
            base_url: format!("http://{addr}/api"),
            _shutdown_tx,
        })
    }

    /// Starts a client process over `storage`.
    pub fn client(&self, storage: Arc<dyn DurableStorage>) -> anyhow::Result<Client> {
        connect(&self.base_url, storage)
    }
}

/// Starts a client process for the backend at `base_url`.
pub fn connect(base_url: &str, storage: Arc<dyn DurableStorage>) -> anyhow::Result<Client> {
    let notices = Arc::new(Notices::default());
    let navigations = Arc::new(Navigations::default());
    let session = Arc::new(SessionStore::new(
        storage,
        notices.clone(),
        navigations.clone(),
    ));
    let transport = HttpTransport::new(
        &ClientConfig::new(base_url).with_timeout(Duration::from_secs(5)),
    )?;
    let api = ApiClient::new(Arc::new(transport), Arc::clone(&session));

    Ok(Client {
        session,
        api,
        notices,
        navigations,
    })
}

/// Tokens the backend currently accepts.
pub fn live_tokens(backend: &Backend) -> HashSet<String> {
    backend.tokens.lock().keys().cloned().collect()
}
