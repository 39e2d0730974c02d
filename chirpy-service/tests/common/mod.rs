use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthConfig;
use auth::Authenticator;
use auth::ManualClock;
use auth::MemoryRefreshTokenStore;
use chirpy_service::domain::chirp::errors::ChirpError;
use chirpy_service::domain::chirp::models::Chirp;
use chirpy_service::domain::chirp::models::ChirpId;
use chirpy_service::domain::chirp::models::ListChirpsQuery;
use chirpy_service::domain::chirp::models::SortOrder;
use chirpy_service::domain::chirp::ports::ChirpRepository;
use chirpy_service::domain::chirp::service::ChirpService;
use chirpy_service::domain::metrics::HitCounter;
use chirpy_service::domain::user::errors::UserError;
use chirpy_service::domain::user::models::User;
use chirpy_service::domain::user::models::UserId;
use chirpy_service::domain::user::ports::UserRepository;
use chirpy_service::domain::user::service::UserService;
use chirpy_service::inbound::http::router::create_router;
use chirpy_service::inbound::http::router::AppState;
use serde_json::json;
use serde_json::Value;
use tokio::sync::RwLock;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

/// Chirps kept in memory, ordered the same way the Postgres query orders them.
#[derive(Default)]
pub struct InMemoryChirpRepository {
    chirps: RwLock<HashMap<ChirpId, Chirp>>,
}

#[async_trait]
impl ChirpRepository for InMemoryChirpRepository {
    async fn create(&self, chirp: Chirp) -> Result<Chirp, ChirpError> {
        self.chirps.write().await.insert(chirp.id, chirp.clone());
        Ok(chirp)
    }

    async fn list(&self, query: &ListChirpsQuery) -> Result<Vec<Chirp>, ChirpError> {
        let mut chirps: Vec<Chirp> = self
            .chirps
            .read()
            .await
            .values()
            .filter(|chirp| query.author.map_or(true, |author| chirp.user_id == author))
            .cloned()
            .collect();

        chirps.sort_by_key(|chirp| chirp.created_at);
        if query.sort == SortOrder::Descending {
            chirps.reverse();
        }

        Ok(chirps)
    }

    async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, ChirpError> {
        Ok(self.chirps.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &ChirpId) -> Result<(), ChirpError> {
        self.chirps
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(ChirpError::NotFound(*id))
    }
}

/// Users kept in memory. Deleting users cascades to their chirps and sessions.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
    chirps: Arc<InMemoryChirpRepository>,
    refresh_tokens: Arc<MemoryRefreshTokenStore>,
}

impl InMemoryUserRepository {
    pub fn new(
        chirps: Arc<InMemoryChirpRepository>,
        refresh_tokens: Arc<MemoryRefreshTokenStore>,
    ) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            chirps,
            refresh_tokens,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(user)
            }
            None => Err(UserError::NotFound(user.id.to_string())),
        }
    }

    async fn set_chirpy_red(&self, id: &UserId) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or(UserError::NotFound(id.to_string()))?;
        user.is_chirpy_red = true;
        user.updated_at = chrono::Utc::now();
        Ok(user.clone())
    }

    async fn delete_all(&self) -> Result<(), UserError> {
        self.users.write().await.clear();
        self.chirps.chirps.write().await.clear();
        self.refresh_tokens.clear().await;
        Ok(())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub clock: Arc<ManualClock>,
    pub refresh_tokens: Arc<MemoryRefreshTokenStore>,
}

impl TestApp {
    /// Spawn the application on the development platform
    pub async fn spawn() -> Self {
        Self::spawn_on_platform("dev").await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_on_platform(platform: &str) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let clock = Arc::new(ManualClock::default());
        let refresh_tokens = Arc::new(MemoryRefreshTokenStore::new());
        let chirps = Arc::new(InMemoryChirpRepository::default());
        let users = Arc::new(InMemoryUserRepository::new(
            Arc::clone(&chirps),
            Arc::clone(&refresh_tokens),
        ));

        let authenticator = Arc::new(Authenticator::new(
            AuthConfig::new(JWT_SECRET, POLKA_KEY),
            refresh_tokens.clone(),
            clock.clone(),
        ));

        let state = AppState {
            user_service: Arc::new(UserService::new(users)),
            chirp_service: Arc::new(ChirpService::new(chirps)),
            authenticator,
            hits: Arc::new(HitCounter::new()),
            platform: platform.to_string(),
        };

        let static_root = concat!(env!("CARGO_MANIFEST_DIR"), "/static");
        let router = create_router(state, static_root);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            clock,
            refresh_tokens,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return the response `data`
    pub async fn create_user(&self, email: &str, password: &str) -> Value {
        let response = self
            .post("/api/users")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Log in and return the response `data` (user, token, refresh_token)
    pub async fn login(&self, email: &str, password: &str) -> Value {
        let response = self
            .post("/api/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Post a chirp and return the raw response
    pub async fn create_chirp(&self, token: &str, body: &str) -> reqwest::Response {
        self.post_authenticated("/api/chirps", token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
