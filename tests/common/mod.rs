#![allow(dead_code)]

use axum::Router;
use axum::extract::connect_info::MockConnectInfo;
use snaplink::api::routes::api_routes;
use snaplink::domain::entities::NewVisit;
use snaplink::domain::repositories::LinkRepository;
use snaplink::domain::visit_worker::AnalyticsRecorder;
use snaplink::infrastructure::cache::NullCache;
use snaplink::infrastructure::persistence::SqliteLinkRepository;
use snaplink::state::{AppSettings, AppState};
use snaplink::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "http://sho.rt";
pub const CLIENT_ADDR: &str = "127.0.0.1:12345";

/// Opens a migrated in-memory SQLite database.
///
/// The pool keeps a single connection forever, since every new connection to
/// `:memory:` would see an empty database.
pub async fn test_pool() -> Arc<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::migrate!("./migrations/sqlite")
        .run(&pool)
        .await
        .unwrap();

    Arc::new(pool)
}

pub async fn test_repository() -> Arc<SqliteLinkRepository> {
    Arc::new(SqliteLinkRepository::new(test_pool().await))
}

/// Hands out the queued codes in order, then repeats the last one.
pub struct SequenceCodeGenerator {
    codes: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl SequenceCodeGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            last: Mutex::new(codes.last().unwrap().to_string()),
        }
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> String {
        match self.codes.lock().unwrap().pop_front() {
            Some(code) => {
                *self.last.lock().unwrap() = code.clone();
                code
            }
            None => self.last.lock().unwrap().clone(),
        }
    }
}

pub fn default_settings() -> AppSettings {
    AppSettings {
        base_url: BASE_URL.to_string(),
        max_generation_attempts: 5,
        redirect_permanent: false,
    }
}

pub fn create_test_state_with(
    repository: Arc<dyn LinkRepository>,
    generator: Arc<dyn CodeGenerator>,
    settings: AppSettings,
) -> (AppState, mpsc::Receiver<NewVisit>) {
    let (recorder, rx) = AnalyticsRecorder::channel(100);

    let state = AppState::new(
        repository,
        generator,
        Arc::new(NullCache::new()),
        recorder,
        settings,
    );

    (state, rx)
}

pub fn create_test_state(
    repository: Arc<dyn LinkRepository>,
) -> (AppState, mpsc::Receiver<NewVisit>) {
    create_test_state_with(
        repository,
        Arc::new(RandomCodeGenerator::default()),
        default_settings(),
    )
}

/// Full router with a fixed peer address, as the server would build it.
pub fn test_app(state: AppState) -> Router {
    let addr: SocketAddr = CLIENT_ADDR.parse().unwrap();

    api_routes()
        .with_state(state)
        .layer(MockConnectInfo(addr))
}

/// Polls `check` until it returns true or two seconds pass.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
