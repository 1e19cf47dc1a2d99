#![allow(dead_code)]

use axum_test::TestServer;
use clickr::application::services::{LinkService, RedirectService};
use clickr::domain::click_event::ClickEvent;
use clickr::domain::click_worker::run_click_worker;
use clickr::domain::entities::NewLink;
use clickr::domain::repositories::LinkRepository;
use clickr::infrastructure::persistence::InMemoryLinkRepository;
use clickr::routes::app_router;
use clickr::state::AppState;
use clickr::utils::code_codec::encode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const TEST_BASE_URL: &str = "https://s.example.com";

/// State backed by in-memory storage, with the click receiver handed back
/// to the caller instead of a worker.
pub fn create_test_state(
    queue_capacity: usize,
) -> (
    AppState,
    Arc<InMemoryLinkRepository>,
    mpsc::Receiver<ClickEvent>,
) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let (tx, rx) = mpsc::channel(queue_capacity);

    let link_service = Arc::new(LinkService::new(repo.clone(), repo.clone(), TEST_BASE_URL));
    let redirect_service = Arc::new(RedirectService::new(repo.clone(), tx));

    (AppState::new(link_service, redirect_service), repo, rx)
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(app_router(state)).unwrap()
}

/// Full application with a running click worker.
pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<InMemoryLinkRepository>,
    pub worker: JoinHandle<()>,
}

pub fn spawn_app() -> TestApp {
    let (state, repo, rx) = create_test_state(100);
    let worker = tokio::spawn(run_click_worker(rx, repo.clone(), 4));

    TestApp {
        server: create_test_server(state),
        repo,
        worker,
    }
}

/// Stores a link directly, bypassing the HTTP layer.
pub async fn create_test_link(repo: &InMemoryLinkRepository, id: i64, url: &str) -> String {
    let code = encode(id as u64);
    repo.create(NewLink {
        id,
        code: code.clone(),
        long_url: url.to_string(),
    })
    .await
    .unwrap();
    code
}

/// Polls until the link's click count reaches `expected` or a second passes.
pub async fn wait_for_clicks(repo: &InMemoryLinkRepository, code: &str, expected: i64) -> i64 {
    let mut clicks = 0;
    for _ in 0..100 {
        clicks = repo.find_by_code(code).await.unwrap().unwrap().clicks;
        if clicks >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    clicks
}
