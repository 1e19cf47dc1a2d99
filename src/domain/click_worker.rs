//! Background worker applying click events to storage.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, info};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Consumes click events until the channel closes.
///
/// Each event is recorded on its own task, with at most `concurrency`
/// recordings in flight. Outcomes are logged and counted only: a failed
/// recording is never retried and never reaches the request that produced it.
///
/// When every sender is dropped the worker stops accepting events, waits for
/// the in-flight recordings, and returns.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    link_repository: Arc<dyn LinkRepository>,
    concurrency: usize,
) {
    let concurrency = concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let repository = link_repository.clone();

        tokio::spawn(async move {
            record(repository.as_ref(), &event).await;
            drop(repository);
            drop(permit);
        });
    }

    let _ = permits.acquire_many(concurrency as u32).await;
    info!("Click worker stopped");
}

async fn record(repository: &dyn LinkRepository, event: &ClickEvent) {
    match repository
        .record_click(&event.code, event.clicked_at)
        .await
    {
        Ok(()) => {
            counter!("clicks_recorded_total").increment(1);
            debug!(code = %event.code, "Click recorded");
        }
        Err(e) => {
            counter!("clicks_record_failed_total").increment(1);
            error!(code = %event.code, error = %e, "Failed to record click");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewLink;
    use crate::domain::repositories::MockLinkRepository;
    use crate::error::AppError;
    use crate::infrastructure::persistence::InMemoryLinkRepository;
    use serde_json::json;

    async fn seeded_repository(code: &str) -> Arc<InMemoryLinkRepository> {
        let repository = Arc::new(InMemoryLinkRepository::new());
        repository
            .create(NewLink {
                id: 1,
                code: code.to_string(),
                long_url: "https://example.com".to_string(),
            })
            .await
            .unwrap();
        repository
    }

    #[tokio::test]
    async fn test_worker_applies_every_event() {
        let repository = seeded_repository("1").await;
        let (tx, rx) = mpsc::channel(16);
        let worker = tokio::spawn(run_click_worker(rx, repository.clone(), 4));

        for _ in 0..10 {
            tx.send(ClickEvent::new("1")).await.unwrap();
        }
        drop(tx);
        worker.await.unwrap();

        let link = repository.find_by_code("1").await.unwrap().unwrap();
        assert_eq!(link.clicks, 10);
        assert!(link.last_clicked_at.is_some());
    }

    #[tokio::test]
    async fn test_worker_keeps_latest_click_time() {
        let repository = seeded_repository("1").await;
        let (tx, rx) = mpsc::channel(16);
        let worker = tokio::spawn(run_click_worker(rx, repository.clone(), 2));

        let newer = chrono::Utc::now();
        let older = newer - chrono::Duration::seconds(30);
        tx.send(ClickEvent::at("1", newer)).await.unwrap();
        tx.send(ClickEvent::at("1", older)).await.unwrap();
        drop(tx);
        worker.await.unwrap();

        let link = repository.find_by_code("1").await.unwrap().unwrap();
        assert_eq!(link.clicks, 2);
        assert_eq!(link.last_clicked_at, Some(newer));
    }

    #[tokio::test]
    async fn test_worker_survives_storage_failures() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_record_click()
            .times(3)
            .returning(|_, _| Err(AppError::persistence("Database error", json!({}))));

        let (tx, rx) = mpsc::channel(16);
        let worker = tokio::spawn(run_click_worker(rx, Arc::new(mock_repo), 1));

        for code in ["a", "b", "c"] {
            tx.send(ClickEvent::new(code)).await.unwrap();
        }
        drop(tx);

        assert!(worker.await.is_ok());
    }

    #[tokio::test]
    async fn test_worker_stops_when_channel_closes() {
        let repository = Arc::new(InMemoryLinkRepository::new());
        let (tx, rx) = mpsc::channel::<ClickEvent>(1);
        drop(tx);

        tokio::time::timeout(
            std::time::Duration::from_secs(1),
            run_click_worker(rx, repository, 0),
        )
        .await
        .expect("worker should return once the channel is closed");
    }

    #[tokio::test]
    async fn test_worker_ignores_unknown_codes() {
        let repository = seeded_repository("1").await;
        let (tx, rx) = mpsc::channel(4);
        let worker = tokio::spawn(run_click_worker(rx, repository.clone(), 1));

        tx.send(ClickEvent::new("missing")).await.unwrap();
        tx.send(ClickEvent::new("1")).await.unwrap();
        drop(tx);
        worker.await.unwrap();

        let link = repository.find_by_code("1").await.unwrap().unwrap();
        assert_eq!(link.clicks, 1);
    }
}
