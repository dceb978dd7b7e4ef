//! End-to-end polling against real local HTTP listeners

use std::collections::HashMap;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use timon_dash::core::{PollingScheduler, ServiceRegistry, ServiceStatus, StatusChecker};
use timon_dash::screens::Locale;
use timon_dash::server::view::render_page;

/// Answer every connection with `200 OK`
async fn spawn_healthy_service() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok")
                    .await;
            });
        }
    });

    port
}

/// A port nothing listens on
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_settled(
    rx: &mut tokio::sync::watch::Receiver<ServiceRegistry>,
) -> ServiceRegistry {
    tokio::time::timeout(
        Duration::from_secs(10),
        rx.wait_for(|r| r.count(ServiceStatus::Loading) == 0),
    )
    .await
    .expect("polling did not settle")
    .expect("scheduler stopped")
    .clone()
}

#[tokio::test]
async fn test_one_service_down() {
    let mut ports = HashMap::new();
    ports.insert("auth".to_string(), spawn_healthy_service().await);
    ports.insert("veterinaria".to_string(), closed_port().await);
    ports.insert("peluqueria".to_string(), spawn_healthy_service().await);
    ports.insert("petshop".to_string(), spawn_healthy_service().await);

    let checker = StatusChecker::new("127.0.0.1", Duration::from_secs(2)).unwrap();
    let scheduler = PollingScheduler::new(
        ServiceRegistry::with_port_overrides(&ports),
        checker,
        Duration::from_secs(30),
    );
    let handle = scheduler.spawn();
    let mut rx = handle.subscribe();

    let settled = wait_until_settled(&mut rx).await;

    let statuses = settled.statuses();
    assert_eq!(statuses["auth"], ServiceStatus::Online);
    assert_eq!(statuses["veterinaria"], ServiceStatus::Offline);
    assert_eq!(statuses["peluqueria"], ServiceStatus::Online);
    assert_eq!(statuses["petshop"], ServiceStatus::Online);

    for record in settled.iter() {
        assert!(record.last_checked.is_some());
        if record.status.is_online() {
            assert!(record.response_time_ms.is_some());
        }
    }

    // Latency is only kept for successful checks
    assert_eq!(settled.get("veterinaria").unwrap().response_time_ms, None);

    handle.cancel().await;
}

#[tokio::test]
async fn test_all_services_unreachable() {
    let mut ports = HashMap::new();
    for key in ["auth", "veterinaria", "peluqueria", "petshop"] {
        ports.insert(key.to_string(), closed_port().await);
    }

    let checker = StatusChecker::new("127.0.0.1", Duration::from_secs(2)).unwrap();
    let handle = PollingScheduler::new(
        ServiceRegistry::with_port_overrides(&ports),
        checker,
        Duration::from_secs(30),
    )
    .spawn();
    let mut rx = handle.subscribe();

    let settled = wait_until_settled(&mut rx).await;
    assert_eq!(settled.count(ServiceStatus::Offline), 4);

    // Every card is shown with the danger color
    let page = render_page(&settled, Locale::En, "127.0.0.1", 30);
    assert_eq!(page.matches("status-indicator offline").count(), 4);
    assert_eq!(page.matches("var(--color-danger)\"></div>").count(), 4);
    assert!(!page.contains("var(--color-success)\"></div>"));

    handle.cancel().await;
}

#[tokio::test]
async fn test_refresh_picks_up_recovered_service() {
    let dead = closed_port().await;
    let mut ports = HashMap::new();
    ports.insert("auth".to_string(), dead);

    let checker = StatusChecker::new("127.0.0.1", Duration::from_secs(2)).unwrap();
    let handle = PollingScheduler::new(
        ServiceRegistry::with_port_overrides(&ports),
        checker,
        Duration::from_secs(3600),
    )
    .spawn();
    let mut rx = handle.subscribe();

    let first = tokio::time::timeout(
        Duration::from_secs(10),
        rx.wait_for(|r| r.get("auth").map(|s| s.status) == Some(ServiceStatus::Offline)),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();
    assert_eq!(first.get("auth").unwrap().port, dead);

    // Bring a service up on the same port and ask for an immediate cycle
    let listener = TcpListener::bind(("127.0.0.1", dead)).await;
    let Ok(listener) = listener else {
        // Port was grabbed by someone else in the meantime
        handle.cancel().await;
        return;
    };
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .await;
        }
    });

    handle.refresh();

    tokio::time::timeout(
        Duration::from_secs(10),
        rx.wait_for(|r| r.get("auth").map(|s| s.status) == Some(ServiceStatus::Online)),
    )
    .await
    .unwrap()
    .unwrap();

    handle.cancel().await;
}
