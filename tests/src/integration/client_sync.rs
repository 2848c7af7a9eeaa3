//! # Client Sync
//!
//! The HTTP client and file snapshot store against a gateway listening on a
//! real socket:
//!
//! 1. pull while the server is up → LIVE, snapshot written
//! 2. server stops → pull answers from the snapshot, labelled STALE
//! 3. whole-document push while down → not landed, pending edit kept
//! 4. server back on a new port over the same store → pending edit lands

#[cfg(test)]
mod tests {
    use crate::integration::support::{dispatcher, SECRET};
    use lg_01_document_store::InMemoryDocumentStore;
    use lg_04_api_gateway::{GatewayConfig, GatewayService};
    use lg_05_sync_cache::{
        CachedLeagueClient, ClientError, FileSnapshotStore, Freshness, HttpClientConfig,
        HttpLeagueClient, SnapshotStore, SyncError,
    };
    use serde_json::json;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;

    struct RunningServer {
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        handle: JoinHandle<()>,
    }

    impl RunningServer {
        async fn start(store: &Arc<InMemoryDocumentStore>) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let mut gateway =
                GatewayService::new(GatewayConfig::default(), Arc::new(dispatcher(store)))
                    .unwrap();
            let shutdown = gateway.shutdown_handle();
            let handle = tokio::spawn(async move {
                gateway.serve(listener).await.unwrap();
            });
            Self {
                addr,
                shutdown,
                handle,
            }
        }

        fn url(&self) -> String {
            format!("http://{}", self.addr)
        }

        async fn stop(self) {
            let _ = self.shutdown.send(());
            tokio::time::timeout(Duration::from_secs(5), self.handle)
                .await
                .expect("server did not stop")
                .unwrap();
        }
    }

    fn client(url: &str, secret: &str, snapshots: Arc<FileSnapshotStore>) -> CachedLeagueClient {
        let mut config = HttpClientConfig::new(url).with_secret(secret);
        config.timeout = Duration::from_secs(5);
        config.connect_timeout = Duration::from_secs(2);
        let remote = HttpLeagueClient::new(config).unwrap();
        CachedLeagueClient::new(Arc::new(remote), snapshots)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_offline_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = Arc::new(FileSnapshotStore::new(dir.path()).unwrap());
        let store = Arc::new(InMemoryDocumentStore::new());

        // 1. live pull
        let server = RunningServer::start(&store).await;
        let online = client(&server.url(), SECRET, Arc::clone(&snapshots));
        online
            .write(
                "register-team",
                Some(json!({"name": "Harbour Town", "owner": "fan club"})),
            )
            .await
            .unwrap();
        let live = online.pull().await.unwrap();
        assert!(matches!(live.freshness, Freshness::Live { version: Some(_) }));
        assert_eq!(live.value.teams.len(), 1);
        let base_version = snapshots.load().unwrap().unwrap().version.unwrap();

        // 2. stale fallback
        let old_url = server.url();
        server.stop().await;
        let offline = client(&old_url, SECRET, Arc::clone(&snapshots));
        let stale = offline.pull().await.unwrap();
        assert!(stale.freshness.is_stale());
        assert_eq!(stale.value, live.value);

        let standings = offline.standings(None).await.unwrap();
        assert!(standings.freshness.is_stale());
        assert_eq!(standings.value.table.len(), 1);

        // 3. push while down
        let mut edited = stale.value.clone();
        edited.teams[0].name = "Harbour Town FC".into();
        let err = offline
            .push(edited.clone(), Some(base_version.clone()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::WriteNotLanded {
                pending_saved: true,
                ..
            }
        ));
        let pending = snapshots.load_pending().unwrap().unwrap();
        assert_eq!(pending.base_version, Some(base_version));
        // The snapshot still holds what the server last confirmed.
        assert_eq!(snapshots.load().unwrap().unwrap().document, live.value);

        // 4. back online
        let server = RunningServer::start(&store).await;
        let restored = client(&server.url(), SECRET, Arc::clone(&snapshots));
        let landed = restored.retry_pending().await.unwrap();
        assert!(landed.is_some());
        assert!(snapshots.load_pending().unwrap().is_none());

        let live = restored.pull().await.unwrap();
        assert!(!live.freshness.is_stale());
        assert_eq!(live.value.teams[0].name, "Harbour Town FC");
        server.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_wrong_secret_is_not_masked_by_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = Arc::new(FileSnapshotStore::new(dir.path()).unwrap());
        let store = Arc::new(InMemoryDocumentStore::new());
        let server = RunningServer::start(&store).await;

        client(&server.url(), SECRET, Arc::clone(&snapshots))
            .pull()
            .await
            .unwrap();

        let intruder = client(&server.url(), "not-the-secret", Arc::clone(&snapshots));
        let err = intruder.pull().await.unwrap_err();
        match err {
            SyncError::Remote(ClientError::Api { status, kind, .. }) => {
                assert_eq!(status, 401);
                assert_eq!(kind, "Unauthorized");
            }
            other => panic!("expected a 401, got {other:?}"),
        }
        server.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_health_over_http() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let server = RunningServer::start(&store).await;
        let dir = tempfile::tempdir().unwrap();
        let snapshots = Arc::new(FileSnapshotStore::new(dir.path()).unwrap());

        let health = client(&server.url(), SECRET, snapshots)
            .health()
            .await
            .unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["configured"], true);
        server.stop().await;
    }
}
