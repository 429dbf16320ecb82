//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use custom_error_pages::config::{ServerConfig, StaticEnv};
use custom_error_pages::observability::{MetricSample, RequestRecorder};
use custom_error_pages::{ErrorPages, HttpServer};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Collects every recorded sample.
#[derive(Default)]
pub struct CollectingRecorder {
    samples: Mutex<Vec<MetricSample>>,
}

impl CollectingRecorder {
    pub fn samples(&self) -> Vec<MetricSample> {
        self.samples.lock().unwrap().clone()
    }
}

impl RequestRecorder for CollectingRecorder {
    fn record(&self, sample: &MetricSample) {
        self.samples.lock().unwrap().push(sample.clone());
    }
}

/// A temporary error files tree.
pub fn error_files(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub recorder: Arc<CollectingRecorder>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Start the responder over `root` with a fixed environment.
pub async fn start_server(root: &Path, env: StaticEnv) -> TestServer {
    let mut config = ServerConfig::default();
    config.pages.error_files_path = root.to_path_buf();

    let recorder = Arc::new(CollectingRecorder::default());
    let pages = ErrorPages::new(&config, Arc::new(env), recorder.clone());
    let server = HttpServer::new(config, pages, None);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = server
            .run(listener, async {
                let _ = rx.await;
            })
            .await;
    });

    TestServer {
        addr,
        recorder,
        shutdown: Some(tx),
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
