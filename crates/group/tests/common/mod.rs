//! Common test utilities and helpers

#![allow(dead_code)]

use meshcache::{BoxError, DataSource, FetchRequest, FetchResponse, PeerGetter, PeerPicker};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test subscriber filtered by `MESHCACHE_LOG` (default: off)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env(meshcache_core::MESHCACHE_LOG_VAR)
            .unwrap_or_else(|_| EnvFilter::new("off"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// In-memory data source that counts loads per key
pub struct CountingSource {
    values: HashMap<String, String>,
    loads: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingSource {
    pub fn new(values: &[(&str, &str)]) -> Self {
        Self {
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            loads: Mutex::new(HashMap::new()),
            total: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Sleep this long inside every load
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn loads_of(&self, key: &str) -> usize {
        self.loads.lock().get(key).copied().unwrap_or(0)
    }

    pub fn total_loads(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl DataSource for CountingSource {
    fn get(&self, key: &str) -> Result<Vec<u8>, BoxError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self.loads.lock().entry(key.to_string()).or_default() += 1;
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        match self.values.get(key) {
            Some(value) => Ok(value.as_bytes().to_vec()),
            None => Err(format!("{key} not exist").into()),
        }
    }
}

/// Peer that answers every request with a fixed value, or fails
pub struct StaticPeer {
    value: Option<String>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl StaticPeer {
    pub fn answering(value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            value: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().clone()
    }
}

impl PeerGetter for StaticPeer {
    fn get(&self, request: &FetchRequest) -> Result<FetchResponse, BoxError> {
        self.requests.lock().push(request.clone());
        match &self.value {
            Some(value) => Ok(FetchResponse::new(value.as_str())),
            None => Err("peer unreachable".into()),
        }
    }
}

/// Picker that routes every key to one peer
pub struct AlwaysPeer(pub Arc<StaticPeer>);

impl PeerPicker for AlwaysPeer {
    fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerGetter>> {
        Some(Arc::clone(&self.0) as Arc<dyn PeerGetter>)
    }
}

/// Picker that never finds a peer
pub struct NoPeers;

impl PeerPicker for NoPeers {
    fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerGetter>> {
        None
    }
}
