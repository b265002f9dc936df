//! Multi-node behaviour with an in-process transport between peers

mod common;

use common::{init_tracing, CountingSource};
use meshcache::{
    BoxError, DataSource, FetchRequest, FetchResponse, Group, GroupRegistry, PeerGetter,
    PeerPicker, RingPeerPicker,
};
use std::sync::Arc;

/// Transport that serves a request straight out of another node's registry
struct InProcessPeer {
    registry: Arc<GroupRegistry>,
}

impl PeerGetter for InProcessPeer {
    fn get(&self, request: &FetchRequest) -> Result<FetchResponse, BoxError> {
        let group = self
            .registry
            .get(&request.group)
            .ok_or_else(|| format!("no such group: {}", request.group))?;
        let value = group.get(&request.key)?;
        Ok(FetchResponse::new(value.byte_slice()))
    }
}

struct Node {
    id: String,
    registry: Arc<GroupRegistry>,
    picker: Arc<RingPeerPicker>,
    source: Arc<CountingSource>,
}

fn node(id: &str, values: &[(&str, &str)]) -> Node {
    let registry = Arc::new(GroupRegistry::new());
    let source = Arc::new(CountingSource::new(values));
    let group = registry
        .register_builder(
            Group::builder("scores")
                .cache_bytes(1 << 20)
                .data_source(Arc::clone(&source) as Arc<dyn DataSource>),
        )
        .unwrap();

    let picker = Arc::new(RingPeerPicker::new(id, 50));
    group
        .register_peers(Arc::clone(&picker) as Arc<dyn PeerPicker>)
        .unwrap();

    Node {
        id: id.to_string(),
        registry,
        picker,
        source,
    }
}

fn connect(nodes: &[Node]) {
    for node in nodes {
        let peers: Vec<(String, Arc<dyn PeerGetter>)> = nodes
            .iter()
            .filter(|other| other.id != node.id)
            .map(|other| {
                let peer: Arc<dyn PeerGetter> = Arc::new(InProcessPeer {
                    registry: Arc::clone(&other.registry),
                });
                (other.id.clone(), peer)
            })
            .collect();
        node.picker.set_peers(peers);
    }
}

fn dataset() -> Vec<(String, String)> {
    (0..200).map(|i| (format!("key-{i}"), format!("value-{i}"))).collect()
}

#[test]
fn test_each_key_loaded_once_by_its_owner() {
    init_tracing();
    let data = dataset();
    let values: Vec<(&str, &str)> = data.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    let nodes = vec![
        node("node-a", &values),
        node("node-b", &values),
        node("node-c", &values),
    ];
    connect(&nodes);

    // Every node asks for every key
    for node in &nodes {
        let group = node.registry.get("scores").unwrap();
        for (key, value) in &data {
            assert_eq!(group.get(key).unwrap().to_string(), *value);
        }
    }

    for (key, _) in &data {
        let loads: usize = nodes.iter().map(|n| n.source.loads_of(key)).sum();
        assert_eq!(loads, 1, "{key} loaded {loads} times");

        // The node that loaded it is the owner every ring agrees on
        let loader = nodes.iter().find(|n| n.source.loads_of(key) == 1).unwrap();
        assert!(nodes
            .iter()
            .all(|n| n.picker.owner_of(key).as_deref() == Some(loader.id.as_str())));
    }

    // Keys are spread across the cluster
    assert!(nodes.iter().all(|n| n.source.total_loads() > 0));
}

#[test]
fn test_unreachable_owner_falls_back_locally() {
    let data = dataset();
    let values: Vec<(&str, &str)> = data.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    let local = node("node-a", &values);

    // node-b is on the ring but its registry serves no groups
    let dead = Arc::new(GroupRegistry::new());
    local.picker.set_peers(vec![(
        "node-b".to_string(),
        Arc::new(InProcessPeer { registry: dead }) as Arc<dyn PeerGetter>,
    )]);

    let group = local.registry.get("scores").unwrap();
    for (key, value) in &data {
        assert_eq!(group.get(key).unwrap().to_string(), *value);
    }

    assert_eq!(local.source.total_loads(), data.len());
    let owned_by_dead = data
        .iter()
        .filter(|(key, _)| local.picker.owner_of(key).as_deref() == Some("node-b"))
        .count();
    let stats = group.stats();
    assert!(owned_by_dead > 0);
    assert_eq!(stats.peer_errors, owned_by_dead as u64);
    assert_eq!(stats.local_loads, data.len() as u64);
}
