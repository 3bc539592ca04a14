use std::collections::HashMap;
use std::io::Read;
use std::sync::mpsc::channel;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::Value;
use solarview::registry::{self, BodyDescriptor};
use solarview::store::{self, DocumentStore, RemoteStore, StoreError, COLLECTION, DOCUMENT};

/// In-memory stand-in for the remote document store.
#[derive(Default)]
struct MemoryStore {
    documents: Mutex<HashMap<String, Value>>,
}

impl DocumentStore for MemoryStore {
    fn put(&self, collection: &str, document: &str, payload: &Value) -> Result<(), StoreError> {
        self.documents
            .lock()
            .unwrap()
            .insert(format!("{}/{}", collection, document), payload.clone());
        Ok(())
    }

    fn get(&self, collection: &str, document: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .get(&format!("{}/{}", collection, document))
            .cloned())
    }
}

fn sample_bodies() -> Vec<BodyDescriptor> {
    vec![
        BodyDescriptor {
            name: "Mercury".to_owned(),
            asset: "assets/mercury.obj".to_owned(),
            distance: 10.0,
            scale: 1.2,
            speed: 0.04,
        },
        BodyDescriptor {
            name: "Venus".to_owned(),
            asset: "assets/venus.obj".to_owned(),
            distance: 18.0,
            scale: 1.5,
            speed: 0.03,
        },
    ]
}

#[test]
fn save_then_load_reports_an_existing_snapshot() {
    let memory: Arc<dyn DocumentStore> = Arc::new(MemoryStore::default());
    let (tx, rx) = channel();

    store::spawn_save(
        Arc::clone(&memory),
        registry::snapshot(&sample_bodies()),
        tx.clone(),
    );
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        "Configuration saved!"
    );

    store::spawn_load(memory, tx);
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        "Configuration loaded!"
    );
}

#[test]
fn load_from_an_empty_store_reports_missing() {
    let memory: Arc<dyn DocumentStore> = Arc::new(MemoryStore::default());
    let (tx, rx) = channel();

    store::spawn_load(memory, tx);
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        "No saved configuration!"
    );
}

#[test]
fn snapshots_are_written_and_read_wholesale() {
    let memory = MemoryStore::default();
    let bodies = sample_bodies();
    let payload = registry::snapshot(&bodies);

    memory.put(COLLECTION, DOCUMENT, &payload).unwrap();
    let loaded = memory.get(COLLECTION, DOCUMENT).unwrap().unwrap();

    assert_eq!(loaded, payload);
    assert_eq!(loaded["planets"].as_array().unwrap().len(), bodies.len());
    assert_eq!(loaded["planets"][0]["name"], "Mercury");
}

#[test]
fn remote_store_round_trips_against_a_live_server() {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();

    // A minimal key-document server: PUT stores the body, GET serves it
    // back, anything unknown is a 404. Serves exactly the three requests
    // the client below makes.
    let handle = thread::spawn(move || {
        let mut documents: HashMap<String, String> = HashMap::new();
        for _ in 0..3 {
            let mut request = server.recv().unwrap();
            let url = request.url().to_owned();
            match request.method() {
                tiny_http::Method::Put => {
                    let mut body = String::new();
                    request.as_reader().read_to_string(&mut body).unwrap();
                    documents.insert(url, body);
                    request.respond(tiny_http::Response::from_string("{}")).unwrap();
                }
                tiny_http::Method::Get => match documents.get(&url) {
                    Some(doc) => request
                        .respond(tiny_http::Response::from_string(doc.clone()))
                        .unwrap(),
                    None => request
                        .respond(
                            tiny_http::Response::from_string("no such document")
                                .with_status_code(404),
                        )
                        .unwrap(),
                },
                _ => request
                    .respond(tiny_http::Response::from_string("").with_status_code(405))
                    .unwrap(),
            }
        }
    });

    let remote = RemoteStore::new(&format!("http://127.0.0.1:{}", port));

    // Nothing saved yet: a legitimate miss, not an error.
    assert!(remote.get(COLLECTION, DOCUMENT).unwrap().is_none());

    let payload = registry::snapshot(&sample_bodies());
    remote.put(COLLECTION, DOCUMENT, &payload).unwrap();

    let loaded = remote
        .get(COLLECTION, DOCUMENT)
        .unwrap()
        .expect("document was just saved");
    assert_eq!(loaded, payload);

    handle.join().unwrap();
}

#[test]
fn server_errors_are_distinct_from_missing_documents() {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();

    let handle = thread::spawn(move || {
        let request = server.recv().unwrap();
        request
            .respond(tiny_http::Response::from_string("boom").with_status_code(500))
            .unwrap();
    });

    let remote = RemoteStore::new(&format!("http://127.0.0.1:{}", port));
    match remote.get(COLLECTION, DOCUMENT) {
        Err(StoreError::Status(500)) => {}
        other => panic!("expected a status error, got {:?}", other),
    }

    handle.join().unwrap();
}

#[test]
fn unreachable_store_reports_transport_failure() {
    // Nothing listens on port 1; the connection is refused outright.
    let remote = RemoteStore::new("http://127.0.0.1:1");
    let (tx, rx) = channel();
    store::spawn_load(Arc::new(remote), tx);

    let message = rx.recv_timeout(Duration::from_secs(30)).unwrap();
    assert!(
        message.starts_with("Load failed:"),
        "unexpected notification: {}",
        message
    );
}
