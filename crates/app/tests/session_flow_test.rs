//! End-to-end tests of the session layer wired with the production
//! interceptors and credential store, against a scripted server.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use rocket_application::{
    BookingEvent, CredentialStore, DetailsUpdate, Network, PageUpdate, RequestContext,
    RequestMore, Transport, TransportError,
};
use rocket_domain::{CachePolicy, GraphQLResponse, LaunchId, SESSION_KEY};
use rocket_infrastructure::{DefaultInterceptors, FileCredentialStore};
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};
use tokio::sync::mpsc;

/// What the server saw for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Seen {
    operation: &'static str,
    authorization: Option<String>,
    cache_policy: CachePolicy,
}

/// Answers each operation from its own queue of replies.
#[derive(Default)]
struct ScriptedServer {
    replies: Mutex<HashMap<&'static str, VecDeque<Value>>>,
    seen: Mutex<Vec<Seen>>,
}

impl ScriptedServer {
    fn reply(&self, operation: &'static str, data: Value) {
        self.replies
            .lock()
            .entry(operation)
            .or_default()
            .push_back(data);
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedServer {
    async fn send(&self, request: &RequestContext) -> Result<GraphQLResponse, TransportError> {
        let operation = request.operation().name;
        self.seen.lock().push(Seen {
            operation,
            authorization: request.header("authorization").map(str::to_string),
            cache_policy: request.cache_policy(),
        });
        self.replies
            .lock()
            .get_mut(operation)
            .and_then(VecDeque::pop_front)
            .map(GraphQLResponse::with_data)
            .ok_or_else(|| TransportError::ConnectionFailed(format!("no reply for {operation}")))
    }
}

struct Harness {
    _dir: TempDir,
    credentials_path: std::path::PathBuf,
    server: Arc<ScriptedServer>,
    network: Network,
}

fn harness() -> Harness {
    let dir = tempdir().unwrap();
    let credentials_path = dir.path().join("credentials.json");
    let server = Arc::new(ScriptedServer::default());
    let network = Network::new(
        Arc::clone(&server) as Arc<dyn Transport>,
        Arc::new(DefaultInterceptors::new(0, Duration::ZERO)),
        Arc::new(FileCredentialStore::open(&credentials_path).unwrap()),
    );
    Harness {
        _dir: dir,
        credentials_path,
        server,
        network,
    }
}

async fn recv<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for completion")
        .expect("channel closed")
}

fn page(ids: &[&str], cursor: Option<&str>, has_more: bool) -> Value {
    let launches: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "id": id, "site": "KSC", "isBooked": false, "mission": { "name": format!("Mission {id}") } }))
        .collect();
    json!({ "launches": { "cursor": cursor, "hasMore": has_more, "launches": launches } })
}

fn details(id: &str, is_booked: bool) -> Value {
    json!({
        "launch": {
            "id": id,
            "site": "KSC",
            "isBooked": is_booked,
            "mission": { "name": "Starlink" },
            "rocket": { "name": "Falcon 9", "type": "FT" }
        }
    })
}

async fn login(h: &Harness) {
    h.server.reply("Login", json!({ "login": "c2Vzc2lvbg==" }));
    let (tx, mut rx) = mpsc::unbounded_channel();
    h.network
        .login()
        .login("  pilot@example.com ", move |outcome| {
            let _ = tx.send(outcome);
        })
        .unwrap();
    recv(&mut rx).await.unwrap();
}

#[tokio::test]
async fn test_login_token_is_persisted_and_injected() {
    let h = harness();
    h.server.reply("LaunchList", page(&["1", "2"], Some("c1"), true));

    login(&h).await;

    let reopened = FileCredentialStore::open(&h.credentials_path).unwrap();
    assert_eq!(
        reopened.get(SESSION_KEY).map(|t| t.expose().to_string()),
        Some("c2Vzc2lvbg==".to_string())
    );

    let mut pager = h.network.launch_pager();
    let (tx, mut rx) = mpsc::unbounded_channel();
    assert!(matches!(
        pager.request_more(move |c| {
            let _ = tx.send(c);
        }),
        RequestMore::Issued(_)
    ));
    let update = pager.apply(recv(&mut rx).await);

    assert_eq!(
        update,
        PageUpdate::Loaded {
            appended: 2,
            has_more: true,
            errors: vec![]
        }
    );
    let seen = h.server.seen();
    assert_eq!(seen[0].operation, "Login");
    assert_eq!(seen[0].authorization, None);
    assert_eq!(seen[1].authorization.as_deref(), Some("c2Vzc2lvbg=="));
}

#[tokio::test]
async fn test_pages_accumulate_and_first_page_is_cached() {
    let h = harness();
    h.server.reply("LaunchList", page(&["1", "2"], Some("c1"), true));
    h.server.reply("LaunchList", page(&["3"], Some("c2"), false));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut pager = h.network.launch_pager();
    for _ in 0..2 {
        let sender = tx.clone();
        pager.request_more(move |c| {
            let _ = sender.send(c);
        });
        pager.apply(recv(&mut rx).await);
    }
    let ids: Vec<_> = pager.launches().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert!(matches!(pager.request_more(|_| {}), RequestMore::Exhausted));

    let mut again = h.network.launch_pager();
    let sender = tx.clone();
    again.request_more(move |c| {
        let _ = sender.send(c);
    });
    again.apply(recv(&mut rx).await);

    assert_eq!(again.launches().len(), 2);
    assert_eq!(h.server.seen().len(), 2);
}

#[tokio::test]
async fn test_toggle_books_and_refreshes_details() {
    let h = harness();
    login(&h).await;
    h.server.reply("LaunchDetails", details("42", false));
    h.server.reply(
        "BookTrips",
        json!({ "bookTrips": { "success": true, "message": null } }),
    );
    h.server.reply("LaunchDetails", details("42", true));

    let id = LaunchId::parse("42").unwrap();
    let mut loader = h.network.launch_details(id.clone());
    let (tx, mut rx) = mpsc::unbounded_channel();
    loader.load(false, move |c| {
        let _ = tx.send(c);
    });
    loader.apply(recv(&mut rx).await);
    let current = loader.launch().cloned().unwrap();
    assert!(!current.is_booked);

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let controller = h.network.booking(events_tx);
    controller.toggle(&current).unwrap();

    match recv(&mut events).await {
        BookingEvent::Completed {
            launch_id, outcome, ..
        } => {
            assert_eq!(launch_id, id);
            assert_eq!(outcome.unwrap().message, "Trip booked successfully");
        }
        other => panic!("unexpected event: {other:?}"),
    }
    match recv(&mut events).await {
        BookingEvent::DetailsRefreshed { result, .. } => {
            assert_eq!(loader.absorb(result), DetailsUpdate::Updated { errors: vec![] });
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(loader.launch().unwrap().is_booked);

    let seen = h.server.seen();
    let names: Vec<_> = seen.iter().map(|s| s.operation).collect();
    assert_eq!(names, vec!["Login", "LaunchDetails", "BookTrips", "LaunchDetails"]);
    assert_eq!(seen[2].authorization.as_deref(), Some("c2Vzc2lvbg=="));
    assert_eq!(seen[3].cache_policy, CachePolicy::FetchIgnoringCacheCompletely);
}

#[tokio::test]
async fn test_toggle_without_session_issues_nothing() {
    let h = harness();
    let (events_tx, _events) = mpsc::unbounded_channel();
    let controller = h.network.booking(events_tx);
    let launch = serde_json::from_value(details("42", false)["launch"].clone()).unwrap();

    assert!(controller.toggle(&launch).is_err());
    assert!(h.server.seen().is_empty());
}
