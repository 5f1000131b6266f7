//! Integration tests for the loopback asset server: page, assets, path
//! traversal, page actions and window IPC over a real socket.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use planner_core::shell::{AssetServer, HeadlessWindow, StoreDashboard};
use planner_core::{FixedClock, MemoryMedium, NewHabit, Store, ViewMode};

fn send(addr: SocketAddr, chunks: &[&[u8]]) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).unwrap();
    for chunk in chunks {
        stream.write_all(chunk).unwrap();
        stream.flush().unwrap();
        thread::sleep(Duration::from_millis(20));
    }
    let mut raw = String::new();
    stream.read_to_string(&mut raw).unwrap();
    let status = raw
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap();
    let body = raw.split_once("\r\n\r\n").map(|(_, b)| b.to_string()).unwrap_or_default();
    (status, body)
}

fn request(addr: SocketAddr, method: &str, path: &str) -> (u16, String) {
    let head = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    );
    send(addr, &[head.as_bytes()])
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap()
}

struct Running {
    addr: SocketAddr,
    window: Arc<Mutex<HeadlessWindow>>,
    handle: thread::JoinHandle<()>,
}

fn start(store: Store, assets: &std::path::Path) -> Running {
    let server = AssetServer::bind(0, assets).unwrap();
    let addr = server.local_addr().unwrap();
    let window = Arc::new(Mutex::new(HeadlessWindow::default()));
    let shared = window.clone();
    let handle = thread::spawn(move || {
        let dashboard = StoreDashboard {
            store,
            view: ViewMode::Day,
            upcoming_limit: 5,
        };
        server.serve(dashboard, shared).unwrap();
    });
    Running { addr, window, handle }
}

fn open_store() -> Store {
    Store::open(
        Box::new(MemoryMedium::new()),
        Arc::new(FixedClock::at(2024, 3, 4, 9, 0)),
    )
}

#[test]
fn test_serves_page_assets_and_ipc_until_closed() {
    let root = tempfile::tempdir().unwrap();
    let assets = root.path().join("assets");
    std::fs::create_dir(&assets).unwrap();
    std::fs::write(assets.join("style.css"), "body { color: black; }").unwrap();
    std::fs::write(root.path().join("secret.txt"), "top secret").unwrap();

    let mut store = open_store();
    store.add_task("Served task");
    let server = start(store, &assets);
    let addr = server.addr;

    let (status, body) = request(addr, "GET", "/");
    assert_eq!(status, 200);
    assert!(body.contains("Served task"));
    assert!(body.contains("Today's Schedule"));

    // The asset root's stylesheet wins over the bundled one.
    let (status, body) = request(addr, "GET", "/style.css");
    assert_eq!(status, 200);
    assert_eq!(body, "body { color: black; }");

    let (status, body) = request(addr, "GET", "/renderer.js");
    assert_eq!(status, 200);
    assert!(body.contains("/api/delete/confirm"));

    assert_eq!(request(addr, "GET", "/../secret.txt").0, 403);
    assert_eq!(request(addr, "GET", "/%2e%2e/secret.txt").0, 403);
    assert_eq!(request(addr, "GET", "/missing.js").0, 404);

    assert_eq!(request(addr, "POST", "/ipc/window-max").0, 200);
    assert_eq!(request(addr, "POST", "/ipc/window-teleport").0, 404);
    assert_eq!(request(addr, "POST", "/ipc/window-close").0, 200);

    server.handle.join().unwrap();
    let window = server.window.lock().unwrap();
    assert!(window.maximized);
    assert!(window.closed);
}

#[test]
fn test_request_split_across_writes() {
    let assets = tempfile::tempdir().unwrap();
    let server = start(open_store(), assets.path());

    let (status, body) = send(
        server.addr,
        &[
            b"GE".as_slice(),
            b"T / HTTP/1.1\r\nHost: local".as_slice(),
            b"host\r\nConnection: close\r\n\r\n".as_slice(),
        ],
    );
    assert_eq!(status, 200);
    assert!(body.contains("<!DOCTYPE html>"));

    request(server.addr, "POST", "/ipc/window-close");
    server.handle.join().unwrap();
}

#[test]
fn test_page_actions_mutate_the_store() {
    let assets = tempfile::tempdir().unwrap();
    let mut store = open_store();
    let task = store.add_task("Print slides");
    let note = store.add_note("Bring calculator");
    let habit = store.add_habit(NewHabit {
        title: "Water".into(),
        target: 2,
        measure: "glasses".into(),
    });
    let server = start(store, assets.path());
    let addr = server.addr;

    let (status, body) = request(addr, "POST", &format!("/api/task/{task}/toggle"));
    assert_eq!(status, 200);
    assert_eq!(json(&body)["completed"], true);

    let (_, body) = request(addr, "POST", &format!("/api/habit/{habit}/bump"));
    assert_eq!(json(&body)["current"], 1);
    assert_eq!(request(addr, "POST", &format!("/api/task/{task}/bump")).0, 404);

    // Completed: gone without a prompt.
    let (_, body) = request(addr, "POST", &format!("/api/task/{task}/delete?skip=true"));
    assert_eq!(json(&body)["status"], "deleted");

    // Unfinished: staged until the page confirms.
    let (_, body) = request(addr, "POST", &format!("/api/note/{note}/delete?skip=true"));
    assert_eq!(json(&body)["status"], "confirm");
    assert!(request(addr, "GET", "/").1.contains("Bring calculator"));

    let (_, body) = request(addr, "POST", "/api/delete/confirm?affirmed=false");
    assert_eq!(json(&body)["status"], "cancelled");
    assert!(request(addr, "GET", "/").1.contains("Bring calculator"));

    request(addr, "POST", &format!("/api/note/{note}/delete"));
    let (_, body) = request(addr, "POST", "/api/delete/confirm?affirmed=true");
    assert_eq!(json(&body)["removed"], 1);

    let page = request(addr, "GET", "/").1;
    assert!(!page.contains("Bring calculator"));
    assert!(!page.contains("Print slides"));

    assert_eq!(request(addr, "POST", "/api/gadget/1/toggle").0, 404);
    assert_eq!(request(addr, "POST", &format!("/api/note/{note}/toggle")).0, 404);

    request(addr, "POST", "/ipc/window-close");
    server.handle.join().unwrap();
}

#[cfg(unix)]
#[test]
fn test_symlink_out_of_root_is_forbidden() {
    use planner_core::shell::resolve_asset;
    use planner_core::ShellError;

    let root = tempfile::tempdir().unwrap();
    let outside = tempfile::tempdir().unwrap();
    std::fs::write(outside.path().join("passwd"), "x").unwrap();
    std::os::unix::fs::symlink(outside.path().join("passwd"), root.path().join("link")).unwrap();

    assert!(matches!(
        resolve_asset(root.path(), "/link"),
        Err(ShellError::Forbidden(_))
    ));
}
