#![allow(dead_code)]

use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

/// Environment variables the binary reads; cleared so the host cannot leak in.
const STOREFRONT_ENV: &[&str] = &[
    "STOREFRONT_ROOT",
    "STOREFRONT_API_URL",
    "STOREFRONT_TOKEN",
    "STOREFRONT_LOG",
    "HTTP_PROXY",
    "http_proxy",
    "ALL_PROXY",
    "all_proxy",
];

pub fn storefront_binary() -> &'static str {
    env!("CARGO_BIN_EXE_storefront")
}

/// Helper struct to run storefront commands in an isolated temp directory
pub struct StorefrontTest {
    pub temp_dir: TempDir,
    env: Vec<(String, String)>,
}

impl StorefrontTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        StorefrontTest {
            temp_dir,
            env: Vec::new(),
        }
    }

    /// Point the binary at a stub API server.
    pub fn with_api(self, server: &StubServer) -> Self {
        self.with_env("STOREFRONT_API_URL", &server.base_url())
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(storefront_binary());
        command.args(args).current_dir(self.temp_dir.path());
        for key in STOREFRONT_ENV {
            command.env_remove(key);
        }
        for (key, value) in &self.env {
            command.env(key, value);
        }
        command.output().expect("Failed to execute storefront command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Run and parse stdout as JSON.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("Invalid JSON from {args:?}: {e}\n{stdout}"))
    }

    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join(".storefront")
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.root();
        fs::create_dir_all(&dir).expect("Failed to create .storefront directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.root().join("config.yaml")).expect("Failed to read config file")
    }

    pub fn read_cart(&self) -> serde_json::Value {
        let content =
            fs::read_to_string(self.root().join("cart.json")).expect("Failed to read cart file");
        serde_json::from_str(&content).expect("Invalid cart JSON")
    }
}

/// A canned HTTP response.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl StubResponse {
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// The pieces of a request the stub records.
#[derive(Debug, Clone)]
pub struct StubRequest {
    /// Path and query, as sent on the request line.
    pub target: String,
    pub authorization: Option<String>,
}

impl StubRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or("")
    }

    /// Decoded value of query parameter `key`.
    pub fn param(&self, key: &str) -> Option<String> {
        let url = url::Url::parse(&format!("http://stub{}", self.target)).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

type Handler = dyn Fn(&StubRequest) -> StubResponse + Send + Sync;

/// Minimal HTTP/1.1 server on a background thread, one connection per request.
pub struct StubServer {
    addr: std::net::SocketAddr,
    requests: Arc<Mutex<Vec<StubRequest>>>,
}

impl StubServer {
    pub fn start(handler: impl Fn(&StubRequest) -> StubResponse + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Stub server has no address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let handler = Arc::clone(&handler);
                let recorded = Arc::clone(&recorded);
                thread::spawn(move || serve(stream, handler.as_ref(), &recorded));
            }
        });

        StubServer { addr, requests }
    }

    /// Serve the pages of a `{data: {<field>: [...]}}` list from `items`.
    pub fn paged(field: &'static str, items: Vec<serde_json::Value>) -> Self {
        Self::start(move |request| {
            let page: usize = request.param("page").and_then(|p| p.parse().ok()).unwrap_or(1);
            let per_page: usize = request
                .param("per_page")
                .and_then(|p| p.parse().ok())
                .unwrap_or(10);
            let slice: Vec<_> = items
                .iter()
                .skip((page - 1) * per_page)
                .take(per_page)
                .cloned()
                .collect();
            let mut data = serde_json::Map::new();
            data.insert(field.to_string(), serde_json::Value::Array(slice));
            StubResponse::json(serde_json::json!({ "data": data }))
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<StubRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve(mut stream: TcpStream, handler: &Handler, recorded: &Mutex<Vec<StubRequest>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf).to_string();
    let mut lines = head.lines();
    let target = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let authorization = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
        .map(|(_, value)| value.trim().to_string());

    let request = StubRequest {
        target,
        authorization,
    };
    recorded.lock().unwrap().push(request.clone());

    let response = handler(&request);
    if let Some(delay) = response.delay {
        thread::sleep(delay);
    }
    let reply = format!(
        "HTTP/1.1 {} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        response.body.len(),
        response.body
    );
    let _ = stream.write_all(reply.as_bytes());
    let _ = stream.flush();
}

/// `count` products with ids starting at 1, all from merchant 7.
pub fn products(count: usize) -> Vec<serde_json::Value> {
    (1..=count)
        .map(|id| {
            serde_json::json!({
                "id": id,
                "m_id": 7,
                "shop_name": "Corner Shop",
                "p_name": format!("Product {id}"),
                "p_price": 10.0,
                "en_description": format!("Description {id}"),
            })
        })
        .collect()
}
