#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub type Tags = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct MockConfig {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            status: 200,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }
}

#[derive(Default)]
struct Recorded {
    hits: AtomicUsize,
    bodies: Mutex<Vec<Tags>>,
    content_types: Mutex<Vec<String>>,
}

/// Minimal HTTP/1.1 server: one request per connection, records JSON bodies.
pub struct MockServer {
    addr: SocketAddr,
    recorded: Arc<Recorded>,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start() -> Self {
        Self::start_with(MockConfig::default()).await
    }

    pub async fn delayed(delay: Duration) -> Self {
        Self::start_with(MockConfig { delay, ..MockConfig::default() }).await
    }

    /// Plain-text document server, e.g. the default endpoint blob.
    pub async fn serving(body: impl Into<String>) -> Self {
        Self::start_with(MockConfig { body: body.into(), ..MockConfig::default() }).await
    }

    pub async fn start_with(config: MockConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock server");
        let addr = listener.local_addr().expect("mock server addr");
        let recorded = Arc::new(Recorded::default());
        let config = Arc::new(config);

        let rec = recorded.clone();
        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else { break };
                let rec = rec.clone();
                let config = config.clone();
                tokio::spawn(async move {
                    let _ = serve_one(stream, &rec, &config).await;
                });
            }
        });

        Self { addr, recorded, handle }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.recorded.hits.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<Tags> {
        self.recorded.bodies.lock().unwrap().clone()
    }

    pub fn events_named(&self, event: &str) -> Vec<Tags> {
        self.events()
            .into_iter()
            .filter(|tags| tags.get("event").map(String::as_str) == Some(event))
            .collect()
    }

    pub fn content_types(&self) -> Vec<String> {
        self.recorded.content_types.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An address nothing listens on.
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{}", addr)
}

async fn serve_one(mut stream: TcpStream, rec: &Recorded, config: &MockConfig) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut content_length = 0usize;
    for line in head.lines().skip(1) {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            if name == "content-length" {
                content_length = value.trim().parse().unwrap_or(0);
            } else if name == "content-type" {
                rec.content_types.lock().unwrap().push(value.trim().to_string());
            }
        }
    }

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    rec.hits.fetch_add(1, Ordering::SeqCst);
    let body = &buf[header_end..];
    if !body.is_empty() {
        if let Ok(tags) = serde_json::from_slice::<Tags>(body) {
            rec.bodies.lock().unwrap().push(tags);
        }
    }

    if !config.delay.is_zero() {
        tokio::time::sleep(config.delay).await;
    }

    let response = format!(
        "HTTP/1.1 {} MOCK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        config.status,
        config.body.len(),
        config.body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

pub fn git_tags_v1() -> Tags {
    tags(&[
        ("avm_git_commit", "bc0c9fab9ee53296a64c7a682d2ed7e0726c6547"),
        ("avm_git_file", "main.tf"),
        ("avm_git_last_modified_at", "2023-05-04 05:02:32"),
        ("avm_git_org", "Azure"),
        ("avm_git_repo", "terraform-azurerm-aks"),
        ("avm_yor_trace", "7634d95e-39c1-4a9a-b2e3-1fc7d6602313"),
    ])
}

pub fn git_tags_v2() -> Tags {
    tags(&[
        ("avm_git_commit", "0ae8a663f1dc1dc474b14c10d9c94c77a3d1e234"),
        ("avm_git_file", "main.tf"),
        ("avm_git_last_modified_at", "2023-06-05 02:21:33"),
        ("avm_git_org", "Azure"),
        ("avm_git_repo", "terraform-azurerm-aks"),
        ("avm_yor_trace", "f57d8afc-c056-4a38-b8bc-5ac303fb5737"),
    ])
}

/// Received event minus the keys the provider adds.
pub fn user_part(mut received: Tags) -> Tags {
    received.remove("event");
    received.remove("resource_id");
    received
}

pub fn assert_uuid_v4(value: &str) {
    let id = uuid::Uuid::parse_str(value).unwrap_or_else(|_| panic!("expect uuid as `id`, got: {}", value));
    assert_eq!(id.get_version(), Some(uuid::Version::Random), "id should be a v4 uuid: {}", value);
}

/// Writes a `modules.json` with a registry module (kv), its nested local
/// submodules, and a registry submodule (keys) referenced from the root.
pub fn write_manifest(data_dir: &std::path::Path) {
    let modules_dir = data_dir.join("modules");
    std::fs::create_dir_all(&modules_dir).expect("create modules dir");
    let dir = |rest: &str| format!("{}/{}", modules_dir.to_string_lossy(), rest);

    let manifest = serde_json::json!({
        "Modules": [
            { "Key": "", "Source": "", "Dir": "." },
            {
                "Key": "keys",
                "Source": "registry.terraform.io/Azure/avm-res-keyvault-vault/azurerm//modules/key",
                "Version": "0.6.1",
                "Dir": dir("keys/modules/key")
            },
            {
                "Key": "kv",
                "Source": "registry.terraform.io/Azure/avm-res-keyvault-vault/azurerm",
                "Version": "0.6.1",
                "Dir": dir("kv")
            },
            { "Key": "kv.keys", "Source": "./modules/key", "Dir": dir("kv/modules/key") },
            { "Key": "kv.secrets", "Source": "./modules/secret", "Dir": dir("kv/modules/secret") }
        ]
    });
    std::fs::write(modules_dir.join("modules.json"), manifest.to_string()).expect("write manifest");
}

pub fn module_dir(data_dir: &std::path::Path, rest: &str) -> String {
    format!("{}/{}", data_dir.join("modules").to_string_lossy(), rest)
}
