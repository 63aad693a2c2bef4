use ipmanager_control::{create_router, AppState};
use ipmanager_engine::{
    AddressBlock, AddressGroup, IpOptions, IpService, MemoryCache, NetworkDescriptor,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Wait for a TCP port to accept connections
pub async fn wait_for_port(addr: SocketAddr, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if tokio::time::Instant::now() > deadline {
            panic!("Timed out waiting for {} to be ready", addr);
        }
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// Options shared by most tests: one legacy group and one configured network
pub fn test_options() -> IpOptions {
    IpOptions {
        cooldown_minutes: 5,
        groups: vec![
            AddressGroup {
                name: "servers".to_string(),
                blocks: vec![AddressBlock { min: 100, max: 103 }],
            },
            AddressGroup {
                name: "printers".to_string(),
                blocks: vec![
                    AddressBlock { min: 200, max: 201 },
                    AddressBlock { min: 210, max: 215 },
                ],
            },
        ],
        networks: vec![NetworkDescriptor {
            name: "lab".to_string(),
            cidr_subnet: Some("10.10.0.0/23".to_string()),
            dhcp_start_address: Some("10.10.1.50".to_string()),
        }],
        ..IpOptions::default()
    }
}

/// HTTP surface running in-process on an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    server: JoinHandle<()>,
}

impl TestServer {
    pub async fn new() -> Self {
        Self::with_options(test_options()).await
    }

    pub async fn with_options(options: IpOptions) -> Self {
        let cache = Arc::new(MemoryCache::new());
        let state = Arc::new(AppState {
            ip_service: IpService::new(options, cache),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind ephemeral port");
        let addr = listener.local_addr().expect("No local address");

        let app = create_router(state);
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });

        wait_for_port(addr, Duration::from_secs(5)).await;

        Self {
            addr,
            client: reqwest::Client::new(),
            server,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Ask for a free address in a group; "" means none
    pub async fn group_address(&self, group: &str, used: &[&str]) -> String {
        let resp = self
            .client
            .post(self.url(&format!("/api/ip/groups/{}/unused", group)))
            .json(&serde_json::json!({ "used_addresses": used }))
            .send()
            .await
            .expect("Failed to request group address");
        assert!(resp.status().is_success(), "status {}", resp.status());

        let body: AddressResponse = resp.json().await.expect("Failed to parse response");
        body.address
    }

    pub async fn release(&self, address: &str) {
        let resp = self
            .client
            .post(self.url("/api/ip/release"))
            .json(&serde_json::json!({ "address": address }))
            .send()
            .await
            .expect("Failed to release");
        assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);
    }

    pub async fn in_cooldown(&self, address: &str) -> bool {
        let body: CooldownResponse = self
            .client
            .get(self.url(&format!("/api/ip/cooldown/{}", address)))
            .send()
            .await
            .expect("Failed to query cooldown")
            .json()
            .await
            .expect("Failed to parse response");
        body.in_cooldown
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Response types for deserialization
#[derive(Debug, serde::Deserialize)]
pub struct AddressResponse {
    pub address: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct GroupResponse {
    pub group: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct CooldownResponse {
    pub address: String,
    pub in_cooldown: bool,
}
