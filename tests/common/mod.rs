use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use sha2::{Digest, Sha512};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub const ACCOUNT: &str = "horns&hoofs";
pub const LOGIN: &str = "h&f";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let interests = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/interests.json");
        let child = Command::new(env!("CARGO_BIN_EXE_scoring-api"))
            .env("SCORING_HOST", "127.0.0.1")
            .env("SCORING_PORT", port.to_string())
            .env("SCORING_LOG_LEVEL", "warn")
            .env("AUTH_SALT", "Otus")
            .env("AUTH_ADMIN_LOGIN", "admin")
            .env("AUTH_ADMIN_SALT", "42")
            .env("AUTH_ADMIN_SCORE", "42")
            .env("STORE_INTERESTS_FILE", interests)
            .env_remove("SCORING_LOG_FILE")
            .env_remove("RUST_LOG")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    /// POST a raw body to `/method` and return status plus parsed reply
    pub async fn post_raw(&self, body: String) -> Result<(StatusCode, Value)> {
        let resp = reqwest::Client::new()
            .post(format!("{}/method", self.base_url))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await?;
        let status = resp.status();
        let json = resp.json::<Value>().await.context("reply is not JSON")?;
        Ok((status, json))
    }

    pub async fn post(&self, body: &Value) -> Result<(StatusCode, Value)> {
        self.post_raw(body.to_string()).await
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

pub fn sha512_hex(input: &str) -> String {
    format!("{:x}", Sha512::digest(input.as_bytes()))
}

pub fn user_token(account: &str, login: &str) -> String {
    sha512_hex(&format!("{}{}Otus", account, login))
}

pub fn admin_token() -> String {
    sha512_hex(&format!("{}42", chrono::Local::now().format("%Y%m%d%H")))
}

/// A signed envelope for an ordinary user
pub fn user_request(method: &str, arguments: Value) -> Value {
    serde_json::json!({
        "account": ACCOUNT,
        "login": LOGIN,
        "method": method,
        "token": user_token(ACCOUNT, LOGIN),
        "arguments": arguments,
    })
}
