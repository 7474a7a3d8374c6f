use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use configs::AppConfig;
use server::{routes, startup};

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

struct TestApp {
    base_url: String,
    data_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Isolated users file per test run
    let data_dir = std::env::temp_dir().join(format!("e2e_users_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.storage.users_file = data_dir.join("users.json");
    service::runtime::ensure_env(&cfg.storage.users_file, true).await?;

    let app: Router = routes::build_router(startup::build_state(&cfg), cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_dir })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_user_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let payload = json!({
        "username": "alice",
        "password": "p",
        "admin": false,
        "name": "Alice",
        "date_of_birth": "2000-01-01",
        "email": "a@x.com",
        "roles": ["student"],
        "courses": ["cs101"]
    });

    // Create
    let res = c.post(format!("{}/api/v1.0/users/new/", app.base_url)).json(&payload).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    assert_eq!(created["username"], "alice");

    // Fetch
    let res = c.get(format!("{}/api/v1.0/users/alice/", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?, created);

    // Search with an encoded value
    let res = c
        .get(format!("{}/api/v1.0/users/search/", app.base_url))
        .query(&[("email", "A@X.com")])
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["users"].as_array().map(Vec::len), Some(1));

    // Delete twice
    let res = c.delete(format!("{}/api/v1.0/users/alice/remove/", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.delete(format!("{}/api/v1.0/users/alice/remove/", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<serde_json::Value>().await?, json!({"error": "User not found"}));
    Ok(())
}
