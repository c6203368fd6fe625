use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use server::startup::build_app;
use service::auth::password::HashParams;
use service::auth::repository::memory::InMemoryUserRepository;
use service::auth::token::{self, TokenConfig, DEFAULT_TTL};
use service::auth::AuthConfig;

const SECRET: &str = "e2e-secret";

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let mut cfg = AuthConfig::new(TokenConfig::new(SECRET, DEFAULT_TTL));
    cfg.hashing = HashParams { memory_kib: 64, iterations: 1, parallelism: 1 };
    let app = build_app(Arc::new(InMemoryUserRepository::default()), cfg);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_bunny_scenario() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/auth/register", app.base_url))
        .json(&json!({"name": "Bunny", "email": "bunny@example.com", "password": "Bunny22"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c.post(format!("{}/auth/login", app.base_url))
        .json(&json!({"email": "bunny@example.com", "password": "Bunny22"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    let tok = body["token"].as_str().unwrap_or_default().to_string();
    assert!(!tok.is_empty());

    let claims = token::verify(&tok, SECRET)?;
    assert_eq!(claims.email, "bunny@example.com");
    assert_eq!(body["user"]["id"], claims.id.to_string());
    assert_eq!(claims.exp - claims.iat, 5 * 60 * 60);

    let res = c.get(format!("{}/auth/users", app.base_url))
        .bearer_auth(&tok)
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let users = res.json::<Value>().await?;
    let bunny = users.as_array().unwrap().iter()
        .find(|u| u["email"] == "bunny@example.com")
        .cloned()
        .unwrap();
    assert_eq!(bunny["name"], "Bunny");
    assert!(bunny["id"].is_string());
    assert_eq!(bunny.as_object().unwrap().len(), 3);

    let res = c.get(format!("{}/auth/users", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}
