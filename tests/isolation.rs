//! Concurrent requests must never see each other's overrides.

use std::collections::HashMap;
use axum::http::StatusCode;
use serde_json::json;

use config_override::overrides::{codec, OverrideSet};

mod common;
use common::{get, server, start_server, test_config, COOKIE_NAME};

fn cookie_for(domain: &str) -> String {
    let mut set = OverrideSet::new();
    set.insert("API_DOMAIN".into(), json!(domain));
    codec::encode(&set)
}

#[tokio::test]
async fn test_interleaved_requests_in_process() {
    let router = server(test_config(true)).router();
    let alpha = cookie_for("alpha.example.com");
    let beta = cookie_for("beta.example.com");

    let (a, b, plain) = tokio::join!(
        get(&router, "/slow/API_DOMAIN", Some(&alpha)),
        get(&router, "/slow/API_DOMAIN", Some(&beta)),
        get(&router, "/slow/API_DOMAIN", None),
    );

    assert_eq!(a.2, "alpha.example.com|alpha.example.com");
    assert_eq!(b.2, "beta.example.com|beta.example.com");
    assert_eq!(plain.2, "api.example.com|api.example.com");
}

#[tokio::test]
async fn test_concurrent_clients_over_tcp() {
    let (addr, shutdown) = start_server(server(test_config(true))).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let mut tasks = Vec::new();
    for i in 0..16 {
        let client = client.clone();
        let url = format!("http://{}/slow/API_DOMAIN", addr);
        // Every fourth client sends no cookie at all.
        let domain = (i % 4 != 0).then(|| format!("tenant-{}.example.com", i));
        tasks.push(tokio::spawn(async move {
            let mut req = client.get(&url);
            if let Some(d) = &domain {
                req = req.header("Cookie", format!("{}={}", COOKIE_NAME, cookie_for(d)));
            }
            let res = req.send().await.expect("server unreachable");
            assert_eq!(res.status(), StatusCode::OK);
            (domain, res.text().await.unwrap())
        }));
    }

    let mut seen = HashMap::new();
    for task in tasks {
        let (domain, body) = task.await.unwrap();
        let expected = domain.clone().unwrap_or_else(|| "api.example.com".to_string());
        assert_eq!(body, format!("{}|{}", expected, expected));
        *seen.entry(domain.is_some()).or_insert(0) += 1;
    }
    assert_eq!(seen.get(&true), Some(&12));
    assert_eq!(seen.get(&false), Some(&4));

    shutdown.trigger();
}

#[tokio::test]
async fn test_update_then_replay_over_tcp() {
    let (addr, shutdown) = start_server(server(test_config(true))).await;
    let client = reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let res = client
        .get(format!("http://{}/config_override/update/API_DOMAIN/bar/?redirect=1", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    let set_cookie = res
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    let pair = set_cookie.split(';').next().unwrap().to_string();

    // A different client without the cookie keeps the baseline.
    let other = client
        .get(format!("http://{}/probe/API_DOMAIN", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(other.text().await.unwrap(), "api.example.com");

    let replay = client
        .get(format!("http://{}/probe/API_DOMAIN", addr))
        .header("Cookie", pair)
        .send()
        .await
        .unwrap();
    assert_eq!(replay.text().await.unwrap(), "bar");

    shutdown.trigger();
}
