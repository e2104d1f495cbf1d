//! Integration tests for shared clients under concurrent use

mod api_harness;

use api_harness::*;
use ldclient::prelude::*;
use serde_json::{Value, json};
use std::time::Duration;

/// Transport that answers after a delay, to widen race windows
struct SlowHttpClient {
    inner: InMemoryHttpClient,
    delay: Duration,
}

#[async_trait]
impl HttpClient for SlowHttpClient {
    async fn get(&self, uri: &str, params: &Params, options: GetOptions) -> anyhow::Result<Payload> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(uri, params, options).await
    }

    async fn post(&self, uri: &str, body: &Value) -> anyhow::Result<Payload> {
        tokio::time::sleep(self.delay).await;
        self.inner.post(uri, body).await
    }
}

fn slow_client(http: &InMemoryHttpClient) -> Client {
    Client::builder()
        .with_config(ClientConfig::new(REST_URL))
        .with_http_client(SlowHttpClient {
            inner: http.clone(),
            delay: Duration::from_millis(20),
        })
        .with_default_models()
        .register::<Thing>()
        .build()
        .expect("client should build")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_calls_fetch_directory_once() {
    let http = api();
    http.route(THINGS, json!([thing("1", "A")]));
    let client = slow_client(&http);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { Thing::collection(&client).all(&Params::new()).await })
        })
        .collect();

    for result in futures::future::join_all(tasks).await {
        let things = result.expect("task panicked").expect("fetch succeeded");
        assert_eq!(acronyms(&things), vec!["A"]);
    }

    assert_eq!(http.hits(REST_URL), 1);
    assert_eq!(http.hits(THINGS), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_decoding_shares_registry() {
    let http = api();
    http.route(
        USERS,
        json!([{"@type": USER_TYPE, "username": "alice"}]),
    );
    let client = slow_client(&http);

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                if i % 3 == 0 {
                    client.registry().invalidate();
                }
                client.fetch(USERS, &Params::new()).await
            })
        })
        .collect();

    for result in futures::future::join_all(tasks).await {
        let users = result.expect("task panicked").expect("fetch succeeded").into_vec();
        assert_eq!(users[0].kind(), Some("User"));
    }
}
