//! Integration tests for client-side rate limiting.
//!
//! Bucket timing tests run on a paused tokio clock so they are exact and
//! instant; the end-to-end test uses real time against a mock server.

use std::sync::Arc;
use std::time::Duration;

use plausible_api::clients::ListParams;
use plausible_api::{BaseUrl, PlausibleClient, PlausibleConfig, SitesApiKey, TokenBucket};
use tokio::time::Instant;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(start_paused = true)]
async fn test_throughput_never_exceeds_capacity_plus_refill() {
    // 5 credits, refilled at 0.5 per second.
    let bucket = TokenBucket::new(5, Duration::from_secs(10)).unwrap();
    let start = Instant::now();

    for granted in 1..=15u32 {
        bucket.acquire().await;
        let elapsed = start.elapsed().as_secs_f64();
        let bound = 0.5f64.mul_add(elapsed, 5.0);
        assert!(
            f64::from(granted) <= bound + 1e-9,
            "{granted} credits granted after {elapsed}s exceeds bound {bound}"
        );
    }

    // 10 credits beyond the initial burst take 20 seconds to accrue.
    assert!(start.elapsed() >= Duration::from_secs(20));
    assert!(start.elapsed() < Duration::from_secs(22));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_share_one_budget() {
    // 2 credits, refilled at 2 per second.
    let bucket = Arc::new(TokenBucket::new(2, Duration::from_secs(1)).unwrap());
    let start = Instant::now();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let bucket = Arc::clone(&bucket);
            tokio::spawn(async move {
                bucket.acquire().await;
                start.elapsed()
            })
        })
        .collect();

    let mut finished = Vec::new();
    for handle in handles {
        finished.push(handle.await.unwrap());
    }
    finished.sort();

    // Every caller eventually proceeds.
    assert_eq!(finished.len(), 10);
    // At most capacity + rate * t callers have been admitted by time t.
    for (index, at) in finished.iter().enumerate() {
        let admitted = index as f64 + 1.0;
        let bound = 2.0f64.mul_add(at.as_secs_f64(), 2.0);
        assert!(admitted <= bound + 1e-9, "caller {index} admitted at {at:?}");
    }
    assert!(*finished.last().unwrap() >= Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn test_available_stays_within_bounds() {
    let bucket = TokenBucket::new(3, Duration::from_secs(3)).unwrap();

    for step in 0..20 {
        if step % 3 == 0 {
            tokio::time::advance(Duration::from_millis(700)).await;
        } else {
            bucket.acquire().await;
        }
        let available = bucket.available().await;
        assert!((0.0..=3.0).contains(&available), "available {available}");
    }
}

#[tokio::test]
async fn test_client_operations_draw_from_the_bucket() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(4)
        .mount(&server)
        .await;

    // 2 credits, refilled at 5 per second.
    let config = PlausibleConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .sites_api_key(SitesApiKey::new("sites-key").unwrap())
        .rate_limit(2, Duration::from_millis(400))
        .build()
        .unwrap();
    let client = PlausibleClient::new(&config).unwrap();

    let start = std::time::Instant::now();
    for _ in 0..4 {
        client.list_sites(&ListParams::default()).await.unwrap();
    }

    // Two calls ride the burst; the other two wait about 200ms each.
    assert!(
        start.elapsed() >= Duration::from_millis(350),
        "elapsed {:?}",
        start.elapsed()
    );
}
