//! # Tests Module
//!
//! HTTP-level tests for the timeline service. Routes are driven through the
//! router with `oneshot` requests against a fake signed request client that
//! serves canned Twitter payloads, so no network access is needed.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Json,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{
    error::{ApiError, ApiResult},
    handlers::{build_router, handle_health, AppState},
    oauth::TokenPair,
    twitter::{RequestToken, SignedRequestClient},
};

const AUTH: &str = "OAuth oauth_token=user-token, oauth_token_secret=user-secret";

/// A signed request client that answers every GET with the same canned result
/// and records what it was asked for.
struct FakeClient {
    response: Result<Value, (u16, Value)>,
    requests: Mutex<Vec<(String, TokenPair)>>,
}

impl FakeClient {
    fn ok(body: Value) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(body),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16, body: Value) -> Arc<Self> {
        Arc::new(Self {
            response: Err((status, body)),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl SignedRequestClient for FakeClient {
    async fn request_token(&self) -> ApiResult<RequestToken> {
        Ok(RequestToken {
            token: "req-token".to_string(),
            token_secret: "req-secret".to_string(),
            url: "https://api.twitter.com/oauth/authenticate?oauth_token=req-token".to_string(),
        })
    }

    async fn access_token(&self, request_token: &TokenPair, pin: &str) -> ApiResult<TokenPair> {
        if pin != "1234" {
            return Err(ApiError::Upstream {
                status: 401,
                body: json!("Invalid oauth_verifier parameter"),
            });
        }
        Ok(TokenPair {
            token: format!("access-for-{}", request_token.token),
            token_secret: "access-secret".to_string(),
        })
    }

    async fn get(&self, url: &str, credentials: &TokenPair) -> ApiResult<Value> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), credentials.clone()));
        match &self.response {
            Ok(body) => Ok(body.clone()),
            Err((status, body)) => Err(ApiError::Upstream {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

fn create_test_app(client: Arc<FakeClient>) -> Router {
    build_router(AppState { client })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(auth) = auth {
        builder = builder.header("x-authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

fn sample_user(screen_name: &str) -> Value {
    json!({
        "screen_name": screen_name,
        "name": format!("{} name", screen_name),
        "verified": false,
        "followers_count": 1200,
        "friends_count": 300,
        "following": true,
        "profile_image_url_https": format!("https://pbs.twimg.com/{}.jpg", screen_name),
        "profile_link_color": "1DA1F2",
        "description": "",
        "entities": {"description": {"urls": []}}
    })
}

fn sample_timeline() -> Value {
    json!([
        {
            "id_str": "10",
            "full_text": "Shipping #rustlang with @ferris https://t.co/link",
            "created_at": "Wed Oct 10 20:19:24 +0000 2018",
            "retweet_count": 1500,
            "favorite_count": 42,
            "user": sample_user("alice"),
            "entities": {
                "hashtags": [{"text": "rustlang"}],
                "user_mentions": [{"screen_name": "ferris"}],
                "urls": [{"url": "https://t.co/link", "display_url": "rust-lang.org"}]
            }
        },
        {
            "id_str": "11",
            "full_text": "RT @alice: hello",
            "created_at": "Wed Oct 10 20:20:00 +0000 2018",
            "retweet_count": 0,
            "favorite_count": 0,
            "user": sample_user("bob"),
            "entities": {},
            "retweeted_status": {
                "id_str": "9",
                "full_text": "hello",
                "created_at": "Wed Oct 10 20:00:00 +0000 2018",
                "retweet_count": 3,
                "favorite_count": 4,
                "user": sample_user("alice"),
                "entities": {}
            }
        }
    ])
}

/// Tests the health endpoint handler function directly.
#[tokio::test]
async fn test_handle_health() {
    let Json(json_response): Json<Value> = handle_health().await;

    assert_eq!(json_response["status"], "healthy");
    assert_eq!(json_response["service"], "timeline-bff");
}

/// Integration test for the health endpoint (GET /health).
#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(FakeClient::ok(json!(null)));
    let (status, body) = send(app, get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

/// The timeline is rendered from the upstream payload and the frontend's query
/// string is forwarded with extended tweet mode added.
#[tokio::test]
async fn test_timeline_endpoint_renders_tweets() {
    let client = FakeClient::ok(sample_timeline());
    let app = create_test_app(client.clone());

    let (status, body) = send(app, get("/twitter/timeline?count=2&max_id=99", Some(AUTH))).await;
    assert_eq!(status, StatusCode::OK);

    let tweets = body["tweets"].as_array().unwrap();
    assert_eq!(tweets.len(), 2);

    let first = &tweets[0];
    assert_eq!(first["id"], "10");
    assert_eq!(first["retweetCount"], "1.5K");
    assert_eq!(first["likeCount"], "42");
    assert_eq!(first["date"]["at"], "Oct 10");
    assert_eq!(first["user"]["handle"], "@alice");
    let text = first["text"].as_str().unwrap();
    assert!(text.contains(r#"<a href="https://twitter.com/hashtag/rustlang?src=hash""#));
    assert!(text.contains(r#"<a href="https://twitter.com/ferris""#));
    assert!(text.ends_with(r#"target="_blank">rust-lang.org</a>"#));

    let retweet = &tweets[1];
    assert_eq!(retweet["id"], "11");
    assert_eq!(retweet["text"], "hello");
    assert_eq!(retweet["user"]["handle"], "@alice");
    assert_eq!(retweet["retweetedBy"]["handle"], "@bob");
    assert_eq!(retweet["tweetUrl"], "https://twitter.com/alice/status/9");

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].0,
        "https://api.twitter.com/1.1/statuses/home_timeline.json?count=2&max_id=99&tweet_mode=extended"
    );
    assert_eq!(requests[0].1.token, "user-token");
    assert_eq!(requests[0].1.token_secret, "user-secret");
}

/// Requests without the x-authorization header are rejected before any upstream call.
#[tokio::test]
async fn test_timeline_endpoint_without_authorization() {
    let client = FakeClient::ok(sample_timeline());
    let app = create_test_app(client.clone());

    let (status, body) = send(app, get("/twitter/timeline", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");

    let app = create_test_app(client.clone());
    let (status, _) = send(app, get("/twitter/timeline", Some("OAuth oauth_token=only"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(client.requests.lock().unwrap().is_empty());
}

/// Upstream errors keep their status code and JSON body.
#[tokio::test]
async fn test_timeline_endpoint_passes_upstream_errors() {
    let upstream = json!({"errors": [{"code": 89, "message": "Invalid or expired token."}]});
    let app = create_test_app(FakeClient::failing(401, upstream.clone()));

    let (status, body) = send(app, get("/twitter/timeline", Some(AUTH))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], upstream);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Failed to fetch timeline"));
}

/// A payload that breaks the entity contract is reported, not silently rendered.
#[tokio::test]
async fn test_timeline_endpoint_reports_render_errors() {
    let mut timeline = sample_timeline();
    timeline[0]["entities"]["user_mentions"] = json!([{"screen_name": "nobody"}]);
    let app = create_test_app(FakeClient::ok(timeline));

    let (status, body) = send(app, get("/twitter/timeline", Some(AUTH))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("nobody"));
}

/// A tweet missing its mandatory fields fails the whole page.
#[tokio::test]
async fn test_timeline_endpoint_rejects_incomplete_tweets() {
    let app = create_test_app(FakeClient::ok(json!([{"full_text": "no id"}])));

    let (status, _) = send(app, get("/twitter/timeline", Some(AUTH))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

/// Integration test for GET /twitter/user.
#[tokio::test]
async fn test_user_endpoint() {
    let client = FakeClient::ok(sample_user("carol"));
    let app = create_test_app(client.clone());

    let (status, body) = send(app, get("/twitter/user", Some(AUTH))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "name": "carol name",
            "homepage": "https://twitter.com/carol",
            "handle": "@carol",
            "profileImage": "https://pbs.twimg.com/carol.jpg",
            "profileColor": "#1DA1F2"
        })
    );
    assert_eq!(
        client.requests.lock().unwrap()[0].0,
        "https://api.twitter.com/1.1/account/verify_credentials.json"
    );
}

/// Integration test for the PIN-based sign-in routes.
#[tokio::test]
async fn test_sign_in_flow() {
    let client = FakeClient::ok(json!(null));

    let (status, body) = send(
        create_test_app(client.clone()),
        get("/twitter/request_token", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "req-token");
    assert_eq!(body["tokenSecret"], "req-secret");
    assert!(body["url"].as_str().unwrap().ends_with("oauth_token=req-token"));

    let exchange = |pin: &str| {
        Request::builder()
            .uri("/twitter/access_token")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"token": "req-token", "tokenSecret": "req-secret", "pinCode": pin})
                    .to_string(),
            ))
            .unwrap()
    };

    let (status, body) = send(create_test_app(client.clone()), exchange("1234")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"token": "access-for-req-token", "tokenSecret": "access-secret"})
    );

    let (status, body) = send(create_test_app(client), exchange("0000")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
}
