//! Integration tests for the API client against a mock HTTP server.
//!
//! Each test spins up its own wiremock server and points a client at it,
//! exercising request shaping (query parameters, two-phase search) and
//! response handling (error refinement, fallbacks, empty results).

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use tuber::api::{ApiError, VideoApiClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> VideoApiClient {
    VideoApiClient::new(
        reqwest::Client::new(),
        SecretString::from("test-key"),
        "US",
    )
    .with_base_url(server.uri())
}

/// Complete video item in the `/videos` endpoint shape.
fn video_item(id: &str, title: &str, views: &str) -> serde_json::Value {
    json!({
        "id": id,
        "snippet": {
            "title": title,
            "description": "A description",
            "channelId": "chan-1",
            "channelTitle": "Test Channel",
            "publishedAt": "2024-05-01T12:00:00Z",
            "thumbnails": {
                "medium": { "url": "https://img.example/medium.jpg" }
            }
        },
        "contentDetails": { "duration": "PT4M13S" },
        "statistics": {
            "viewCount": views,
            "likeCount": "120",
            "commentCount": "7"
        }
    })
}

/// Search result item with the nested id shape.
fn search_item(id: &str) -> serde_json::Value {
    json!({
        "id": { "videoId": id },
        "snippet": {
            "title": "From Search",
            "channelId": "chan-1",
            "channelTitle": "Test Channel",
            "thumbnails": {
                "default": { "url": "https://img.example/default.jpg" }
            }
        }
    })
}

// ============================================================================
// Popular Chart
// ============================================================================

#[tokio::test]
async fn test_popular_includes_category_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("chart", "mostPopular"))
        .and(query_param("videoCategoryId", "20"))
        .and(query_param("regionCode", "US"))
        .and(query_param("key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [video_item("g1", "Gaming Video", "1500")] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let videos = client_for(&server).popular_videos(20, 50).await.unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].id, "g1");
    assert_eq!(videos[0].view_count, 1500);
    assert_eq!(videos[0].duration.as_deref(), Some("PT4M13S"));
}

#[tokio::test]
async fn test_popular_home_omits_category_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [video_item("h1", "Home Video", "10")] })),
        )
        .mount(&server)
        .await;

    let videos = client_for(&server).popular_videos(0, 50).await.unwrap();
    assert_eq!(videos.len(), 1);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let query = requests[0].url.query().unwrap_or("");
    assert!(
        !query.contains("videoCategoryId"),
        "category 0 must not be sent as a filter: {query}"
    );
}

#[tokio::test]
async fn test_popular_missing_items_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "listResponse" })))
        .mount(&server)
        .await;

    let videos = client_for(&server).popular_videos(0, 50).await.unwrap();
    assert!(videos.is_empty());
}

// ============================================================================
// Video Detail
// ============================================================================

#[tokio::test]
async fn test_video_detail_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "v42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [video_item("v42", "The Video", "999")] })),
        )
        .mount(&server)
        .await;

    let detail = client_for(&server)
        .video_detail("v42")
        .await
        .unwrap()
        .expect("detail present");
    assert_eq!(detail.title, "The Video");
    assert_eq!(detail.like_count, 120);
    assert_eq!(detail.comment_count, 7);
    assert_eq!(detail.watch_url(), "https://www.youtube.com/watch?v=v42");
}

#[tokio::test]
async fn test_video_detail_empty_items_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let detail = client_for(&server).video_detail("gone").await.unwrap();
    assert!(detail.is_none());
}

#[tokio::test]
async fn test_video_detail_refines_http_errors() {
    for (status, expect_quota, expect_not_found, expect_invalid) in [
        (403u16, true, false, false),
        (404, false, true, false),
        (400, false, false, true),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": { "message": "upstream says no" }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).video_detail("v1").await.unwrap_err();
        assert_eq!(matches!(err, ApiError::QuotaExceeded), expect_quota);
        assert_eq!(matches!(err, ApiError::NotFound), expect_not_found);
        assert_eq!(matches!(err, ApiError::InvalidVideoId), expect_invalid);
    }
}

#[tokio::test]
async fn test_video_detail_blank_id_rejected_without_request() {
    let server = MockServer::start().await;

    let err = client_for(&server).video_detail("   ").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_two_phase() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust tutorials"))
        .and(query_param("type", "video"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [search_item("s1"), search_item("s2")] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "s1,s2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                video_item("s1", "First", "100"),
                video_item("s2", "Second", "200"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let videos = client_for(&server)
        .search_videos("rust tutorials", 50)
        .await
        .unwrap();
    assert_eq!(videos.len(), 2);
    // Detail phase supplies the statistics the search endpoint lacks.
    assert_eq!(videos[0].view_count, 100);
    assert_eq!(videos[1].view_count, 200);
}

#[tokio::test]
async fn test_search_blank_query_makes_no_request() {
    let server = MockServer::start().await;

    let videos = client_for(&server).search_videos("   ", 50).await.unwrap();
    assert!(videos.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_search_error_propagates_without_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search_videos("anything", 50)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus(500)));

    // No popular-chart fallback fired.
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() == "/search"));
}

// ============================================================================
// Related Videos
// ============================================================================

#[tokio::test]
async fn test_related_happy_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("relatedToVideoId", "seed"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": [search_item("r1")] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "r1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [video_item("r1", "Related", "5")] })),
        )
        .mount(&server)
        .await;

    let videos = client_for(&server).related_videos("seed", 10).await.unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].id, "r1");
}

#[tokio::test]
async fn test_related_falls_back_to_popular_on_search_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("chart", "mostPopular"))
        .and(query_param("maxResults", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [video_item("p1", "Popular", "9000")] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let videos = client_for(&server).related_videos("seed", 10).await.unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].id, "p1");
}

#[tokio::test]
async fn test_related_empty_search_falls_back_to_popular() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("chart", "mostPopular"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [video_item("p1", "Popular", "1")] })),
        )
        .mount(&server)
        .await;

    let videos = client_for(&server).related_videos("seed", 10).await.unwrap();
    assert_eq!(videos[0].id, "p1");
}

#[tokio::test]
async fn test_related_blank_id_is_empty_without_request() {
    let server = MockServer::start().await;

    let videos = client_for(&server).related_videos("  ", 10).await.unwrap();
    assert!(videos.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Comments and Channel
// ============================================================================

#[tokio::test]
async fn test_comments_parse_and_order_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "v1"))
        .and(query_param("order", "relevance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "snippet": {
                    "topLevelComment": {
                        "snippet": {
                            "authorDisplayName": "viewer",
                            "authorProfileImageUrl": "https://img.example/a.jpg",
                            "textDisplay": "great video",
                            "likeCount": 3,
                            "publishedAt": "2024-05-02T08:00:00Z"
                        }
                    }
                }
            }]
        })))
        .mount(&server)
        .await;

    let comments = client_for(&server).video_comments("v1", 20).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author, "viewer");
    assert_eq!(comments[0].like_count, 3);
}

#[tokio::test]
async fn test_comments_disabled_is_empty_not_error() {
    for status in [403u16, 404] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/commentThreads"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let comments = client_for(&server).video_comments("v1", 20).await.unwrap();
        assert!(comments.is_empty());
    }
}

#[tokio::test]
async fn test_channel_detail_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "chan-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "chan-1",
                "snippet": {
                    "title": "Test Channel",
                    "thumbnails": { "default": { "url": "https://img.example/c.jpg" } }
                },
                "statistics": { "subscriberCount": "52000" }
            }]
        })))
        .mount(&server)
        .await;

    let channel = client_for(&server)
        .channel_detail("chan-1")
        .await
        .expect("channel present");
    assert_eq!(channel.title, "Test Channel");
    assert_eq!(channel.subscriber_count, 52000);
}

#[tokio::test]
async fn test_channel_detail_failure_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client_for(&server).channel_detail("chan-1").await.is_none());
}
