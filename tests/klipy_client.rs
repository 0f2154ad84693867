use klipy_tray::config::ClientConfig;
use klipy_tray::klipy::{AdParameters, Klipy};
use klipy_tray::types::{ItemsSelector, MediaKind};
use klipy_tray::{ApiError, MediaApi};
use mockito::Matcher;
use serde_json::json;

fn client(base_url: String) -> Klipy {
    Klipy::new(ClientConfig {
        base_url,
        ..ClientConfig::new("test-key")
    })
    .expect("client")
}

const PAGE_BODY: &str = r#"{
    "result": true,
    "data": {
        "data": [
            { "id": 1001, "slug": "happy-cat", "title": "Happy cat", "type": "gif" },
            { "id": "1002", "slug": "sad-cat", "type": "gif" }
        ],
        "current_page": 1,
        "per_page": 24,
        "has_next": true
    }
}"#;

#[tokio::test]
async fn test_trending_decodes_page() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/test-key/gifs/trending")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("per_page".into(), "24".into()),
            Matcher::UrlEncoded("customer_id".into(), "cust-1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PAGE_BODY)
        .create_async()
        .await;

    let page = client(server.url())
        .trending(MediaKind::Gif, Some("cust-1"), Some(1), Some(24), None)
        .await
        .expect("trending page");

    mock.assert_async().await;
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, "1001");
    assert_eq!(page.items[0].label(), "Happy cat");
    assert_eq!(page.items[1].id, "1002");
    assert!(page.has_next);
}

#[tokio::test]
async fn test_search_sends_query_and_locale() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/test-key/stickers/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "happy cat".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("locale".into(), "de_DE".into()),
            Matcher::UrlEncoded("customer_id".into(), "cust-9".into()),
        ]))
        .with_status(200)
        .with_body(PAGE_BODY)
        .create_async()
        .await;

    let page = client(server.url())
        .search(
            MediaKind::Sticker,
            "happy cat",
            Some("cust-9"),
            Some(2),
            None,
            Some("de_DE"),
        )
        .await
        .expect("search page");

    mock.assert_async().await;
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn test_recent_puts_customer_id_in_path() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/test-key/clips/recent/cust-1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(PAGE_BODY)
        .create_async()
        .await;

    let klipy = client(server.url());
    klipy
        .recent(MediaKind::Clip, "cust-1", Some(1), None, None)
        .await
        .expect("recent page");
    mock.assert_async().await;

    let missing = klipy.recent(MediaKind::Clip, " ", Some(1), None, None).await;
    assert!(matches!(missing, Err(ApiError::InvalidRequest(_))));
}

#[tokio::test]
async fn test_recent_with_ads_adds_ad_parameters() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/test-key/gifs/recent/cust-1")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("ad-min-width".into(), "50".into()),
            Matcher::UrlEncoded("ad-max-height".into(), "250".into()),
        ]))
        .with_status(200)
        .with_body(PAGE_BODY)
        .create_async()
        .await;

    let ads = AdParameters {
        min_width: 50,
        max_width: 320,
        min_height: 50,
        max_height: 250,
        language: None,
        user_agent: None,
    };
    client(server.url())
        .recent_with_ads(MediaKind::Gif, "cust-1", Some(1), None, None, &ads)
        .await
        .expect("recent page with ads");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_categories_unwraps_payload() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/v1/test-key/gifs/categories")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "result": true,
                "data": {
                    "locale": "en_US",
                    "categories": [
                        { "category": "Trending", "query": "trending", "preview_url": "t.gif" },
                        { "category": "Happy", "query": "happy" }
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let categories = client(server.url())
        .categories(MediaKind::Gif, None)
        .await
        .expect("categories");

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].display_name, "Trending");
    assert_eq!(categories[1].id(), "happy");
    assert_eq!(categories[1].preview_url, None);
}

#[tokio::test]
async fn test_http_error_keeps_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/v1/test-key/gifs/trending")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body("forbidden")
        .create_async()
        .await;

    let err = client(server.url())
        .trending(MediaKind::Gif, None, Some(1), None, None)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Http {
            status: 403,
            body: "forbidden".into()
        }
    );
}

#[tokio::test]
async fn test_malformed_page_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/v1/test-key/gifs/trending")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"result": true, "data": {"items": []}}"#)
        .create_async()
        .await;

    let err = client(server.url())
        .trending(MediaKind::Gif, None, None, None, None)
        .await
        .unwrap_err();
    assert!(err.is_decode());
}

#[tokio::test]
async fn test_suggestions_treat_bad_payload_as_empty() {
    let mut server = mockito::Server::new_async().await;
    let _good = server
        .mock("GET", "/api/v1/test-key/search-suggestions/cat")
        .match_query(Matcher::UrlEncoded("limit".into(), "5".into()))
        .with_status(200)
        .with_body(r#"{"result": true, "data": ["cat", "cats", "cat dance"]}"#)
        .create_async()
        .await;
    let _bad = server
        .mock("GET", "/api/v1/test-key/search-autocomplete/ca")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"result": true, "data": {"unexpected": 1}}"#)
        .create_async()
        .await;

    let klipy = client(server.url());
    assert_eq!(
        klipy.search_suggestions("cat", 5).await.unwrap(),
        vec!["cat", "cats", "cat dance"]
    );
    assert!(klipy.autocomplete("ca", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_items_joins_selector_values() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/test-key/gifs/items")
        .match_query(Matcher::UrlEncoded("slugs".into(), "happy-cat,sad-cat".into()))
        .with_status(200)
        .with_body(r#"{"result": true, "data": {"data": [{"id": 1, "slug": "happy-cat"}]}}"#)
        .create_async()
        .await;

    let klipy = client(server.url());
    let items = klipy
        .items(
            MediaKind::Gif,
            &ItemsSelector::Slugs(vec!["happy-cat".into(), " sad-cat ".into()]),
        )
        .await
        .expect("items");
    mock.assert_async().await;
    assert_eq!(items.len(), 1);

    let empty = klipy
        .items(MediaKind::Gif, &ItemsSelector::Ids(vec!["  ".into()]))
        .await;
    assert!(matches!(empty, Err(ApiError::InvalidRequest(_))));
}

#[tokio::test]
async fn test_single_item_lookup() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/v1/test-key/clips/wave-hello")
        .with_status(200)
        .with_body(
            r#"{"result": true, "data": {"id": 7, "slug": "wave-hello", "type": "clip",
                "file": {"md": {"mp4": {"url": "https://cdn.example/wave.mp4"}}}}}"#,
        )
        .create_async()
        .await;

    let item = client(server.url())
        .item(MediaKind::Clip, "wave-hello")
        .await
        .expect("item");
    assert_eq!(item.id, "7");
    assert_eq!(item.kind, MediaKind::Clip);
    assert_eq!(item.share_url(), Some("https://cdn.example/wave.mp4"));
}

#[tokio::test]
async fn test_share_and_hide_hooks() {
    let mut server = mockito::Server::new_async().await;
    let share = server
        .mock("POST", "/api/v1/test-key/gifs/share/happy-cat")
        .match_body(Matcher::Json(json!({ "customer_id": "cust-1", "q": "cats" })))
        .with_status(204)
        .create_async()
        .await;
    let hide = server
        .mock("DELETE", "/api/v1/test-key/gifs/recent/cust-1/happy-cat")
        .with_status(200)
        .create_async()
        .await;
    let report = server
        .mock("POST", "/api/v1/test-key/gifs/report/happy-cat")
        .match_body(Matcher::Json(json!({ "reason": "spam" })))
        .with_status(200)
        .create_async()
        .await;

    let klipy = client(server.url());
    klipy
        .trigger_share(MediaKind::Gif, "happy-cat", "cust-1", "cats")
        .await
        .expect("share");
    klipy
        .hide_from_recent(MediaKind::Gif, "cust-1", "happy-cat")
        .await
        .expect("hide");
    klipy
        .report(MediaKind::Gif, "happy-cat", None, "spam")
        .await
        .expect("report");

    share.assert_async().await;
    hide.assert_async().await;
    report.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let err = client("http://127.0.0.1:9".into())
        .trending(MediaKind::Gif, None, None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
