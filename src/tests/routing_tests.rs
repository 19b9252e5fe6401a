use tower::ServiceExt;

use super::utils::*;

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = create_test_app(&closed_port_url(), &closed_port_url(), 60);

    let response = app.oneshot(get("/does-not-exist")).await.unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(response_json(response).await, serde_json::json!({ "error": "Not found" }));
}

#[tokio::test]
async fn test_index_renders_site_key() {
    let app = create_test_app(&closed_port_url(), &closed_port_url(), 60);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), 200);
    let html = response_text(response).await;

    assert!(html.contains(&format!(r#"data-sitekey="{SITE_KEY}""#)));
    assert!(html.contains("/send-invites"));
}
