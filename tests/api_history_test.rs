//! Integration tests for the history API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::util::ServiceExt;

    use voicechat::core::RunMode;

    use crate::test_utils::{body_to_json, test_app, test_config};

    fn history_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    /// Tests history is empty when the store isn't configured
    #[tokio::test]
    async fn it_returns_empty_history_without_store() {
        let (app, _state) = test_app(test_config("http://127.0.0.1:9", None));

        let response = app.oneshot(history_request("/api/history")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body, json!({"conversations": []}));
    }

    /// Tests persisted conversations are listed newest first
    #[tokio::test]
    async fn it_lists_persisted_conversations() {
        let mut supabase = mockito::Server::new_async().await;
        let mock = supabase
            .mock("GET", "/rest/v1/conversations_web_chatbot")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
                mockito::Matcher::UrlEncoded("limit".into(), "2".into()),
            ]))
            .match_header("apikey", "test-service-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {
                        "id": 2,
                        "conversation_id": "sess-new",
                        "created_at": "2026-10-02T09:00:00+00:00",
                        "messages": [
                            {"role": "user", "content": "Xin chào"},
                            {"role": "assistant", "content": "Chào bạn!"}
                        ]
                    },
                    {
                        "id": 1,
                        "conversation_id": "sess-old",
                        "created_at": "2026-10-01T09:00:00+00:00",
                        "messages": []
                    }
                ])
                .to_string(),
            )
            .create_async()
            .await;
        let (app, _state) = test_app(test_config("http://127.0.0.1:9", Some(&supabase.url())));

        let response = app
            .oneshot(history_request("/api/history?limit=2"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        mock.assert_async().await;
        let body = body_to_json(response.into_body()).await;
        let conversations = body["conversations"].as_array().unwrap();
        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[0]["conversation_id"], "sess-new");
        assert_eq!(conversations[0]["messages"][1]["content"], "Chào bạn!");
        assert_eq!(conversations[1]["id"], 1);
    }

    /// Tests store failures surface as a 500 without upstream detail
    #[tokio::test]
    async fn it_returns_500_when_store_fails() {
        let mut supabase = mockito::Server::new_async().await;
        let _mock = supabase
            .mock("GET", "/rest/v1/conversations_web_chatbot")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .with_body("upstream database is down")
            .create_async()
            .await;
        let (app, _state) = test_app(test_config("http://127.0.0.1:9", Some(&supabase.url())));

        let response = app.oneshot(history_request("/api/history")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body, json!({"error": "Có lỗi xảy ra. Vui lòng thử lại."}));
    }

    /// Tests store failure detail is attached in development
    #[tokio::test]
    async fn it_returns_store_failure_details_in_development() {
        let mut supabase = mockito::Server::new_async().await;
        let _mock = supabase
            .mock("GET", "/rest/v1/conversations_web_chatbot")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .with_body("upstream database is down")
            .create_async()
            .await;
        let mut config = test_config("http://127.0.0.1:9", Some(&supabase.url()));
        config.run_mode = RunMode::Development;
        let (app, _state) = test_app(config);

        let response = app.oneshot(history_request("/api/history")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["error"], "Có lỗi xảy ra. Vui lòng thử lại.");
        assert!(
            body["details"]
                .as_str()
                .unwrap()
                .contains("upstream database is down")
        );
    }

    /// Tests history is read only
    #[tokio::test]
    async fn it_returns_405_for_post() {
        let (app, _state) = test_app(test_config("http://127.0.0.1:9", None));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/history")
                    .method("POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
