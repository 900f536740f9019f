use mockito::{Matcher, Mock, Server, ServerGuard};
use recipe_finder::providers::GoogleProvider;
use recipe_finder::{ApiResponse, AppConfig, Recipe, RecipeError, RecipeFinder};
use serde_json::json;

const GEMINI_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

async fn mock_gemini(server: &mut ServerGuard, text: &str, expected_calls: usize) -> Mock {
    let body = json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
    .to_string();

    server
        .mock("POST", GEMINI_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(expected_calls)
        .create_async()
        .await
}

fn finder(server: &ServerGuard, api_key: Option<&str>) -> RecipeFinder {
    let provider = GoogleProvider::with_base_url(
        api_key.map(String::from),
        server.url(),
        "gemini-1.5-flash".to_string(),
    );

    RecipeFinder::builder()
        .config(AppConfig::default())
        .llm(Box::new(provider))
        .without_remote()
        .build()
        .unwrap()
}

/// A substring of a local dish name is answered locally, without the model
#[tokio::test]
async fn test_local_hit_skips_generation() {
    let mut server = Server::new_async().await;
    let mock = mock_gemini(&mut server, "{}", 0).await;

    let results = finder(&server, Some("test-key"))
        .search("鸡蛋")
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "西红柿炒鸡蛋");
    assert_eq!(results[0].id.to_string(), "2");
    mock.assert_async().await;
}

/// A local miss goes to the generator exactly once
#[tokio::test]
async fn test_local_miss_generates_once() {
    let mut server = Server::new_async().await;
    let mock = mock_gemini(
        &mut server,
        r#"{"name": "奥特曼炒蛋", "ingredients": [], "instructions": ""}"#,
        1,
    )
    .await;

    let results = finder(&server, Some("test-key"))
        .search("奥特曼炒蛋")
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].is_generated());
    assert_eq!(results[0].name, "奥特曼炒蛋");
    assert!(results[0].ingredients.is_empty());
    mock.assert_async().await;
}

/// Generation failures come back as an error response, not a panic
#[tokio::test]
async fn test_search_failure_becomes_error_response() {
    let mut server = Server::new_async().await;
    let _mock = mock_gemini(&mut server, "not json at all", 1).await;

    let response: ApiResponse<Vec<Recipe>> = finder(&server, Some("test-key"))
        .search("火星炸鸡")
        .await
        .into();

    let value = serde_json::to_value(&response).unwrap();
    assert!(value.get("success").is_none());
    assert_eq!(value["error"], recipe_finder::error::GENERATION_FAILED_MESSAGE);
}

/// Without a credential the search reports the configuration problem
#[tokio::test]
async fn test_search_without_credential() {
    let mut server = Server::new_async().await;
    let mock = mock_gemini(&mut server, "{}", 0).await;

    let err = finder(&server, None)
        .search("火星炸鸡")
        .await
        .unwrap_err();

    assert!(matches!(err, RecipeError::Configuration(_)));
    assert!(err.user_message().contains("GEMINI_API_KEY"));
    mock.assert_async().await;
}

/// A generated id regenerates from the dish name passed alongside it
#[tokio::test]
async fn test_detail_regenerates_generated_id() {
    let mut server = Server::new_async().await;
    let mock = mock_gemini(
        &mut server,
        r#"{"ingredients": [{"name": "豆腐", "measure": "1块"}], "instructions": "炖。"}"#,
        1,
    )
    .await;

    let recipe = finder(&server, Some("test-key"))
        .detail("ai-1718000000000", Some("麻婆豆腐"))
        .await
        .unwrap();

    assert!(recipe.is_generated());
    assert_eq!(recipe.id.to_string(), "ai-1718000000000");
    assert_eq!(recipe.name, "麻婆豆腐");
    assert_eq!(recipe.ingredients.len(), 1);
    mock.assert_async().await;
}

/// A generated id with no dish name cannot be recovered
#[tokio::test]
async fn test_detail_generated_id_without_name() {
    let mut server = Server::new_async().await;
    let mock = mock_gemini(&mut server, "{}", 0).await;

    let err = finder(&server, Some("test-key"))
        .detail("ai-1718000000000", None)
        .await
        .unwrap_err();

    assert!(matches!(err, RecipeError::NotFound(_)));
    mock.assert_async().await;
}

/// Local ids are served from the dataset
#[tokio::test]
async fn test_detail_local_id() {
    let mut server = Server::new_async().await;
    let mock = mock_gemini(&mut server, "{}", 0).await;

    let recipe = finder(&server, Some("test-key"))
        .detail("mock-coke-wings", None)
        .await
        .unwrap();

    assert_eq!(recipe.area, "China");
    assert_eq!(recipe.ingredients.len(), 4);
    mock.assert_async().await;
}
