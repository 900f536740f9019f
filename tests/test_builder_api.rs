use recipe_finder::{
    generate_recipe, search_recipes, AppConfig, LocalDataset, Provider, RecipeError,
    RecipeFinder,
};

/// Builder with every outer source disabled only sees the local table
#[tokio::test]
async fn test_builder_local_only() {
    let finder = RecipeFinder::builder()
        .config(AppConfig::default())
        .without_remote()
        .without_generation()
        .build()
        .unwrap();

    assert!(!finder.generation_enabled());
    let hits = finder.search("可乐").await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id.to_string(), "1");
    assert_eq!(hits[1].id.to_string(), "mock-coke-wings");
}

/// Category matches count as local hits
#[tokio::test]
async fn test_builder_category_match() {
    let finder = RecipeFinder::builder()
        .config(AppConfig::default())
        .without_remote()
        .without_generation()
        .build()
        .unwrap();

    let hits = finder.search("家常").await.unwrap();
    assert_eq!(hits.len(), 2);
}

/// A miss with generation disabled is NotFound rather than an empty list
#[tokio::test]
async fn test_builder_miss_without_generation() {
    let finder = RecipeFinder::builder()
        .config(AppConfig::default())
        .without_remote()
        .without_generation()
        .build()
        .unwrap();

    let err = finder.search("佛跳墙").await.unwrap_err();
    assert!(matches!(err, RecipeError::NotFound(_)));
}

/// A custom local dataset replaces the built-in one
#[tokio::test]
async fn test_builder_custom_dataset() {
    let finder = RecipeFinder::builder()
        .config(AppConfig::default())
        .local_dataset(LocalDataset::new(Vec::new()))
        .without_remote()
        .without_generation()
        .build()
        .unwrap();

    assert!(finder.local().recipes().is_empty());
    assert!(finder.search("可乐").await.is_err());
}

/// Browsing with the remote source disabled yields nothing
#[tokio::test]
async fn test_builder_browse_without_remote() {
    let finder = RecipeFinder::builder()
        .config(AppConfig::default())
        .without_remote()
        .without_generation()
        .build()
        .unwrap();

    assert!(finder.browse("chicken").await.unwrap().is_empty());
}

/// Provider selection and key override build without touching the network
#[test]
fn test_builder_provider_selection() {
    for provider in [Provider::Google, Provider::OpenAI, Provider::Anthropic] {
        let finder = RecipeFinder::builder()
            .config(AppConfig::default())
            .provider(provider)
            .api_key("test-key")
            .model("some-model")
            .without_remote()
            .build();

        assert!(finder.is_ok(), "{} should build", provider.as_str());
        assert!(finder.unwrap().generation_enabled());
    }
}

/// Unknown default provider in config is a configuration error
#[test]
fn test_builder_unknown_provider() {
    let config = AppConfig {
        default_provider: "mistral".to_string(),
        ..AppConfig::default()
    };

    let result = RecipeFinder::builder()
        .config(config)
        .without_remote()
        .build();

    assert!(matches!(result, Err(RecipeError::Configuration(_))));
}

/// Test convenience function: generate_recipe
/// This test is ignored by default since it requires GEMINI_API_KEY
#[tokio::test]
#[ignore]
async fn test_convenience_generate_recipe() {
    let response = generate_recipe("鱼香肉丝").await;
    assert!(response.is_success());
}

/// Test convenience function: search_recipes
/// This test is ignored by default since it may need network access
#[tokio::test]
#[ignore]
async fn test_convenience_search_recipes() {
    let response = search_recipes("鸡翅").await;
    assert!(response.is_success());
}
