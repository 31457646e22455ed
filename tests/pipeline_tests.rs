use spectral::assert_that;
use url::Url;

use merchgen::storage::{FETCH_OP, ResponseCache, Storage};
use merchgen::{
    NarrativeContext, NarrativeReply, attach_images, compose, fetch_page, generate_narrative,
    parse_products, parse_website_content, visible_text,
};

use crate::pipeline_extras::{StubImageProvider, StubLlmProvider};

mod pipeline_extras;

const HTML_FIXTURE: &str = r#"<html>
<head>
    <title>Whale Trust</title>
    <meta name="description" content="hidden meta">
    <script>trackVisitors();</script>
</head>
<body>
    <!-- navigation placeholder -->
    <h1>Whale Trust</h1>
    <p>We protect whales and their habitats.</p>
</body>
</html>"#;

const REPLY_FIXTURE: &str = "Reasoning: Everyday items sell best.\n\n\
Description of the website: A calm ocean-themed store.\n\n\
Main content section:\n\
Header: Gear for the deep\n\
Description: Every purchase protects a whale.\n\
Primary color: #013a63\n\
Secondary color: #e8f1f2\n\
Accent color: #f4a261\n\n\
Products:\n\
Name: Mug\n\
Description: A deep blue mug for early mornings.\n\
Price: 500\n\
Alt-text for design: a blue whale diving through waves, watercolor style\n\n";

#[tokio::test]
async fn narrative_generation_is_cached_across_calls() {
    let storage = Storage::in_memory().expect("in-memory storage");
    let stub = StubLlmProvider::new(REPLY_FIXTURE.to_owned());
    let context = NarrativeContext {
        model: &stub,
        cache: &storage,
    };

    let first = generate_narrative(&context, "We protect whales.")
        .await
        .expect("first narrative");
    let second = generate_narrative(&context, "We protect whales.")
        .await
        .expect("second narrative");

    assert_that(&first).is_equal_to(second);
    assert_that(&stub.calls()).is_equal_to(1_usize);
}

#[tokio::test]
async fn cached_fetch_short_circuits_the_network() {
    let storage = Storage::in_memory().expect("in-memory storage");
    let url = Url::parse("http://localhost:9/unreachable").expect("url");
    storage
        .store(FETCH_OP, url.as_str(), "<html><body>cached body</body></html>")
        .expect("seed cache");

    // Nothing listens on the target; only the cache can satisfy this.
    let body = fetch_page(&reqwest::Client::new(), &storage, &url)
        .await
        .expect("cached fetch");

    assert_that(&body).is_equal_to("<html><body>cached body</body></html>".to_owned());
}

#[tokio::test]
async fn image_generation_is_cached_by_prompt() {
    let storage = Storage::in_memory().expect("in-memory storage");
    let reply = NarrativeReply::new(REPLY_FIXTURE.to_owned());
    let mut products = parse_products(reply.products_section().expect("products section"));
    let provider = StubImageProvider::default();

    attach_images(&provider, &storage, &mut products)
        .await
        .expect("first attach");
    let first_urls: Vec<Option<String>> = products.iter().map(|p| p.image.clone()).collect();

    let mut rerun_products = parse_products(reply.products_section().expect("products section"));
    attach_images(&provider, &storage, &mut rerun_products)
        .await
        .expect("second attach");
    let second_urls: Vec<Option<String>> = rerun_products.iter().map(|p| p.image.clone()).collect();

    assert_that(&second_urls).is_equal_to(first_urls);
    assert_that(&provider.calls()).is_equal_to(products.len());
}

#[tokio::test]
async fn pipeline_composes_expected_document_from_fixture() {
    let storage = Storage::in_memory().expect("in-memory storage");

    let text = visible_text(HTML_FIXTURE);
    assert!(text.contains("We protect whales"));
    assert!(!text.contains("trackVisitors"));
    assert!(!text.contains("navigation placeholder"));

    let stub = StubLlmProvider::new(REPLY_FIXTURE.to_owned());
    let context = NarrativeContext {
        model: &stub,
        cache: &storage,
    };
    let reply = NarrativeReply::new(
        generate_narrative(&context, &text)
            .await
            .expect("narrative"),
    );

    let website_content =
        parse_website_content(reply.main_content().expect("main content")).expect("content");
    let mut products = parse_products(reply.products_section().expect("products section"));
    assert_that(&products.len()).is_equal_to(1_usize);

    let provider = StubImageProvider::default();
    attach_images(&provider, &storage, &mut products)
        .await
        .expect("attach images");

    let output_dir = tempfile::tempdir().expect("temp dir");
    let output_path = output_dir.path().join("store.json");
    let output_path = output_path.to_str().expect("utf-8 path");
    compose(&website_content, &products, output_path).expect("compose");

    let raw = std::fs::read_to_string(output_path).expect("read output");
    let document: serde_json::Value = serde_json::from_str(&raw).expect("valid json");

    let content = document.get("content").expect("content key");
    assert_that(&content.get("header").and_then(serde_json::Value::as_str))
        .is_equal_to(Some("Gear for the deep"));
    let theme = content.get("theme").expect("theme key");
    for color in ["primary_color", "secondary_color", "accent_color"] {
        assert!(theme.get(color).and_then(serde_json::Value::as_str).is_some());
    }

    let listed = document
        .get("products")
        .and_then(serde_json::Value::as_array)
        .expect("products array");
    assert_that(&listed.len()).is_equal_to(1_usize);
    let product = listed.first().expect("one product");
    assert_that(&product.get("price").and_then(serde_json::Value::as_u64))
        .is_equal_to(Some(5000_u64));
    assert!(product.get("image").and_then(serde_json::Value::as_str).is_some());
}
