//! merchgen is a CLI tool that drafts a merchandise store concept for a
//! non-profit from its webpage.
//!
//! The pipeline is strictly sequential: fetch the page, extract its visible
//! text, ask a chat model for a store concept, parse the reply into
//! website content and products, generate one image per product, and write
//! a single JSON document to the output path. External calls are memoized
//! in a local response-cache database, so re-runs with identical inputs
//! skip the network.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use llm::builder::{LLMBackend, LLMBuilder};
use log::{LevelFilter, info};
use url::Url;

use merchgen::{
    NarrativeContext, NarrativeReply, attach_images, compose, constants::API_KEY_ENV_NAME,
    constants::SYSTEM_PROMPT, fetch_page, generate_narrative, images::OpenAiImages,
    parse_products, parse_website_content, storage::Storage, visible_text,
};

const CHAT_MODEL: &str = "gpt-4";
const CHAT_TEMPERATURE: f32 = 0.7;
const CHAT_MAX_TOKENS: u32 = 2000;
const CHAT_TIMEOUT_SECONDS: u64 = 120;

/// A CLI tool to draft a merch store concept from a non-profit webpage
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// URL of the non-profit webpage to scrape
    url: String,
    /// Path to the output file for the store concept JSON
    output: String,
    /// Path to the response cache database
    #[arg(long, short, default_value = "merchgen.db")]
    cache: String,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Output v(v...)erbosity: error (0), warn (1), info (2), debug (3), trace (4)", default_value_t = 2)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    let api_key = std::env::var(API_KEY_ENV_NAME).with_context(|| {
        format!("Set {API_KEY_ENV_NAME} to the backend credential before running")
    })?;
    let url = Url::parse(&cli.url).map_err(|e| anyhow::anyhow!("Invalid url: {}", e))?;

    let storage = Storage::new(&cli.cache)?;
    let client = reqwest::Client::new();

    let html = fetch_page(&client, &storage, &url).await?;
    let text = visible_text(&html);
    info!("Extracted {} characters of visible text", text.len());

    let model = LLMBuilder::new()
        .backend(LLMBackend::OpenAI)
        .model(CHAT_MODEL)
        .api_key(api_key.clone())
        .system(SYSTEM_PROMPT)
        .temperature(CHAT_TEMPERATURE)
        .max_tokens(CHAT_MAX_TOKENS)
        .timeout_seconds(CHAT_TIMEOUT_SECONDS)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build LLM model: {}", e))?;

    let ctx = NarrativeContext {
        model: model.as_ref(),
        cache: &storage,
    };

    let reply = NarrativeReply::new(generate_narrative(&ctx, &text).await?);
    let website_content = parse_website_content(reply.main_content()?)?;
    let mut products = parse_products(reply.products_section()?);
    info!("Parsed {} products from the reply", products.len());

    let image_provider = OpenAiImages::new(client, api_key);
    attach_images(&image_provider, &storage, &mut products).await?;

    compose(&website_content, &products, &cli.output)
}
