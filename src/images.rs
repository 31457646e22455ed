//! The images module requests one generated image per parsed product and
//! attaches the resulting URLs to the records.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::future::Future;

use crate::reply::Product;
use crate::storage::{IMAGE_OP, ResponseCache};

const IMAGES_ENDPOINT: &str = "https://api.openai.com/v1/images/generations";
const IMAGE_SIZE: &str = "512x512";

/// An image-generation backend returning one retrieval URL per prompt.
///
/// The production implementation is [`OpenAiImages`]; tests substitute a
/// stub.
pub trait ImageProvider {
    /// Requests one generated image for `prompt` and returns its URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails or the response carries
    /// no result
    fn generate_image(&self, prompt: &str) -> impl Future<Output = Result<String>>;
}

/// Image generation backed by the hosted images API.
pub struct OpenAiImages {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiImages {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

impl ImageProvider for OpenAiImages {
    /// Requests one 512x512 image and returns the first result URL.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The backend call fails (auth, rate limit, network)
    /// * The response is not a success status
    /// * The response body carries no result URL
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(IMAGES_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "prompt": prompt,
                "n": 1,
                "size": IMAGE_SIZE,
            }))
            .send()
            .await
            .context("Image generation request failed")?
            .error_for_status()
            .context("Image generation returned an error status")?;

        let body: serde_json::Value = response
            .json()
            .await
            .context("Failed to decode image generation response")?;

        body.get("data")
            .and_then(|data| data.get(0))
            .and_then(|entry| entry.get("url"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("Image generation response carried no result URL"))
    }
}

/// Derives the image prompt for a product from its name and design
/// description, both lower-cased.
pub fn image_prompt(product: &Product) -> String {
    format!(
        "A high quality photo of a {} with a {}",
        product.name.to_lowercase(),
        product.design_alt_text.to_lowercase()
    )
}

/// Attaches one generated image URL to every product, strictly
/// sequentially, with a progress bar for the operator.
///
/// Each call goes through the cache keyed by the prompt text, so identical
/// prompts across runs reuse the stored URL. Any backend failure aborts the
/// run with no partial output.
///
/// # Errors
///
/// Returns an error if:
/// * An image generation call fails
/// * Cache operations fail
pub async fn attach_images<P: ImageProvider>(
    provider: &P,
    cache: &dyn ResponseCache,
    products: &mut [Product],
) -> Result<()> {
    info!("Generating images for {} products...", products.len());

    let progress = ProgressBar::new(products.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len}")?
            .progress_chars("=> "),
    );

    for product in products.iter_mut() {
        let prompt = image_prompt(product);
        let url = if let Some(cached) = cache.lookup(IMAGE_OP, &prompt)? {
            debug!("Cache hit for image prompt: {prompt}");
            cached
        } else {
            let generated = provider.generate_image(&prompt).await?;
            cache.store(IMAGE_OP, &prompt, &generated)?;
            generated
        };

        product.image = Some(url);
        progress.inc(1);
    }

    progress.finish_and_clear();

    Ok(())
}
