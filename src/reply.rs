//! The reply module parses the model's free-text narrative reply into a
//! structured website-content record and a list of product records.
//!
//! The reply structure is enforced upstream by the instruction template:
//! labeled sections in a fixed order, split on literal section markers.
//! [`NarrativeReply`] owns all marker matching.

use anyhow::Result;
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Marker opening the reply region with the store description. The region
/// feeds nothing downstream and is not extracted.
pub const WEBSITE_DESCRIPTION_MARKER: &str = "Description of the website:";
/// Marker opening the main-content region of the reply.
pub const MAIN_CONTENT_MARKER: &str = "Main content section:";
/// Marker opening the product-list region of the reply.
pub const PRODUCTS_MARKER: &str = "Products:";

/// Price stored when the model's price line is not a plain integer.
pub const FALLBACK_PRICE: u32 = 10000;

static WEBSITE_CONTENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)Header: (.+?)\nDescription: (.+?)\nPrimary color: (.+?)\nSecondary color: (.+?)\nAccent color: (.+?)\n",
    )
    .expect("Failed to compile website content regex")
});

static PRODUCT_BLOCK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)Name: (.+?)\nDescription: (.+?)\nPrice: (.+?)\nAlt-text for design: (.+?)\n\n")
        .expect("Failed to compile product block regex")
});

/// The single free-text reply from the language model, split into its
/// labeled regions by literal marker matching.
pub struct NarrativeReply {
    raw: String,
}

impl NarrativeReply {
    pub fn new(raw: String) -> Self {
        Self { raw }
    }

    /// Returns the region between the main-content marker and the next
    /// products marker (or the end of the reply if no products marker
    /// follows).
    ///
    /// # Errors
    ///
    /// Returns an error if the reply contains no main-content marker
    pub fn main_content(&self) -> Result<&str> {
        let (_, tail) = self
            .raw
            .split_once(MAIN_CONTENT_MARKER)
            .ok_or_else(|| anyhow::anyhow!("Reply is missing the {MAIN_CONTENT_MARKER:?} marker"))?;

        Ok(tail
            .split_once(PRODUCTS_MARKER)
            .map_or(tail, |(head, _)| head))
    }

    /// Returns the region after the first products marker.
    ///
    /// # Errors
    ///
    /// Returns an error if the reply contains no products marker
    pub fn products_section(&self) -> Result<&str> {
        self.raw
            .split_once(PRODUCTS_MARKER)
            .map(|(_, tail)| tail)
            .ok_or_else(|| anyhow::anyhow!("Reply is missing the {PRODUCTS_MARKER:?} marker"))
    }
}

/// The single website-content record of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteContent {
    pub header: String,
    pub description: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
}

/// The closed set of merchandise categories a parsed product may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductType {
    TShirt,
    Hoodie,
    Backpack,
    Mug,
    Beanie,
    PhoneCase,
    Legging,
    Jacket,
    Shoe,
    Sticker,
    ToteBag,
    Poster,
    WaterBottle,
    GreetingCard,
    AirpodCase,
}

impl ProductType {
    /// Classification order. Matching is first-match-wins, so the order is
    /// part of the contract: a name containing two category substrings
    /// classifies as the earlier one.
    pub const ALL: [ProductType; 15] = [
        ProductType::TShirt,
        ProductType::Hoodie,
        ProductType::Backpack,
        ProductType::Mug,
        ProductType::Beanie,
        ProductType::PhoneCase,
        ProductType::Legging,
        ProductType::Jacket,
        ProductType::Shoe,
        ProductType::Sticker,
        ProductType::ToteBag,
        ProductType::Poster,
        ProductType::WaterBottle,
        ProductType::GreetingCard,
        ProductType::AirpodCase,
    ];

    /// The category string as it appears in product names.
    pub fn label(self) -> &'static str {
        match self {
            ProductType::TShirt => "T-shirt",
            ProductType::Hoodie => "Hoodie",
            ProductType::Backpack => "Backpack",
            ProductType::Mug => "Mug",
            ProductType::Beanie => "Beanie",
            ProductType::PhoneCase => "Phone case",
            ProductType::Legging => "Legging",
            ProductType::Jacket => "Jacket",
            ProductType::Shoe => "Shoe",
            ProductType::Sticker => "Sticker",
            ProductType::ToteBag => "Tote Bag",
            ProductType::Poster => "Poster",
            ProductType::WaterBottle => "Water Bottle",
            ProductType::GreetingCard => "Greeting Card",
            ProductType::AirpodCase => "Airpod case",
        }
    }

    /// Classifies a product name by case-insensitive substring search over
    /// [`ProductType::ALL`]; returns `None` if no category matches.
    pub fn classify(name: &str) -> Option<Self> {
        let lowered = name.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|product_type| lowered.contains(&product_type.label().to_lowercase()))
    }
}

/// A product record parsed from the reply. `image` stays `None` until the
/// image generation step fills it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub description: String,
    pub design_alt_text: String,
    /// Price in currency minor units.
    pub price: u32,
    pub product_type: ProductType,
    pub image: Option<String>,
}

/// Parses the main-content region into a [`WebsiteContent`] record.
///
/// Matches five consecutive labeled lines (`Header:`, `Description:`,
/// `Primary color:`, `Secondary color:`, `Accent color:`) in that order,
/// taking the first match only; fields are stored trimmed.
///
/// # Errors
///
/// Returns an error if the region does not contain the expected labeled
/// lines
pub fn parse_website_content(main_content: &str) -> Result<WebsiteContent> {
    let caps = WEBSITE_CONTENT_PATTERN
        .captures(main_content)
        .ok_or_else(|| anyhow::anyhow!("Main content section is missing the expected labeled fields"))?;

    Ok(WebsiteContent {
        header: capture_field(&caps, 1),
        description: capture_field(&caps, 2),
        primary_color: capture_field(&caps, 3),
        secondary_color: capture_field(&caps, 4),
        accent_color: capture_field(&caps, 5),
    })
}

/// Parses the products region into a sequence of [`Product`] records.
///
/// Each block of four labeled lines terminated by a blank line yields one
/// record, in reply order. Prices are coerced (plain integer -> value x 10,
/// anything else -> [`FALLBACK_PRICE`]) and names classified against
/// [`ProductType::ALL`]; a record whose name matches no category is dropped.
/// Malformed blocks are skipped, not surfaced.
pub fn parse_products(section: &str) -> Vec<Product> {
    PRODUCT_BLOCK_PATTERN
        .captures_iter(section)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let Some(product_type) = ProductType::classify(name) else {
                debug!("Dropping product with unrecognized type: {name}");
                return None;
            };

            Some(Product {
                name: name.to_string(),
                description: caps.get(2)?.as_str().to_string(),
                design_alt_text: caps.get(4)?.as_str().to_string(),
                price: coerce_price(caps.get(3)?.as_str()),
                product_type,
                image: None,
            })
        })
        .collect()
}

fn capture_field(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index)
        .map(|group| group.as_str().trim().to_string())
        .unwrap_or_default()
}

/// The model is told to answer in cents; a plain integer is stored as ten
/// times its value, anything else falls back to [`FALLBACK_PRICE`].
fn coerce_price(raw: &str) -> u32 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return FALLBACK_PRICE;
    }

    trimmed
        .parse::<u32>()
        .ok()
        .and_then(|cents| cents.checked_mul(10))
        .unwrap_or(FALLBACK_PRICE)
}
