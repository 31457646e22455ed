//! The compose module merges the website content and the product list into
//! a single JSON document and writes it to the output file.

use anyhow::Result;
use log::info;
use std::fs::OpenOptions;
use std::io::Write;

use crate::reply::{Product, WebsiteContent};

/// Composes the output document from the website content and the products
/// (each with its image URL attached) and writes it to `output_path`.
///
/// The file is created only here, after every earlier step has succeeded;
/// there are no partial or incremental writes.
///
/// # Arguments
///
/// * `content` - The parsed website content record
/// * `products` - The parsed products, images attached
/// * `output_path` - Path to the output file
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if any operation fails
///
/// # Errors
///
/// Returns an error if:
/// * The output file cannot be created or written
/// * Serialization fails
pub fn compose(content: &WebsiteContent, products: &[Product], output_path: &str) -> Result<()> {
    info!("Composing {} products to {output_path}...", products.len());

    let document = serde_json::json!({
        "content": {
            "header": content.header,
            "description": content.description,
            "theme": {
                "primary_color": content.primary_color,
                "secondary_color": content.secondary_color,
                "accent_color": content.accent_color,
            },
        },
        "products": products
            .iter()
            .map(|product| {
                serde_json::json!({
                    "name": product.name,
                    "description": product.description,
                    "price": product.price,
                    "image": product.image,
                })
            })
            .collect::<Vec<_>>(),
    });

    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(output_path)?;

    file.write_all(serde_json::to_string(&document)?.as_bytes())?;

    info!("Composed store concept to {output_path}");
    Ok(())
}
