//! The merchgen library drafts a merchandise-store concept for a
//! non-profit: it scrapes the organization's webpage, prompts a chat model
//! with the extracted text, parses the free-text reply into structured
//! website-content and product records, generates one image per product,
//! and emits a single JSON document describing the store.
//!
//! Every external call (page fetch, narrative generation, image generation)
//! goes through a disk-backed response cache keyed by the call's exact
//! arguments, so repeated runs against unchanged inputs cost no network
//! traffic.

pub mod compose;
pub mod constants;
pub mod extract;
pub mod fetch;
pub mod images;
pub mod narrative;
pub mod reply;
pub mod storage;

pub use compose::compose;
pub use extract::visible_text;
pub use fetch::fetch_page;
pub use images::{ImageProvider, OpenAiImages, attach_images, image_prompt};
pub use narrative::{NarrativeContext, generate_narrative};
pub use reply::{
    NarrativeReply, Product, ProductType, WebsiteContent, parse_products, parse_website_content,
};
pub use storage::{ResponseCache, Storage};
