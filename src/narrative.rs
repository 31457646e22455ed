//! The narrative module sends the extracted webpage text through the fixed
//! instruction template and returns the model's free-text store concept.

use anyhow::Result;
use llm::chat::{ChatMessage, ChatProvider};
use log::{debug, info};

use crate::constants::PROMPT_TEMPLATE;
use crate::storage::{NARRATIVE_OP, ResponseCache};

/// Configuration containing shared data for narrative generation
pub struct NarrativeContext<'a> {
    /// LLM model to use for drafting the store concept
    pub model: &'a dyn ChatProvider,
    /// Response cache keyed by the formatted prompt
    pub cache: &'a dyn ResponseCache,
}

/// Generates the narrative reply for the given visible text.
///
/// The instruction template is formatted with the text and sent to the chat
/// backend; the reply is cached under the formatted prompt, so identical
/// (text, template) pairs reuse the stored reply across runs. The reply is
/// expected to follow the labeled five-section structure the template
/// mandates; the reply parser depends on that structure and a deviating
/// reply surfaces there, not here.
///
/// # Arguments
///
/// * `ctx` - Context containing the model and the response cache
/// * `visible_text` - The visible text extracted from the webpage
///
/// # Returns
///
/// Returns the model's full free-text reply
///
/// # Errors
///
/// Returns an error if:
/// * The LLM chat operation fails (rate limit, auth, timeout)
/// * Cache operations fail
pub async fn generate_narrative(
    ctx: &NarrativeContext<'_>,
    visible_text: &str,
) -> Result<String> {
    let prompt = PROMPT_TEMPLATE.replace("{raw_text}", visible_text);

    if let Some(reply) = ctx.cache.lookup(NARRATIVE_OP, &prompt)? {
        debug!("Cache hit for narrative prompt");
        return Ok(reply);
    }

    info!("Requesting a store concept from the model...");
    let messages = [ChatMessage::user().content(prompt.clone()).build()];

    let reply = ctx
        .model
        .chat(&messages)
        .await
        .map_err(|err| anyhow::anyhow!("LLM error: {err}."))?
        .to_string();

    ctx.cache.store(NARRATIVE_OP, &prompt, &reply)?;

    Ok(reply)
}
