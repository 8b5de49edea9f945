//! Prompt → upstream reply → processed fragment.

use tracing::debug;

use crate::client::ChatClient;
use crate::error::{RelayError, RelayResult};
use crate::extract::extract_text;
use crate::process::TextProcessor;

/// Runs one prompt through the upstream API, the extractor and the processor.
pub async fn relay(
    client: &ChatClient,
    processor: &TextProcessor,
    prompt: &str,
) -> RelayResult<String> {
    let response = client.complete(prompt).await?;
    let text = extract_text(Some(&response)).ok_or(RelayError::NoText)?;
    debug!(chars = text.chars().count(), "extracted reply text");
    Ok(processor.process(&text))
}
