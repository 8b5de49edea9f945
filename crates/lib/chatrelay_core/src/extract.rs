// @zen-component: RELAY-TextExtractor
//
//! Reply text extraction.
//!
//! Walks the response tree depth-first in document order and returns the
//! first non-empty text. The walk uses an explicit stack so nesting depth is
//! bounded by heap, not by the call stack.

use crate::models::{ChatResponse, ContentBlock, Message, MessageContent, TextField};

/// Block type tags whose `text.value` counts as reply text.
const TEXT_KINDS: &[&str] = &["text", "output_text"];

enum Node<'a> {
    Message(&'a Message),
    Block(&'a ContentBlock),
}

/// Returns the first non-empty reply text, or `None` when the response has
/// none (or is absent).
pub fn extract_text(response: Option<&ChatResponse>) -> Option<String> {
    let response = response?;

    // Children are pushed in reverse so they pop in document order.
    let mut stack: Vec<Node<'_>> = response.messages.iter().rev().map(Node::Message).collect();

    while let Some(node) = stack.pop() {
        match node {
            Node::Message(message) => match &message.content {
                MessageContent::Text(text) if !text.is_empty() => return Some(text.clone()),
                MessageContent::Text(_) => {}
                MessageContent::Blocks(blocks) => {
                    stack.extend(blocks.iter().rev().map(Node::Block));
                }
            },
            Node::Block(block) => {
                if let Some(text) = block_text(block) {
                    return Some(text.to_string());
                }
                if let Some(children) = &block.content {
                    stack.extend(children.iter().rev().map(Node::Block));
                }
            }
        }
    }

    None
}

fn block_text(block: &ContentBlock) -> Option<&str> {
    match &block.text {
        Some(TextField::Plain(text)) if !text.is_empty() => Some(text.as_str()),
        Some(TextField::Annotated { value })
            if !value.is_empty()
                && block
                    .kind
                    .as_deref()
                    .is_some_and(|kind| TEXT_KINDS.contains(&kind)) =>
        {
            Some(value.as_str())
        }
        _ => None,
    }
}
