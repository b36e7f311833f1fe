//! Plain-text and table-of-contents extraction from editor documents
//!
//! Documents are node trees: every node may carry a `type`, a `text` leaf,
//! `attrs` and a `content` array of child nodes. Nothing else about the
//! editor model is assumed.

use super::slug::slugify;
use crate::contract::TocEntry;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

const ANCHOR_MAX_LEN: usize = 80;

/// Plain-text mirror of a document, one line per text block
pub fn plain_text(doc: &Value) -> String {
    let mut blocks = Vec::new();
    collect_blocks(doc, &mut blocks);
    blocks.join("\n")
}

/// Headings of a document in order, with unique anchors
pub fn table_of_contents(doc: &Value) -> Vec<TocEntry> {
    let mut headings = Vec::new();
    collect_headings(doc, &mut headings);

    // A suffixed anchor may equal a later heading's own slug, so every
    // candidate is checked against everything issued so far
    let mut issued: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    headings
        .into_iter()
        .map(|(level, text)| {
            let mut base = slugify(&text, ANCHOR_MAX_LEN);
            if base.is_empty() {
                base = "section".to_string();
            }
            let mut anchor = base.clone();
            while issued.contains(&anchor) {
                let n = next_suffix.entry(base.clone()).or_insert(1);
                anchor = format!("{}-{}", base, n);
                *n += 1;
            }
            issued.insert(anchor.clone());
            TocEntry {
                level,
                text,
                anchor,
            }
        })
        .collect()
}

/// First `max_chars` characters of `text`, cut at a word boundary
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }

    let cut: String = flat.chars().take(max_chars).collect();
    // A cut right before a space already ends on a whole word
    let trimmed = match cut.rfind(' ') {
        Some(pos) if pos > 0 && flat.chars().nth(max_chars) != Some(' ') => &cut[..pos],
        _ => cut.as_str(),
    };
    format!("{}…", trimmed.trim_end())
}

fn children(node: &Value) -> Option<&Vec<Value>> {
    node.get("content").and_then(Value::as_array)
}

fn node_type(node: &Value) -> Option<&str> {
    node.get("type").and_then(Value::as_str)
}

fn is_inline(node: &Value) -> bool {
    node.get("text").is_some() || node_type(node) == Some("hardBreak")
}

fn collect_blocks(node: &Value, blocks: &mut Vec<String>) {
    let Some(kids) = children(node) else {
        if let Some(text) = node.get("text").and_then(Value::as_str) {
            push_block(blocks, text.to_string());
        }
        return;
    };

    if kids.iter().any(is_inline) {
        let mut text = String::new();
        inline_text(node, &mut text);
        push_block(blocks, text);
    } else {
        for kid in kids {
            collect_blocks(kid, blocks);
        }
    }
}

fn push_block(blocks: &mut Vec<String>, text: String) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        blocks.push(trimmed.to_string());
    }
}

fn inline_text(node: &Value, out: &mut String) {
    if let Some(text) = node.get("text").and_then(Value::as_str) {
        out.push_str(text);
    }
    if node_type(node) == Some("hardBreak") {
        out.push('\n');
    }
    if let Some(kids) = children(node) {
        for kid in kids {
            inline_text(kid, out);
        }
    }
}

fn collect_headings(node: &Value, headings: &mut Vec<(u8, String)>) {
    if node_type(node) == Some("heading") {
        let level = node
            .get("attrs")
            .and_then(|a| a.get("level"))
            .and_then(Value::as_u64)
            .unwrap_or(1)
            .clamp(1, 6) as u8;

        let mut text = String::new();
        inline_text(node, &mut text);
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            headings.push((level, text));
        }
        return;
    }

    if let Some(kids) = children(node) {
        for kid in kids {
            collect_headings(kid, headings);
        }
    }
}
