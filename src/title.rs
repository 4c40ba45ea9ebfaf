//! Title generation contract and fallback policy.
//!
//! A [`TitleGenerator`] is an external text-generation collaborator. It is the
//! one collaborator with a defined local recovery: when it fails, returns
//! something empty or too short, or is simply not configured, the store falls
//! back to a truncation of the memory text. Title failures never propagate.

use crate::error::Result;

/// Truncation point for the fallback title; combined with the ellipsis the
/// fallback stays at 50 chars.
const FALLBACK_TRUNCATE_AT: usize = 47;

/// Generated titles shorter than this (after trimming) count as unusable.
const MIN_TITLE_LEN: usize = 3;

/// Capability contract for generating a short human-readable title from
/// memory text.
///
/// Generation may take seconds (typically LLM-backed); callers in async
/// contexts should use `tokio::task::spawn_blocking`.
pub trait TitleGenerator: Send + Sync {
    fn generate_title(&self, text: &str) -> Result<String>;
}

/// Resolve the title for a new memory.
///
/// An explicit caller-supplied title always wins. Otherwise the generator is
/// consulted, and any failure or unusable output falls back to
/// [`fallback_title`].
pub fn resolve_title(
    explicit: Option<&str>,
    generator: Option<&dyn TitleGenerator>,
    text: &str,
) -> String {
    if let Some(title) = explicit {
        let trimmed = title.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    if let Some(gen) = generator {
        match gen.generate_title(text) {
            Ok(title) => {
                let trimmed = title.trim();
                if trimmed.chars().count() >= MIN_TITLE_LEN {
                    return trimmed.to_string();
                }
                tracing::debug!(len = trimmed.len(), "generated title too short, falling back");
            }
            Err(e) => {
                tracing::warn!(error = %e, "title generation failed, falling back to truncation");
            }
        }
    }

    fallback_title(text)
}

/// Truncation fallback: `truncate(text, 47) + "..."` when the text exceeds
/// 50 chars, else the text verbatim.
pub fn fallback_title(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() > 50 {
        let head: String = chars[..FALLBACK_TRUNCATE_AT].iter().collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
