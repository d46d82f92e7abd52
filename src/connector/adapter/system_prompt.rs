use std::path::Path;

use tracing::{debug, warn};

/// The astrologer prompt shipped with the crate, compiled into the binary so
/// it does not depend on the working directory.
pub const SHIPPED_SYSTEM_PROMPT: &str = include_str!("../../../prompts/astrologer_system.md");

/// Returns the override file's contents, or [`SHIPPED_SYSTEM_PROMPT`] when no
/// override is given or it cannot be used.
pub async fn load_system_prompt(path: Option<&Path>) -> String {
    let Some(path) = path else {
        debug!("Using shipped system prompt");
        return SHIPPED_SYSTEM_PROMPT.to_string();
    };
    match tokio::fs::read_to_string(path).await {
        Ok(prompt) if !prompt.trim().is_empty() => {
            debug!("Loaded system prompt from {} ({} bytes)", path.display(), prompt.len());
            prompt
        }
        Ok(_) => {
            warn!("System prompt {} is empty, using shipped prompt", path.display());
            SHIPPED_SYSTEM_PROMPT.to_string()
        }
        Err(e) => {
            warn!(
                "Could not read system prompt {}: {}. Using shipped prompt",
                path.display(),
                e
            );
            SHIPPED_SYSTEM_PROMPT.to_string()
        }
    }
}
