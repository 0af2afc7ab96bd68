use crate::constants::{MAX_CONTENT_LEN, MIN_CONTENT_LEN};
use crate::errors::{MemoryForgeError, MemoryForgeResult};

/// Strip NUL bytes, normalize line endings to `\n`, and trim surrounding whitespace.
pub fn sanitize(content: &str) -> String {
    let without_nul: String = content.chars().filter(|c| *c != '\0').collect();
    let normalized = without_nul.replace("\r\n", "\n").replace('\r', "\n");
    normalized.trim().to_string()
}

/// Validate a memory's content after sanitization: `1..=10240` chars, non-empty.
pub fn validate_content(content: &str) -> MemoryForgeResult<()> {
    let len = content.chars().count();
    if len < MIN_CONTENT_LEN {
        return Err(MemoryForgeError::validation(
            "content",
            "content is empty after sanitization",
        ));
    }
    if len > MAX_CONTENT_LEN {
        return Err(MemoryForgeError::validation(
            "content",
            format!("content exceeds {MAX_CONTENT_LEN} characters"),
        ));
    }
    Ok(())
}

/// Validate a search query: non-empty after trim, length bounded the same as content.
pub fn validate_search_query(query: &str) -> MemoryForgeResult<()> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(MemoryForgeError::validation(
            "query",
            "search query is empty after trimming",
        ));
    }
    if trimmed.chars().count() > MAX_CONTENT_LEN {
        return Err(MemoryForgeError::validation(
            "query",
            format!("search query exceeds {MAX_CONTENT_LEN} characters"),
        ));
    }
    Ok(())
}
