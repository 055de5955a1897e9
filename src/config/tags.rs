use crate::domain::model::TagSet;
use crate::utils::error::{Result, TaggerError};
use std::path::Path;

/// One tag per line. Blank lines are skipped and surrounding whitespace trimmed.
pub fn load_tag_list(path: &Path) -> Result<TagSet> {
    let content = std::fs::read_to_string(path).map_err(|e| TaggerError::InputError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let tags = parse_tag_list(&content);
    if tags.is_empty() {
        return Err(TaggerError::InputError {
            path: path.display().to_string(),
            message: "file contains no tag names".to_string(),
        });
    }

    tracing::debug!("Loaded {} tags from {}", tags.len(), path.display());
    Ok(tags)
}

pub fn parse_tag_list(content: &str) -> TagSet {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
