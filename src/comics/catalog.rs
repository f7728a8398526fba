use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::models::ComicTemplate;

const BUNDLED_CATALOG: &str = include_str!("../../assets/templates.json");

/// Templates shipped with the app.
pub fn bundled_templates() -> Result<Vec<ComicTemplate>> {
    parse_templates(BUNDLED_CATALOG).context("bundled template catalog is invalid")
}

pub fn load_templates(path: &Path) -> Result<Vec<ComicTemplate>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read templates from {}", path.display()))?;
    parse_templates(&contents)
        .with_context(|| format!("Invalid template catalog {}", path.display()))
}

/// Parses a JSON template list, checks it and sorts each template's frames
/// by `order`.
pub fn parse_templates(json: &str) -> Result<Vec<ComicTemplate>> {
    let mut templates: Vec<ComicTemplate> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for template in &mut templates {
        if !seen.insert(template.id.clone()) {
            bail!("duplicate template id '{}'", template.id);
        }
        if template.min_characters == 0 || template.min_characters > template.max_characters {
            bail!(
                "template '{}' has invalid character range {}-{}",
                template.id,
                template.min_characters,
                template.max_characters
            );
        }
        template.frames.sort_by_key(|frame| frame.order);
    }

    Ok(templates)
}
