use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::photo::SelectedPhoto;

pub const GENERATED_ID_PREFIX: &str = "character_";

/// A comic character created from one of the user's photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    /// User-assigned display name, never blank.
    pub name: String,
    pub original_photo_id: String,
    pub comic_style_image_url: String,
    #[serde(skip)]
    pub image: Option<Arc<[u8]>>,
    pub created_at: DateTime<Utc>,
}

impl Character {
    /// Placeholder character standing in for a styled rendition of `photo`.
    /// Shares the photo's payload instead of copying it.
    pub fn placeholder(photo: &SelectedPhoto, position: usize) -> Self {
        Self {
            id: format!("{GENERATED_ID_PREFIX}{}", photo.id),
            name: format!("Character {}", position + 1),
            original_photo_id: photo.id.clone(),
            comic_style_image_url: photo.uri.clone(),
            image: photo.bytes.clone(),
            created_at: Utc::now(),
        }
    }
}
