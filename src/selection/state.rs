use serde::Serialize;

use crate::error::ComicsError;
use crate::models::{PhotoId, PhotoSource, SelectedPhoto};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Photos captured or imported during one workflow session and which of them
/// are marked for character creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoSelectionState {
    photos: Vec<SelectedPhoto>,
    error_message: Option<String>,
    #[serde(skip)]
    max_photos: usize,
}

impl Default for PhotoSelectionState {
    fn default() -> Self {
        Self::with_capacity_limit(usize::MAX)
    }
}

impl PhotoSelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_limit(max_photos: usize) -> Self {
        Self {
            photos: Vec::new(),
            error_message: None,
            max_photos,
        }
    }

    /// Appends a new photo, selected by default. Failures are also kept in the
    /// error slot so the interface can display them.
    pub fn add_photo(&mut self, bytes: Vec<u8>, source: PhotoSource) -> Result<PhotoId, ComicsError> {
        let result = self.try_add_photo(bytes, source);
        if let Err(err) = &result {
            log_warn!("rejected photo: {err}");
            self.error_message = Some(format!("Failed to process photo: {err}"));
        }
        result
    }

    fn try_add_photo(&mut self, bytes: Vec<u8>, source: PhotoSource) -> Result<PhotoId, ComicsError> {
        if self.photos.len() >= self.max_photos {
            return Err(ComicsError::invalid(format!(
                "at most {} photos can be added",
                self.max_photos
            )));
        }

        let photo = SelectedPhoto::from_bytes(bytes, source)?;
        let id = photo.id.clone();
        self.photos.push(photo);
        Ok(id)
    }

    /// Returns false when no photo has this id.
    pub fn toggle_selection(&mut self, photo_id: &str) -> bool {
        match self.photos.iter_mut().find(|photo| photo.id == photo_id) {
            Some(photo) => {
                photo.is_selected = !photo.is_selected;
                true
            }
            None => {
                log_info!("toggle ignored, photo {photo_id} not in collection");
                false
            }
        }
    }

    /// Returns false when no photo has this id.
    pub fn remove_photo(&mut self, photo_id: &str) -> bool {
        let before = self.photos.len();
        self.photos.retain(|photo| photo.id != photo_id);
        let removed = self.photos.len() != before;
        if !removed {
            log_info!("remove ignored, photo {photo_id} not in collection");
        }
        removed
    }

    pub fn photos(&self) -> &[SelectedPhoto] {
        &self.photos
    }

    /// Photos whose selection flag is set, in collection order.
    pub fn selected_photos(&self) -> Vec<SelectedPhoto> {
        self.photos
            .iter()
            .filter(|photo| photo.is_selected)
            .cloned()
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.photos.iter().filter(|photo| photo.is_selected).count()
    }

    pub fn can_continue(&self) -> bool {
        self.photos.iter().any(|photo| photo.is_selected)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn clear(&mut self) {
        self.photos.clear();
        self.error_message = None;
    }
}
