use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ComicsError;

const FALLBACK_MIME_TYPE: &str = "image/jpeg";
const FALLBACK_EXTENSION: &str = "jpg";

pub type PhotoId = String;

/// Where a photo entered the workflow from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PhotoSource {
    Camera,
    Gallery,
}

impl PhotoSource {
    pub fn is_camera(self) -> bool {
        matches!(self, PhotoSource::Camera)
    }

    fn file_prefix(self) -> &'static str {
        match self {
            PhotoSource::Camera => "camera_photo",
            PhotoSource::Gallery => "gallery_photo",
        }
    }
}

/// A captured or imported photo held by the selection state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedPhoto {
    pub id: PhotoId,
    pub uri: String,
    /// Raw image bytes, shared with any character generated from this photo.
    #[serde(skip)]
    pub bytes: Option<Arc<[u8]>>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub selected_at: DateTime<Utc>,
    pub is_from_camera: bool,
    pub is_selected: bool,
}

impl SelectedPhoto {
    /// Builds a selected photo from a raw payload handed over by the capture
    /// surface. The MIME type is sniffed from the header bytes.
    pub fn from_bytes(bytes: Vec<u8>, source: PhotoSource) -> Result<Self, ComicsError> {
        if bytes.is_empty() {
            return Err(ComicsError::invalid("photo payload is empty"));
        }

        let format = image::guess_format(&bytes).ok();
        let mime_type = format
            .map(|f| f.to_mime_type())
            .unwrap_or(FALLBACK_MIME_TYPE);
        let extension = format
            .and_then(|f| f.extensions_str().first().copied())
            .unwrap_or(FALLBACK_EXTENSION);
        let suffix: u32 = rand::thread_rng().gen();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            uri: format!("bytearray://{}", bytes.len()),
            file_name: Some(format!("{}_{suffix}.{extension}", source.file_prefix())),
            mime_type: Some(mime_type.to_string()),
            bytes: Some(Arc::from(bytes)),
            selected_at: Utc::now(),
            is_from_camera: source.is_camera(),
            is_selected: true,
        })
    }

    pub fn source(&self) -> PhotoSource {
        if self.is_from_camera {
            PhotoSource::Camera
        } else {
            PhotoSource::Gallery
        }
    }
}

/// Photo record as stored by the photo repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: PhotoId,
    pub uri: String,
    pub uploaded_at: DateTime<Utc>,
    pub processed_image_url: Option<String>,
}

impl From<&SelectedPhoto> for Photo {
    fn from(photo: &SelectedPhoto) -> Self {
        Self {
            id: photo.id.clone(),
            uri: photo.uri.clone(),
            uploaded_at: Utc::now(),
            processed_image_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n', 0, 0];

    #[test]
    fn empty_payload_is_rejected() {
        let err = SelectedPhoto::from_bytes(Vec::new(), PhotoSource::Camera).unwrap_err();
        assert!(matches!(err, ComicsError::InvalidArgument(_)));
    }

    #[test]
    fn png_header_is_sniffed() {
        let photo = SelectedPhoto::from_bytes(PNG_HEADER.to_vec(), PhotoSource::Gallery).unwrap();
        assert_eq!(photo.mime_type.as_deref(), Some("image/png"));
        let name = photo.file_name.unwrap();
        assert!(name.starts_with("gallery_photo_"));
        assert!(name.ends_with(".png"));
        assert!(!photo.is_from_camera);
    }

    #[test]
    fn unknown_payload_falls_back_to_jpeg() {
        let photo = SelectedPhoto::from_bytes(vec![1, 2, 3], PhotoSource::Camera).unwrap();
        assert_eq!(photo.mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(photo.uri, "bytearray://3");
        assert!(photo.file_name.as_ref().unwrap().starts_with("camera_photo_"));
        assert!(photo.is_selected);
        assert_eq!(photo.source(), PhotoSource::Camera);
    }

    #[test]
    fn ids_are_unique() {
        let a = SelectedPhoto::from_bytes(vec![1], PhotoSource::Camera).unwrap();
        let b = SelectedPhoto::from_bytes(vec![1], PhotoSource::Camera).unwrap();
        assert_ne!(a.id, b.id);
    }
}
