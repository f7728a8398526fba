use std::time::Duration;

use async_trait::async_trait;

use crate::error::ComicsError;
use crate::models::{Character, SelectedPhoto};

/// Turns selected photos into characters. Long-running; callers run it off
/// the interface thread and may drop the future to cancel it.
#[async_trait]
pub trait CharacterGenerator: Send + Sync {
    async fn generate(&self, photos: &[SelectedPhoto]) -> Result<Vec<Character>, ComicsError>;
}

/// Stand-in for style transfer: waits a fixed delay, then returns one
/// placeholder character per photo.
#[derive(Debug, Clone)]
pub struct PlaceholderGenerator {
    delay: Duration,
}

impl PlaceholderGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CharacterGenerator for PlaceholderGenerator {
    async fn generate(&self, photos: &[SelectedPhoto]) -> Result<Vec<Character>, ComicsError> {
        tokio::time::sleep(self.delay).await;
        Ok(placeholder_characters(photos))
    }
}

pub fn placeholder_characters(photos: &[SelectedPhoto]) -> Vec<Character> {
    photos
        .iter()
        .enumerate()
        .map(|(position, photo)| Character::placeholder(photo, position))
        .collect()
}

/// Checks that `characters` maps 1:1 and in order onto `photos`.
pub fn ensure_traceable(
    photos: &[SelectedPhoto],
    characters: Vec<Character>,
) -> Result<Vec<Character>, ComicsError> {
    if characters.len() != photos.len() {
        return Err(ComicsError::failed(format!(
            "generator returned {} characters for {} photos",
            characters.len(),
            photos.len()
        )));
    }

    if let Some((photo, character)) = photos
        .iter()
        .zip(&characters)
        .find(|(photo, character)| character.original_photo_id != photo.id)
    {
        return Err(ComicsError::failed(format!(
            "character {} does not belong to photo {}",
            character.id, photo.id
        )));
    }

    Ok(characters)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::time::Instant;

    use super::*;
    use crate::models::PhotoSource;

    fn photos() -> Vec<SelectedPhoto> {
        vec![
            SelectedPhoto::from_bytes(vec![1, 2], PhotoSource::Camera).unwrap(),
            SelectedPhoto::from_bytes(vec![3, 4], PhotoSource::Gallery).unwrap(),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn placeholder_generation_is_one_to_one_after_delay() {
        let photos = photos();
        let generator = PlaceholderGenerator::new(Duration::from_millis(2000));

        let started = Instant::now();
        let characters = generator.generate(&photos).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2000));

        assert_eq!(characters.len(), photos.len());
        for (photo, character) in photos.iter().zip(&characters) {
            assert_eq!(character.id, format!("character_{}", photo.id));
            assert_eq!(character.original_photo_id, photo.id);
            assert!(Arc::ptr_eq(
                character.image.as_ref().unwrap(),
                photo.bytes.as_ref().unwrap()
            ));
        }
        assert_eq!(characters[0].name, "Character 1");
        assert_eq!(characters[1].name, "Character 2");
    }

    #[test]
    fn traceability_rejects_count_mismatch() {
        let photos = photos();
        let mut characters = placeholder_characters(&photos);
        characters.pop();
        assert!(matches!(
            ensure_traceable(&photos, characters),
            Err(ComicsError::OperationFailed(_))
        ));
    }

    #[test]
    fn traceability_rejects_reordered_output() {
        let photos = photos();
        let mut characters = placeholder_characters(&photos);
        characters.reverse();
        assert!(ensure_traceable(&photos, characters).is_err());
    }

    #[test]
    fn traceability_accepts_placeholders() {
        let photos = photos();
        let characters = placeholder_characters(&photos);
        assert_eq!(ensure_traceable(&photos, characters.clone()).unwrap(), characters);
    }
}
