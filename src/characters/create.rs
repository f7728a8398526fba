use std::sync::Arc;

use crate::error::{ComicsError, Outcome};
use crate::models::Character;
use crate::ready;
use crate::repository::{CharacterRepository, PhotoRepository};

/// Creates a named character from a stored photo.
#[derive(Clone)]
pub struct CreateCharacter {
    characters: Arc<dyn CharacterRepository>,
    photos: Arc<dyn PhotoRepository>,
}

impl CreateCharacter {
    pub fn new(characters: Arc<dyn CharacterRepository>, photos: Arc<dyn PhotoRepository>) -> Self {
        Self { characters, photos }
    }

    pub async fn create(&self, photo_id: &str, name: &str) -> Outcome<Character> {
        ready!(self.photos.get_photo_by_id(photo_id).await);

        let name = name.trim();
        if name.is_empty() {
            return Outcome::Error(ComicsError::invalid("Character name cannot be empty"));
        }

        self.characters.create_character_from_photo(photo_id, name).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::Photo;
    use crate::repository::{InMemoryCharacterRepository, InMemoryPhotoRepository};

    async fn use_case() -> CreateCharacter {
        let photos = Arc::new(InMemoryPhotoRepository::new());
        photos
            .save_photo(Photo {
                id: "p1".into(),
                uri: "bytearray://3".into(),
                uploaded_at: Utc::now(),
                processed_image_url: None,
            })
            .await;
        let characters = Arc::new(InMemoryCharacterRepository::new(photos.clone()));
        CreateCharacter::new(characters, photos)
    }

    #[tokio::test]
    async fn name_is_trimmed() {
        let character = use_case().await.create("p1", "  Mia ").await.success().unwrap();
        assert_eq!(character.name, "Mia");
        assert_eq!(character.original_photo_id, "p1");
    }

    #[tokio::test]
    async fn blank_name_is_invalid() {
        let outcome = use_case().await.create("p1", " \t").await;
        assert!(matches!(outcome, Outcome::Error(ComicsError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn missing_photo_is_reported_before_name() {
        let outcome = use_case().await.create("ghost", "").await;
        assert!(matches!(outcome, Outcome::Error(ComicsError::NotFound(_))));
    }
}
