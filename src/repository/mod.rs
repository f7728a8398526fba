//! Collaborator contracts for persistence, upload and sharing.
//!
//! Every method answers with an [`Outcome`], so a backend that is still
//! syncing can report `Loading` instead of blocking. The in-memory
//! implementations in [`memory`] back tests and hosts without a backend.

use async_trait::async_trait;

use crate::error::Outcome;
use crate::models::{Character, Comic, ComicTemplate, Photo};

pub mod memory;

pub use memory::{InMemoryCharacterRepository, InMemoryComicRepository, InMemoryPhotoRepository};

#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn save_photo(&self, photo: Photo) -> Outcome<Photo>;
    async fn get_photo_by_id(&self, id: &str) -> Outcome<Photo>;
    async fn get_all_photos(&self) -> Outcome<Vec<Photo>>;
    async fn delete_photo(&self, id: &str) -> Outcome<()>;
    /// Hands the photo to the processing backend; answers an opaque reference.
    async fn upload_photo_for_processing(&self, photo: &Photo) -> Outcome<String>;
}

#[async_trait]
pub trait CharacterRepository: Send + Sync {
    async fn create_character_from_photo(&self, photo_id: &str, name: &str) -> Outcome<Character>;
    async fn save_character(&self, character: Character) -> Outcome<Character>;
    async fn get_character_by_id(&self, id: &str) -> Outcome<Character>;
    async fn get_all_characters(&self) -> Outcome<Vec<Character>>;
    async fn update_character(&self, character: Character) -> Outcome<Character>;
    async fn delete_character(&self, id: &str) -> Outcome<()>;
}

#[async_trait]
pub trait ComicRepository: Send + Sync {
    async fn get_comic_templates(&self) -> Outcome<Vec<ComicTemplate>>;
    async fn get_template_by_id(&self, id: &str) -> Outcome<ComicTemplate>;
    async fn get_popular_templates(&self) -> Outcome<Vec<ComicTemplate>>;
    async fn create_comic(&self, comic: Comic) -> Outcome<Comic>;
    async fn save_comic(&self, comic: Comic) -> Outcome<Comic>;
    async fn get_comic_by_id(&self, id: &str) -> Outcome<Comic>;
    async fn get_all_comics(&self) -> Outcome<Vec<Comic>>;
    async fn delete_comic(&self, id: &str) -> Outcome<()>;
    /// Renders the final comic image; answers an opaque image reference.
    async fn generate_comic_image(&self, comic: &Comic) -> Outcome<String>;
    /// Publishes the comic; answers an opaque share link.
    async fn share_comic(&self, comic_id: &str) -> Outcome<String>;
}
