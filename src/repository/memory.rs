use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ComicsError, Outcome};
use crate::models::{Character, Comic, ComicTemplate, Photo};
use crate::ready;

use super::{CharacterRepository, ComicRepository, PhotoRepository};

const UPLOAD_SCHEME: &str = "memory://uploads";
const RENDER_SCHEME: &str = "memory://renders";
const SHARE_SCHEME: &str = "memory://share";

#[derive(Default)]
pub struct InMemoryPhotoRepository {
    photos: RwLock<HashMap<String, Photo>>,
}

impl InMemoryPhotoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PhotoRepository for InMemoryPhotoRepository {
    async fn save_photo(&self, photo: Photo) -> Outcome<Photo> {
        self.photos
            .write()
            .await
            .insert(photo.id.clone(), photo.clone());
        Outcome::Success(photo)
    }

    async fn get_photo_by_id(&self, id: &str) -> Outcome<Photo> {
        match self.photos.read().await.get(id) {
            Some(photo) => Outcome::Success(photo.clone()),
            None => Outcome::Error(ComicsError::not_found("Photo", id)),
        }
    }

    async fn get_all_photos(&self) -> Outcome<Vec<Photo>> {
        let mut photos: Vec<Photo> = self.photos.read().await.values().cloned().collect();
        photos.sort_by_key(|photo| photo.uploaded_at);
        Outcome::Success(photos)
    }

    async fn delete_photo(&self, id: &str) -> Outcome<()> {
        match self.photos.write().await.remove(id) {
            Some(_) => Outcome::Success(()),
            None => Outcome::Error(ComicsError::not_found("Photo", id)),
        }
    }

    async fn upload_photo_for_processing(&self, photo: &Photo) -> Outcome<String> {
        let mut photos = self.photos.write().await;
        let Some(stored) = photos.get_mut(&photo.id) else {
            return Outcome::Error(ComicsError::not_found("Photo", &photo.id));
        };
        let reference = format!("{UPLOAD_SCHEME}/{}", photo.id);
        stored.processed_image_url = Some(reference.clone());
        Outcome::Success(reference)
    }
}

pub struct InMemoryCharacterRepository {
    photos: Arc<dyn PhotoRepository>,
    characters: RwLock<HashMap<String, Character>>,
}

impl InMemoryCharacterRepository {
    pub fn new(photos: Arc<dyn PhotoRepository>) -> Self {
        Self {
            photos,
            characters: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CharacterRepository for InMemoryCharacterRepository {
    async fn create_character_from_photo(&self, photo_id: &str, name: &str) -> Outcome<Character> {
        let photo = ready!(self.photos.get_photo_by_id(photo_id).await);
        let character = Character {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            original_photo_id: photo.id.clone(),
            comic_style_image_url: photo.processed_image_url.unwrap_or(photo.uri),
            image: None,
            created_at: Utc::now(),
        };
        self.save_character(character).await
    }

    async fn save_character(&self, character: Character) -> Outcome<Character> {
        self.characters
            .write()
            .await
            .insert(character.id.clone(), character.clone());
        Outcome::Success(character)
    }

    async fn get_character_by_id(&self, id: &str) -> Outcome<Character> {
        match self.characters.read().await.get(id) {
            Some(character) => Outcome::Success(character.clone()),
            None => Outcome::Error(ComicsError::not_found("Character", id)),
        }
    }

    async fn get_all_characters(&self) -> Outcome<Vec<Character>> {
        let mut characters: Vec<Character> =
            self.characters.read().await.values().cloned().collect();
        characters.sort_by_key(|character| character.created_at);
        Outcome::Success(characters)
    }

    async fn update_character(&self, character: Character) -> Outcome<Character> {
        let mut characters = self.characters.write().await;
        match characters.get_mut(&character.id) {
            Some(stored) => {
                *stored = character.clone();
                Outcome::Success(character)
            }
            None => Outcome::Error(ComicsError::not_found("Character", &character.id)),
        }
    }

    async fn delete_character(&self, id: &str) -> Outcome<()> {
        match self.characters.write().await.remove(id) {
            Some(_) => Outcome::Success(()),
            None => Outcome::Error(ComicsError::not_found("Character", id)),
        }
    }
}

/// Comic store over a fixed template catalog.
pub struct InMemoryComicRepository {
    templates: Vec<ComicTemplate>,
    comics: RwLock<HashMap<String, Comic>>,
}

impl InMemoryComicRepository {
    pub fn new(templates: Vec<ComicTemplate>) -> Self {
        Self {
            templates,
            comics: RwLock::new(HashMap::new()),
        }
    }

    async fn modify_comic(&self, id: &str, change: impl FnOnce(&mut Comic)) -> Outcome<Comic> {
        let mut comics = self.comics.write().await;
        match comics.get_mut(id) {
            Some(comic) => {
                change(comic);
                Outcome::Success(comic.clone())
            }
            None => Outcome::Error(ComicsError::not_found("Comic", id)),
        }
    }
}

#[async_trait]
impl ComicRepository for InMemoryComicRepository {
    async fn get_comic_templates(&self) -> Outcome<Vec<ComicTemplate>> {
        Outcome::Success(self.templates.clone())
    }

    async fn get_template_by_id(&self, id: &str) -> Outcome<ComicTemplate> {
        match self.templates.iter().find(|template| template.id == id) {
            Some(template) => Outcome::Success(template.clone()),
            None => Outcome::Error(ComicsError::not_found("Template", id)),
        }
    }

    async fn get_popular_templates(&self) -> Outcome<Vec<ComicTemplate>> {
        Outcome::Success(
            self.templates
                .iter()
                .filter(|template| template.is_popular)
                .cloned()
                .collect(),
        )
    }

    async fn create_comic(&self, comic: Comic) -> Outcome<Comic> {
        let mut comics = self.comics.write().await;
        if comics.contains_key(&comic.id) {
            return Outcome::Error(ComicsError::invalid(format!(
                "comic '{}' already exists",
                comic.id
            )));
        }
        comics.insert(comic.id.clone(), comic.clone());
        Outcome::Success(comic)
    }

    async fn save_comic(&self, comic: Comic) -> Outcome<Comic> {
        self.comics
            .write()
            .await
            .insert(comic.id.clone(), comic.clone());
        Outcome::Success(comic)
    }

    async fn get_comic_by_id(&self, id: &str) -> Outcome<Comic> {
        match self.comics.read().await.get(id) {
            Some(comic) => Outcome::Success(comic.clone()),
            None => Outcome::Error(ComicsError::not_found("Comic", id)),
        }
    }

    async fn get_all_comics(&self) -> Outcome<Vec<Comic>> {
        let mut comics: Vec<Comic> = self.comics.read().await.values().cloned().collect();
        comics.sort_by_key(|comic| comic.created_at);
        Outcome::Success(comics)
    }

    async fn delete_comic(&self, id: &str) -> Outcome<()> {
        match self.comics.write().await.remove(id) {
            Some(_) => Outcome::Success(()),
            None => Outcome::Error(ComicsError::not_found("Comic", id)),
        }
    }

    async fn generate_comic_image(&self, comic: &Comic) -> Outcome<String> {
        let reference = format!("{RENDER_SCHEME}/{}.png", comic.id);
        let stored_reference = reference.clone();
        self.modify_comic(&comic.id, move |stored| {
            stored.final_image_url = Some(stored_reference);
        })
        .await
        .map(|_| reference)
    }

    async fn share_comic(&self, comic_id: &str) -> Outcome<String> {
        self.modify_comic(comic_id, Comic::mark_shared)
            .await
            .map(|comic| format!("{SHARE_SCHEME}/{}", comic.id))
    }
}
