use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::error::{ComicsError, Outcome};
use crate::models::{
    Character, CharacterPlacement, Comic, ComicFrame, ComicMetadata, ComicTemplate,
    CustomSpeechBubble, CustomizedFrame,
};
use crate::ready;
use crate::repository::{CharacterRepository, ComicRepository};

pub const DEFAULT_COMIC_TITLE: &str = "My Comic";

/// Builds comics from a template and stored characters.
#[derive(Clone)]
pub struct ComicAssembler {
    comics: Arc<dyn ComicRepository>,
    characters: Arc<dyn CharacterRepository>,
}

impl ComicAssembler {
    pub fn new(comics: Arc<dyn ComicRepository>, characters: Arc<dyn CharacterRepository>) -> Self {
        Self { comics, characters }
    }

    /// Resolves the template and characters, validates the character count
    /// and persists the assembled comic.
    pub async fn create_comic(
        &self,
        template_id: &str,
        character_ids: &[String],
        title: &str,
    ) -> Outcome<Comic> {
        let started = Instant::now();
        let template = ready!(self.comics.get_template_by_id(template_id).await);

        if let Err(err) = check_character_count(&template, character_ids.len()) {
            return Outcome::Error(err);
        }

        let mut characters = Vec::with_capacity(character_ids.len());
        for character_id in character_ids {
            characters.push(ready!(self.characters.get_character_by_id(character_id).await));
        }

        let mut comic = assemble(&template, characters, title);
        comic.metadata.processing_time_ms = started.elapsed().as_millis() as u64;

        info!(
            "assembled comic {} from template {} ({} frames, {} characters)",
            comic.id, template.id, comic.metadata.total_frames, comic.metadata.characters_used
        );

        self.comics.save_comic(comic).await
    }

    /// Loads a stored comic, applies `edit`, and saves it back.
    pub async fn update_comic(
        &self,
        comic_id: &str,
        edit: impl FnOnce(&mut Comic) -> Result<(), ComicsError>,
    ) -> Outcome<Comic> {
        let mut comic = ready!(self.comics.get_comic_by_id(comic_id).await);
        if let Err(err) = edit(&mut comic) {
            return Outcome::Error(err);
        }
        self.comics.save_comic(comic).await
    }

    pub async fn edit_bubble_text(
        &self,
        comic_id: &str,
        frame_id: &str,
        bubble_id: &str,
        text: &str,
    ) -> Outcome<Comic> {
        self.update_comic(comic_id, |comic| comic.edit_bubble_text(frame_id, bubble_id, text))
            .await
    }
}

pub fn check_character_count(template: &ComicTemplate, count: usize) -> Result<(), ComicsError> {
    if template.accepts(count) {
        return Ok(());
    }
    Err(ComicsError::invalid(format!(
        "Template requires {}-{} characters, but {} provided",
        template.min_characters, template.max_characters, count
    )))
}

/// Materializes a comic from already-resolved characters. Does not validate
/// the character count.
pub fn assemble(template: &ComicTemplate, characters: Vec<Character>, title: &str) -> Comic {
    let customized_frames: Vec<CustomizedFrame> = template
        .frames
        .iter()
        .map(|frame| customize_frame(frame, &characters))
        .collect();

    let title = match title.trim() {
        "" => DEFAULT_COMIC_TITLE,
        trimmed => trimmed,
    };

    Comic {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        template_id: template.id.clone(),
        metadata: ComicMetadata {
            total_frames: template.frames.len(),
            characters_used: characters.len(),
            ..ComicMetadata::default()
        },
        characters,
        customized_frames,
        final_image_url: None,
        created_at: Utc::now(),
        is_shared: false,
    }
}

/// Binds a template frame to concrete characters.
///
/// Positions pointing past the character list are dropped. Bubbles pointing
/// past it are spoken by the first character; with no characters at all
/// there is nobody to speak them and they are dropped too.
pub fn customize_frame(frame: &ComicFrame, characters: &[Character]) -> CustomizedFrame {
    let character_placements = frame
        .character_positions
        .iter()
        .filter_map(|position| {
            characters
                .get(position.character_index)
                .map(|character| CharacterPlacement {
                    character_id: character.id.clone(),
                    position: position.clone(),
                })
        })
        .collect();

    let custom_speech_bubbles = frame
        .speech_bubbles
        .iter()
        .filter_map(|bubble| {
            characters
                .get(bubble.character_index)
                .or_else(|| characters.first())
                .map(|character| CustomSpeechBubble {
                    original_bubble_id: bubble.id.clone(),
                    character_id: character.id.clone(),
                    custom_text: None,
                    is_edited: false,
                })
        })
        .collect();

    CustomizedFrame {
        frame_id: frame.id.clone(),
        character_placements,
        custom_speech_bubbles,
    }
}
