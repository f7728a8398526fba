//! Static comic template data. Templates are authored independently of any
//! user data and are never mutated once loaded.

use serde::{Deserialize, Serialize};

fn default_min_characters() -> usize {
    1
}

fn default_max_characters() -> usize {
    2
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub background_image_url: String,
    pub frames: Vec<ComicFrame>,
    /// Humor, romance, friendship, ...
    pub category: String,
    #[serde(default = "default_min_characters")]
    pub min_characters: usize,
    #[serde(default = "default_max_characters")]
    pub max_characters: usize,
    #[serde(default)]
    pub is_popular: bool,
}

impl ComicTemplate {
    pub fn accepts(&self, character_count: usize) -> bool {
        (self.min_characters..=self.max_characters).contains(&character_count)
    }
}

/// One panel of a comic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicFrame {
    pub id: String,
    pub order: u32,
    pub character_positions: Vec<CharacterPosition>,
    pub speech_bubbles: Vec<SpeechBubble>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPosition {
    /// Index into the comic's character list (0 = first character).
    pub character_index: usize,
    /// Horizontal position, 0..1.
    pub x: f32,
    /// Vertical position, 0..1.
    pub y: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Degrees.
    #[serde(default)]
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechBubble {
    pub id: String,
    pub character_index: usize,
    pub text: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub bubble_type: BubbleType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BubbleType {
    #[default]
    Speech,
    Thought,
    Shout,
    Whisper,
}
