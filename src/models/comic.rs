use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ComicsError;

use super::{character::Character, template::CharacterPosition};

pub const AI_PROCESSING_VERSION: &str = "1.0";

/// A comic assembled from a template and the user's characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comic {
    pub id: String,
    pub title: String,
    pub template_id: String,
    /// Snapshot copies taken at assembly time.
    pub characters: Vec<Character>,
    pub customized_frames: Vec<CustomizedFrame>,
    pub final_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_shared: bool,
    pub metadata: ComicMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizedFrame {
    pub frame_id: String,
    pub character_placements: Vec<CharacterPlacement>,
    pub custom_speech_bubbles: Vec<CustomSpeechBubble>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPlacement {
    pub character_id: String,
    pub position: CharacterPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSpeechBubble {
    pub original_bubble_id: String,
    pub character_id: String,
    pub custom_text: Option<String>,
    pub is_edited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicMetadata {
    pub processing_time_ms: u64,
    pub ai_processing_version: String,
    pub total_frames: usize,
    pub characters_used: usize,
}

impl Default for ComicMetadata {
    fn default() -> Self {
        Self {
            processing_time_ms: 0,
            ai_processing_version: AI_PROCESSING_VERSION.into(),
            total_frames: 0,
            characters_used: 0,
        }
    }
}

impl Comic {
    pub fn edit_bubble_text(
        &mut self,
        frame_id: &str,
        bubble_id: &str,
        text: impl Into<String>,
    ) -> Result<(), ComicsError> {
        let bubble = self.bubble_mut(frame_id, bubble_id)?;
        bubble.custom_text = Some(text.into());
        bubble.is_edited = true;
        Ok(())
    }

    /// Drops a custom text so the template's original line is used again.
    pub fn reset_bubble_text(&mut self, frame_id: &str, bubble_id: &str) -> Result<(), ComicsError> {
        let bubble = self.bubble_mut(frame_id, bubble_id)?;
        bubble.custom_text = None;
        bubble.is_edited = false;
        Ok(())
    }

    pub fn mark_shared(&mut self) {
        self.is_shared = true;
    }

    fn bubble_mut(
        &mut self,
        frame_id: &str,
        bubble_id: &str,
    ) -> Result<&mut CustomSpeechBubble, ComicsError> {
        let frame = self
            .customized_frames
            .iter_mut()
            .find(|frame| frame.frame_id == frame_id)
            .ok_or_else(|| ComicsError::not_found("Frame", frame_id))?;

        frame
            .custom_speech_bubbles
            .iter_mut()
            .find(|bubble| bubble.original_bubble_id == bubble_id)
            .ok_or_else(|| ComicsError::not_found("Speech bubble", bubble_id))
    }
}
