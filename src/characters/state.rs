use serde::Serialize;

use crate::error::ComicsError;
use crate::models::{Character, SelectedPhoto};

/// Identifies one generation run so a late or cancelled result can be told
/// apart from the current one.
pub type GenerationTicket = u64;

#[derive(Debug, Clone)]
struct InFlight {
    ticket: GenerationTicket,
    previous_error: Option<String>,
}

/// Character creation step: the photos handed over from selection and the
/// characters generated from them.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterAssemblyState {
    source_photos: Vec<SelectedPhoto>,
    generated: Vec<Character>,
    error: Option<String>,
    #[serde(skip)]
    in_flight: Option<InFlight>,
    #[serde(skip)]
    next_ticket: GenerationTicket,
}

impl CharacterAssemblyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_source_photos(&mut self, photos: Vec<SelectedPhoto>) {
        self.source_photos = photos;
    }

    pub fn source_photos(&self) -> &[SelectedPhoto] {
        &self.source_photos
    }

    pub fn generated(&self) -> &[Character] {
        &self.generated
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn can_continue(&self) -> bool {
        !self.generated.is_empty()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Marks a run as in flight and returns its ticket. Only one run can be
    /// in flight at a time.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, ComicsError> {
        if self.in_flight.is_some() {
            return Err(ComicsError::invalid("character generation already in progress"));
        }
        if self.source_photos.is_empty() {
            return Err(ComicsError::invalid("no photos selected for character creation"));
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.in_flight = Some(InFlight {
            ticket,
            previous_error: self.error.take(),
        });
        Ok(ticket)
    }

    /// Publishes the result of run `ticket`. Returns false and leaves the
    /// state alone when that run is no longer current.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<Vec<Character>, ComicsError>,
    ) -> bool {
        match &self.in_flight {
            Some(in_flight) if in_flight.ticket == ticket => {}
            _ => return false,
        }
        self.in_flight = None;

        match result {
            Ok(characters) => self.generated = characters,
            Err(err) => self.error = Some(format!("Failed to create characters: {err}")),
        }
        true
    }

    /// Abandons the current run, restoring the state it started from.
    /// Returns false when nothing was in flight.
    pub fn cancel_generation(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                self.error = in_flight.previous_error;
                true
            }
            None => false,
        }
    }

    pub fn rename_character(&mut self, character_id: &str, name: &str) -> Result<(), ComicsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ComicsError::invalid("Character name cannot be empty"));
        }

        let character = self
            .generated
            .iter_mut()
            .find(|character| character.id == character_id)
            .ok_or_else(|| ComicsError::not_found("Character", character_id))?;
        character.name = name.to_string();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cancel_generation();
        self.source_photos.clear();
        self.generated.clear();
        self.error = None;
    }
}
