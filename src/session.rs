//! Session-scoped workflow context.
//!
//! One `WorkflowSession` lives from the first photo to the assembled comic and
//! is handed from screen to screen. All mutations, including the completion
//! of a background character generation run, go through the same async mutex,
//! so an edit made while generation is in flight is applied to the latest
//! state and never lost.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::characters::{
    generator::ensure_traceable, CharacterAssemblyState, CharacterGenerator, GenerationController,
    GenerationTicket,
};
use crate::error::{ComicsError, Outcome};
use crate::models::{Character, PhotoId, PhotoSource, SelectedPhoto};
use crate::permissions::PermissionGate;
use crate::repository::CharacterRepository;
use crate::selection::PhotoSelectionState;
use crate::settings::WorkflowSettings;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

#[derive(Debug, Default)]
struct WorkflowState {
    selection: PhotoSelectionState,
    characters: CharacterAssemblyState,
}

impl WorkflowState {
    fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            photos: self.selection.photos().to_vec(),
            selected_count: self.selection.selected_count(),
            can_continue_to_characters: self.selection.can_continue(),
            photo_error: self.selection.error_message().map(str::to_string),
            characters: self.characters.generated().to_vec(),
            is_generating: self.characters.is_generating(),
            can_continue_to_comic: self.characters.can_continue(),
            character_error: self.characters.error().map(str::to_string),
        }
    }
}

/// What the screens render; republished after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    pub photos: Vec<SelectedPhoto>,
    pub selected_count: usize,
    pub can_continue_to_characters: bool,
    pub photo_error: Option<String>,
    pub characters: Vec<Character>,
    pub is_generating: bool,
    pub can_continue_to_comic: bool,
    pub character_error: Option<String>,
}

#[derive(Clone)]
pub struct WorkflowSession {
    state: Arc<Mutex<WorkflowState>>,
    generation: Arc<Mutex<GenerationController>>,
    generator: Arc<dyn CharacterGenerator>,
    permissions: Arc<dyn PermissionGate>,
    updates: Arc<watch::Sender<WorkflowSnapshot>>,
    max_photos_per_import: usize,
}

impl WorkflowSession {
    pub fn new(
        settings: &WorkflowSettings,
        generator: Arc<dyn CharacterGenerator>,
        permissions: Arc<dyn PermissionGate>,
    ) -> Self {
        let state = WorkflowState {
            selection: PhotoSelectionState::with_capacity_limit(settings.max_photos),
            characters: CharacterAssemblyState::new(),
        };
        let (updates, _) = watch::channel(state.snapshot());

        Self {
            state: Arc::new(Mutex::new(state)),
            generation: Arc::new(Mutex::new(GenerationController::new())),
            generator,
            permissions,
            updates: Arc::new(updates),
            max_photos_per_import: settings.max_photos_per_import,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.updates.subscribe()
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        self.state.lock().await.snapshot()
    }

    // -- Photo selection --

    pub async fn add_photo(&self, bytes: Vec<u8>, source: PhotoSource) -> Result<PhotoId, ComicsError> {
        self.mutate(|state| state.selection.add_photo(bytes, source))
            .await
    }

    /// Imports a batch from the picker or camera after checking platform
    /// access. Payloads beyond the picker limit are ignored; malformed ones
    /// are reported in the photo error slot and skipped.
    pub async fn import_photos(&self, payloads: Vec<Vec<u8>>, source: PhotoSource) -> Outcome<Vec<PhotoId>> {
        if !self.permissions.ensure(source.into()).await {
            let err = ComicsError::failed(format!("{source:?} access was not granted"));
            log_warn!("photo import refused: {err}");
            return Outcome::Error(err);
        }

        let total = payloads.len();
        if total > self.max_photos_per_import {
            log_warn!(
                "import of {total} photos truncated to {}",
                self.max_photos_per_import
            );
        }

        let added = self
            .mutate(|state| {
                payloads
                    .into_iter()
                    .take(self.max_photos_per_import)
                    .filter_map(|bytes| state.selection.add_photo(bytes, source).ok())
                    .collect::<Vec<_>>()
            })
            .await;

        log_info!("imported {} of {total} photos from {source:?}", added.len());
        Outcome::Success(added)
    }

    pub async fn toggle_selection(&self, photo_id: &str) {
        self.mutate(|state| state.selection.toggle_selection(photo_id))
            .await;
    }

    pub async fn remove_photo(&self, photo_id: &str) {
        self.mutate(|state| state.selection.remove_photo(photo_id))
            .await;
    }

    pub async fn selected_photos(&self) -> Vec<SelectedPhoto> {
        self.state.lock().await.selection.selected_photos()
    }

    pub async fn can_continue_to_characters(&self) -> bool {
        self.state.lock().await.selection.can_continue()
    }

    pub async fn clear_photo_error(&self) {
        self.mutate(|state| state.selection.clear_error()).await;
    }

    // -- Character assembly --

    /// Hands the currently selected photos to the character step.
    pub async fn proceed_to_characters(&self) -> Result<usize, ComicsError> {
        self.mutate(|state| {
            let selected = state.selection.selected_photos();
            if selected.is_empty() {
                return Err(ComicsError::invalid("no photos selected"));
            }
            let count = selected.len();
            state.characters.set_source_photos(selected);
            Ok(count)
        })
        .await
    }

    /// Starts generating characters from the handed-over photos in the
    /// background. Returns once the run is in flight.
    pub async fn generate_characters(&self) -> Result<(), ComicsError> {
        let mut generation = self.generation.lock().await;

        let (ticket, photos) = self
            .mutate(|state| {
                let ticket = state.characters.begin_generation()?;
                Ok::<_, ComicsError>((ticket, state.characters.source_photos().to_vec()))
            })
            .await?;

        log_info!("generating {} characters (run {ticket})", photos.len());

        let worker_session = self.clone();
        let started = generation
            .start(move |cancel_token| worker_session.run_generation(ticket, photos, cancel_token))
            .await;

        if let Err(err) = started {
            log_error!("failed to start character generation: {err:#}");
            self.mutate(|state| state.characters.cancel_generation()).await;
            return Err(ComicsError::from(err));
        }
        Ok(())
    }

    async fn run_generation(
        self,
        ticket: GenerationTicket,
        photos: Vec<SelectedPhoto>,
        cancel_token: CancellationToken,
    ) {
        let result = tokio::select! {
            result = self.generator.generate(&photos) => result,
            _ = cancel_token.cancelled() => {
                log_info!("character generation run {ticket} cancelled");
                return;
            }
        };

        let result = result.and_then(|characters| ensure_traceable(&photos, characters));
        if let Err(err) = &result {
            log_warn!("character generation run {ticket} failed: {err}");
        }

        let applied = self
            .mutate(|state| state.characters.complete_generation(ticket, result))
            .await;
        if !applied {
            log_info!("discarded stale result of character generation run {ticket}");
        }
    }

    /// Waits until no run is in flight, whether it finished or was
    /// cancelled. Any number of callers may wait at once.
    pub async fn wait_for_characters(&self) -> Result<(), ComicsError> {
        let mut updates = self.subscribe();
        updates
            .wait_for(|snapshot| !snapshot.is_generating)
            .await
            .map_err(|_| ComicsError::failed("workflow session closed"))?;
        Ok(())
    }

    /// Abandons the in-flight run as if it had never started. Safe to call
    /// repeatedly or when nothing is running.
    pub async fn cancel_generation(&self) -> Result<(), ComicsError> {
        // Held only while starting or stopping a worker, never across a run.
        let mut generation = self.generation.lock().await;
        let cancelled = self
            .mutate(|state| state.characters.cancel_generation())
            .await;
        generation.stop().await?;

        if cancelled {
            log_info!("character generation cancelled");
        }
        Ok(())
    }

    pub async fn is_generating(&self) -> bool {
        self.state.lock().await.characters.is_generating()
    }

    pub async fn generated_characters(&self) -> Vec<Character> {
        self.state.lock().await.characters.generated().to_vec()
    }

    pub async fn can_continue_to_comic(&self) -> bool {
        self.state.lock().await.characters.can_continue()
    }

    pub async fn rename_character(&self, character_id: &str, name: &str) -> Result<(), ComicsError> {
        self.mutate(|state| state.characters.rename_character(character_id, name))
            .await
    }

    pub async fn clear_character_error(&self) {
        self.mutate(|state| state.characters.clear_error()).await;
    }

    /// Stores the generated characters so comic assembly can resolve them.
    /// Returns their ids in generation order.
    pub async fn commit_characters(&self, repository: &dyn CharacterRepository) -> Outcome<Vec<String>> {
        let characters = self.generated_characters().await;
        if characters.is_empty() {
            return Outcome::Error(ComicsError::invalid("no characters generated yet"));
        }

        let mut ids = Vec::with_capacity(characters.len());
        for character in characters {
            let saved = crate::ready!(repository.save_character(character).await);
            ids.push(saved.id);
        }
        Outcome::Success(ids)
    }

    /// Ends the session: stops generation and drops all photos and characters.
    pub async fn end(&self) -> Result<(), ComicsError> {
        self.cancel_generation().await?;
        self.mutate(|state| {
            state.selection.clear();
            state.characters.clear();
        })
        .await;
        Ok(())
    }

    async fn mutate<T>(&self, change: impl FnOnce(&mut WorkflowState) -> T) -> T {
        let mut state = self.state.lock().await;
        let result = change(&mut *state);
        self.updates.send_replace(state.snapshot());
        result
    }
}
