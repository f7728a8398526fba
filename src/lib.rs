pub mod characters;
pub mod comics;
pub mod error;
pub mod models;
pub mod permissions;
pub mod repository;
pub mod selection;
pub mod session;
pub mod settings;
mod utils;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use characters::{CharacterGenerator, CreateCharacter, PlaceholderGenerator};
use comics::{bundled_templates, ComicAssembler, TemplateQueries};
use permissions::PermissionGate;
use repository::{
    CharacterRepository, ComicRepository, InMemoryCharacterRepository, InMemoryComicRepository,
    InMemoryPhotoRepository, PhotoRepository,
};
use session::WorkflowSession;
use settings::SettingsStore;

pub use error::{ComicsError, Outcome};

/// Everything a host shell needs to drive the workflow. Built once by
/// [`init`]; sessions are created per user flow.
pub struct AppState {
    pub settings: SettingsStore,
    pub photos: Arc<dyn PhotoRepository>,
    pub characters: Arc<dyn CharacterRepository>,
    pub comics: Arc<dyn ComicRepository>,
    pub templates: TemplateQueries,
    pub assembler: ComicAssembler,
    pub create_character: CreateCharacter,
    generator: Arc<dyn CharacterGenerator>,
    permissions: Arc<dyn PermissionGate>,
}

impl AppState {
    /// Wires the in-memory collaborators around `settings`.
    pub fn new(
        settings: SettingsStore,
        templates: Vec<models::ComicTemplate>,
        permissions: Arc<dyn PermissionGate>,
    ) -> Self {
        let delay = settings.workflow().generation_delay();
        let photos: Arc<dyn PhotoRepository> = Arc::new(InMemoryPhotoRepository::new());
        let characters: Arc<dyn CharacterRepository> =
            Arc::new(InMemoryCharacterRepository::new(photos.clone()));
        let comics: Arc<dyn ComicRepository> = Arc::new(InMemoryComicRepository::new(templates));

        Self {
            settings,
            templates: TemplateQueries::new(comics.clone()),
            assembler: ComicAssembler::new(comics.clone(), characters.clone()),
            create_character: CreateCharacter::new(characters.clone(), photos.clone()),
            photos,
            characters,
            comics,
            generator: Arc::new(PlaceholderGenerator::new(delay)),
            permissions,
        }
    }

    /// Starts a fresh photo-to-comic flow with the current workflow settings.
    pub fn new_session(&self) -> WorkflowSession {
        WorkflowSession::new(
            &self.settings.workflow(),
            self.generator.clone(),
            self.permissions.clone(),
        )
    }
}

/// Sets up logging, loads `settings.json` from `config_dir` and the bundled
/// template catalog.
pub fn init(config_dir: &Path, permissions: Arc<dyn PermissionGate>) -> anyhow::Result<AppState> {
    // Reads RUST_LOG; a host that already installed a logger keeps it.
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();

    log::info!("Comics Creator core starting up...");

    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;
    let settings = SettingsStore::new(config_dir.join("settings.json"))?;
    let templates = bundled_templates()?;
    log::info!("Loaded {} comic templates", templates.len());

    Ok(AppState::new(settings, templates, permissions))
}
