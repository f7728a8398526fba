pub mod controller;
pub mod create;
pub mod generator;
pub mod state;

pub use controller::GenerationController;
pub use create::CreateCharacter;
pub use generator::{CharacterGenerator, PlaceholderGenerator};
pub use state::{CharacterAssemblyState, GenerationTicket};
