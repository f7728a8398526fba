pub mod character;
pub mod comic;
pub mod photo;
pub mod template;

pub use character::Character;
pub use comic::{CharacterPlacement, Comic, ComicMetadata, CustomSpeechBubble, CustomizedFrame};
pub use photo::{Photo, PhotoId, PhotoSource, SelectedPhoto};
pub use template::{BubbleType, CharacterPosition, ComicFrame, ComicTemplate, SpeechBubble};
