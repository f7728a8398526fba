pub mod assembly;
pub mod catalog;
pub mod templates;

pub use assembly::{ComicAssembler, DEFAULT_COMIC_TITLE};
pub use catalog::{bundled_templates, load_templates};
pub use templates::TemplateQueries;
