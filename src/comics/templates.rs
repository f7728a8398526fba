use std::sync::Arc;

use crate::error::Outcome;
use crate::models::ComicTemplate;
use crate::repository::ComicRepository;

/// Template listings for the template picker.
#[derive(Clone)]
pub struct TemplateQueries {
    comics: Arc<dyn ComicRepository>,
}

impl TemplateQueries {
    pub fn new(comics: Arc<dyn ComicRepository>) -> Self {
        Self { comics }
    }

    pub async fn all(&self, only_popular: bool) -> Outcome<Vec<ComicTemplate>> {
        if only_popular {
            self.comics.get_popular_templates().await
        } else {
            self.comics.get_comic_templates().await
        }
    }

    /// Case-insensitive category match.
    pub async fn by_category(&self, category: &str) -> Outcome<Vec<ComicTemplate>> {
        self.filtered(|template| template.category.eq_ignore_ascii_case(category))
            .await
    }

    /// Templates that accept exactly `character_count` characters.
    pub async fn for_character_count(&self, character_count: usize) -> Outcome<Vec<ComicTemplate>> {
        self.filtered(|template| template.accepts(character_count))
            .await
    }

    async fn filtered(
        &self,
        keep: impl Fn(&ComicTemplate) -> bool,
    ) -> Outcome<Vec<ComicTemplate>> {
        self.comics
            .get_comic_templates()
            .await
            .map(|templates| templates.into_iter().filter(|t| keep(t)).collect())
    }
}
