use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Number of entries the model is asked to produce per category
pub const SECTION_SIZE: usize = 3;

/// A single suggestion with the model's explanation for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub reason: String,
}

impl Recommendation {
    pub fn new(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reason: reason.into(),
        }
    }

    /// Both fields carry visible text
    pub fn is_well_formed(&self) -> bool {
        !self.title.trim().is_empty() && !self.reason.trim().is_empty()
    }
}

/// The three recommendation categories, in the order the model emits them
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Books,
    Meals,
    Activities,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Books, Category::Meals, Category::Activities];

    /// JSON key of this category in the model's response object
    pub fn key(self) -> &'static str {
        match self {
            Category::Books => "books",
            Category::Meals => "meals",
            Category::Activities => "activities",
        }
    }

    pub fn progress_message(self) -> &'static str {
        match self {
            Category::Books => "Finding books...",
            Category::Meals => "Finding meals...",
            Category::Activities => "Finding activities...",
        }
    }

    /// Heading used when rendering the section
    pub fn heading(self) -> &'static str {
        match self {
            Category::Books => "Books to Read",
            Category::Meals => "Meals to Enjoy",
            Category::Activities => "Things to Do",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Checks that a category array is ready to be shown: exactly
/// [`SECTION_SIZE`] entries, each with a non-empty title and reason.
pub fn is_complete_section(items: &[Recommendation]) -> bool {
    items.len() == SECTION_SIZE && items.iter().all(Recommendation::is_well_formed)
}

/// Full model response: three recommendations per category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationSet {
    pub books: Vec<Recommendation>,
    pub meals: Vec<Recommendation>,
    pub activities: Vec<Recommendation>,
}

impl RecommendationSet {
    pub fn section(&self, category: Category) -> &[Recommendation] {
        match category {
            Category::Books => &self.books,
            Category::Meals => &self.meals,
            Category::Activities => &self.activities,
        }
    }
}

/// A recommendation set being assembled one category at a time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRecommendations {
    pub books: Option<Vec<Recommendation>>,
    pub meals: Option<Vec<Recommendation>>,
    pub activities: Option<Vec<Recommendation>>,
}

impl PartialRecommendations {
    pub fn section(&self, category: Category) -> Option<&[Recommendation]> {
        match category {
            Category::Books => self.books.as_deref(),
            Category::Meals => self.meals.as_deref(),
            Category::Activities => self.activities.as_deref(),
        }
    }

    /// Replaces the named category; earlier contents are overwritten, not appended to
    pub fn set(&mut self, category: Category, items: Vec<Recommendation>) {
        let slot = match category {
            Category::Books => &mut self.books,
            Category::Meals => &mut self.meals,
            Category::Activities => &mut self.activities,
        };
        *slot = Some(items);
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.section(*c).is_none())
    }

    pub fn is_complete(&self) -> bool {
        Category::ALL.iter().all(|c| self.section(*c).is_some())
    }
}

impl From<RecommendationSet> for PartialRecommendations {
    fn from(set: RecommendationSet) -> Self {
        Self {
            books: Some(set.books),
            meals: Some(set.meals),
            activities: Some(set.activities),
        }
    }
}
