//! Movie Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use crate::db::repository::RepoResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_positive_int,
    validate_range, validate_rating, validate_required_text,
};

/// Earliest accepted release year
const MIN_RELEASE_YEAR: i64 = 1888;
const MAX_RELEASE_YEAR: i64 = 2200;

/// Customer review embedded in a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: i64,
    #[serde(default)]
    pub customer: Option<RecordId>,
    pub rating: i32,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub title: String,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub runtime_min: Option<i32>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::vec_or_empty")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "serde_helpers::vec_or_empty")]
    pub reviews: Vec<Review>,
}

impl Movie {
    pub fn validate(&self) -> RepoResult<()> {
        validate_required_text(&self.title, "title", MAX_NAME_LEN)?;
        if let Some(year) = self.release_year {
            validate_range(year.into(), "release_year", MIN_RELEASE_YEAR, MAX_RELEASE_YEAR)?;
        }
        if let Some(runtime) = self.runtime_min {
            validate_positive_int(runtime, "runtime_min")?;
        }
        if let Some(rating) = self.rating {
            validate_rating(rating, "rating")?;
        }
        validate_optional_text(&self.summary, "summary", MAX_NOTE_LEN)?;
        for genre in &self.genres {
            validate_required_text(genre, "genre", MAX_SHORT_TEXT_LEN)?;
        }
        Ok(())
    }

    /// Mean of the review ratings
    pub fn average_review_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let sum: i64 = self.reviews.iter().map(|r| i64::from(r.rating)).sum();
        Some(sum as f64 / self.reviews.len() as f64)
    }
}

/// Create movie payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieCreate {
    pub title: String,
    pub release_year: Option<i32>,
    pub runtime_min: Option<i32>,
    pub rating: Option<i32>,
    pub summary: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl MovieCreate {
    pub fn into_movie(self) -> Movie {
        Movie {
            id: None,
            title: self.title.trim().to_string(),
            release_year: self.release_year,
            runtime_min: self.runtime_min,
            rating: self.rating,
            summary: self.summary,
            genres: self.genres,
            reviews: Vec::new(),
        }
    }
}

/// Update movie payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub runtime_min: Option<i32>,
    pub rating: Option<i32>,
    pub summary: Option<String>,
    pub genres: Option<Vec<String>>,
}

impl MovieUpdate {
    pub fn apply_to(self, target: &mut Movie) {
        if let Some(title) = self.title {
            target.title = title.trim().to_string();
        }
        if let Some(year) = self.release_year {
            target.release_year = Some(year);
        }
        if let Some(runtime) = self.runtime_min {
            target.runtime_min = Some(runtime);
        }
        if let Some(rating) = self.rating {
            target.rating = Some(rating);
        }
        if let Some(summary) = self.summary {
            target.summary = Some(summary);
        }
        if let Some(genres) = self.genres {
            target.genres = genres;
        }
    }
}

/// Add review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    /// Reviewing customer, "customer:key" or bare key
    pub customer_id: Option<String>,
    pub rating: i32,
    pub body: Option<String>,
}

impl ReviewCreate {
    pub fn validate(&self) -> RepoResult<()> {
        validate_rating(self.rating, "review rating")?;
        validate_optional_text(&self.body, "review body", MAX_NOTE_LEN)
    }
}
