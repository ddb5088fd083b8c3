//! Movie Repository

use super::{BaseRepository, CustomerRepository, RepoError, RepoResult, embedded_id, record_id};
use crate::db::models::{Movie, MovieCreate, MovieUpdate, Review, ReviewCreate};
use crate::db::schema::MOVIE;
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct MovieRepository {
    base: BaseRepository,
}

impl MovieRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Movie>> {
        self.base.select_all(MOVIE, "title").await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Movie>> {
        self.base.select(record_id(MOVIE, id)?).await
    }

    /// Movies whose title contains `title`, ignoring case
    pub async fn find_by_title(&self, title: &str) -> RepoResult<Vec<Movie>> {
        let needle = title.trim().to_lowercase();
        let movies: Vec<Movie> = self
            .base
            .db()
            .query(
                "SELECT * FROM movie \
                 WHERE string::contains(string::lowercase(title), $needle) \
                 ORDER BY title",
            )
            .bind(("needle", needle))
            .await?
            .take(0)?;
        Ok(movies)
    }

    /// Movies tagged with `genre`, newest release first
    pub async fn find_by_genre(&self, genre: &str) -> RepoResult<Vec<Movie>> {
        let genre_owned = genre.to_string();
        let movies: Vec<Movie> = self
            .base
            .db()
            .query("SELECT * FROM movie WHERE genres CONTAINS $genre ORDER BY release_year DESC, title")
            .bind(("genre", genre_owned))
            .await?
            .take(0)?;
        Ok(movies)
    }

    pub async fn create(&self, data: MovieCreate) -> RepoResult<Movie> {
        let movie = data.into_movie();
        movie.validate()?;
        let created = self.base.create(MOVIE, movie).await?;
        tracing::info!(movie = ?created.id, title = %created.title, "Movie created");
        Ok(created)
    }

    pub async fn update(&self, id: &str, data: MovieUpdate) -> RepoResult<Movie> {
        let (rid, mut movie) = self.load(id).await?;
        data.apply_to(&mut movie);
        movie.validate()?;
        self.base.replace(rid, movie).await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = record_id(MOVIE, id)?;
        self.base.delete::<Movie>(rid).await
    }

    /// Append a review; a referenced customer must exist
    pub async fn add_review(&self, id: &str, data: ReviewCreate) -> RepoResult<Review> {
        data.validate()?;
        let (rid, mut movie) = self.load(id).await?;

        let customer = match &data.customer_id {
            Some(customer_id) => {
                let customer = CustomerRepository::new(self.base.db().clone())
                    .find_by_id(customer_id)
                    .await?
                    .ok_or_else(|| {
                        RepoError::Reference(format!("Customer {customer_id} not found"))
                    })?;
                customer.id
            }
            None => None,
        };

        let review = Review {
            id: embedded_id(|id| movie.reviews.iter().any(|r| r.id == id)),
            customer,
            rating: data.rating,
            body: data.body,
            created_at: now_millis(),
        };
        movie.reviews.push(review.clone());
        self.base.replace(rid, movie).await?;
        Ok(review)
    }

    pub(crate) async fn load(&self, id: &str) -> RepoResult<(RecordId, Movie)> {
        let rid = record_id(MOVIE, id)?;
        let movie: Movie = self
            .base
            .select(rid.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Movie {id} not found")))?;
        Ok((rid, movie))
    }
}
