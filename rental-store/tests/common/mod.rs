//! Shared fixtures: a fresh RocksDB-backed store per test

#![allow(dead_code)]

use rental_store::db::models::{
    CustomerCreate, InventoryItem, InventoryItemCreate, Location, LocationCreate, Movie,
    MovieCreate,
};
use rental_store::{DbService, RepoError};
use shared::models::MediaFormat;
use surrealdb::RecordId;
use tempfile::TempDir;

/// Open an empty database with the schema applied
///
/// Keep the `TempDir` alive for the duration of the test.
pub async fn setup() -> (TempDir, DbService) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::connect(tmp.path(), "test", "test").await.unwrap();
    service.prepare().await.unwrap();
    (tmp, service)
}

pub fn id_of(id: &Option<RecordId>) -> String {
    id.as_ref().expect("record has an id").to_string()
}

pub fn customer(email: &str) -> CustomerCreate {
    CustomerCreate {
        first_name: "Ava".into(),
        last_name: "Holm".into(),
        email: email.into(),
        phone_number: Some("+45 12 34 56 78".into()),
        address: None,
    }
}

pub fn movie(title: &str, year: i32, genres: &[&str]) -> MovieCreate {
    MovieCreate {
        title: title.into(),
        release_year: Some(year),
        runtime_min: Some(120),
        rating: Some(8),
        summary: None,
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

/// A store with `copies` available DVDs of one movie
pub async fn stocked_store(service: &DbService, copies: usize) -> (Location, Movie, Vec<InventoryItem>) {
    let movie = service
        .movies()
        .create(movie("Heat", 1995, &["Crime", "Drama"]))
        .await
        .unwrap();
    let location = service
        .locations()
        .create(LocationCreate {
            address: "Vesterbrogade 10".into(),
            city: "København".into(),
        })
        .await
        .unwrap();

    let location_id = id_of(&location.id);
    let mut items = Vec::new();
    for _ in 0..copies {
        let item = service
            .locations()
            .add_inventory_item(
                &location_id,
                InventoryItemCreate {
                    movie_id: id_of(&movie.id),
                    format: MediaFormat::Dvd,
                    status: None,
                },
            )
            .await
            .unwrap();
        items.push(item);
    }
    let location = service
        .locations()
        .find_by_id(&location_id)
        .await
        .unwrap()
        .unwrap();
    (location, movie, items)
}

/// Run raw SurrealQL and map the first statement error like the repositories do
pub async fn raw(service: &DbService, sql: &str) -> Result<(), RepoError> {
    service
        .db
        .query(sql)
        .await
        .map_err(RepoError::from)?
        .check()
        .map_err(RepoError::from)?;
    Ok(())
}
