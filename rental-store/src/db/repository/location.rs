//! Location Repository
//!
//! Stores embed their employees and inventory; every change to either is a
//! read-modify-write of the location document.

use super::{BaseRepository, MovieRepository, RepoError, RepoResult, embedded_id, record_id};
use crate::db::models::{
    AvailableCopy, Employee, EmployeeCreate, InventoryItem, InventoryItemCreate, Location,
    LocationCreate, LocationUpdate,
};
use crate::db::schema::{LOCATION, MOVIE};
use shared::models::InventoryStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct LocationRepository {
    base: BaseRepository,
}

impl LocationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Location>> {
        self.base.select_all(LOCATION, "city, address").await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Location>> {
        self.base.select(record_id(LOCATION, id)?).await
    }

    pub async fn create(&self, data: LocationCreate) -> RepoResult<Location> {
        let location = Location {
            id: None,
            address: data.address.trim().to_string(),
            city: data.city.trim().to_string(),
            employees: Vec::new(),
            inventory: Vec::new(),
        };
        location.validate()?;
        let created = self.base.create(LOCATION, location).await?;
        tracing::info!(location = ?created.id, city = %created.city, "Location created");
        Ok(created)
    }

    pub async fn update(&self, id: &str, data: LocationUpdate) -> RepoResult<Location> {
        let (rid, mut location) = self.load(id).await?;
        data.apply_to(&mut location);
        location.validate()?;
        self.base.replace(rid, location).await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = record_id(LOCATION, id)?;
        self.base.delete::<Location>(rid).await
    }

    // ── Employees ───────────────────────────────────────────────────

    /// Hire an employee; emails are unique across all stores
    pub async fn add_employee(&self, id: &str, data: EmployeeCreate) -> RepoResult<Employee> {
        data.validate()?;
        if self.find_by_employee_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Employee with email '{}' already exists",
                data.email
            )));
        }

        let (rid, mut location) = self.load(id).await?;
        let employee = data.into_employee(embedded_id(|id| location.employee(id).is_some()));
        location.employees.push(employee.clone());
        self.base.replace(rid, location).await?;
        tracing::info!(location = %id, employee = employee.id, "Employee added");
        Ok(employee)
    }

    pub async fn set_employee_active(
        &self,
        id: &str,
        employee_id: i64,
        is_active: bool,
    ) -> RepoResult<Employee> {
        let (rid, mut location) = self.load(id).await?;
        let employee = location.employee_mut(employee_id).ok_or_else(|| {
            RepoError::NotFound(format!("Employee {employee_id} not found at location {id}"))
        })?;
        employee.is_active = is_active;
        let employee = employee.clone();
        self.base.replace(rid, location).await?;
        Ok(employee)
    }

    /// Location employing the given email, ignoring case
    pub async fn find_by_employee_email(
        &self,
        email: &str,
    ) -> RepoResult<Option<(Location, Employee)>> {
        let wanted = email.trim().to_lowercase();
        for location in self.find_all().await? {
            if let Some(employee) = location
                .employees
                .iter()
                .find(|e| e.email.to_lowercase() == wanted)
                .cloned()
            {
                return Ok(Some((location, employee)));
            }
        }
        Ok(None)
    }

    // ── Inventory ───────────────────────────────────────────────────

    /// Stock a copy of an existing movie
    pub async fn add_inventory_item(
        &self,
        id: &str,
        data: InventoryItemCreate,
    ) -> RepoResult<InventoryItem> {
        let movie_rid = record_id(MOVIE, &data.movie_id)?;
        if MovieRepository::new(self.base.db().clone())
            .find_by_id(&data.movie_id)
            .await?
            .is_none()
        {
            return Err(RepoError::Reference(format!(
                "Movie {} not found",
                data.movie_id
            )));
        }

        let (rid, mut location) = self.load(id).await?;
        let item = InventoryItem {
            id: embedded_id(|id| location.inventory_item(id).is_some()),
            movie: movie_rid,
            format: data.format,
            status: data.status.unwrap_or(InventoryStatus::Available),
        };
        location.inventory.push(item.clone());
        self.base.replace(rid, location).await?;
        Ok(item)
    }

    pub async fn set_inventory_status(
        &self,
        id: &str,
        item_id: i64,
        status: InventoryStatus,
    ) -> RepoResult<InventoryItem> {
        let (rid, location) = self.load(id).await?;
        let location = self.store_items_status(rid, location, &[item_id], status).await?;
        location
            .inventory_item(item_id)
            .cloned()
            .ok_or_else(|| RepoError::NotFound(format!("Inventory item {item_id} not found")))
    }

    /// Find an inventory item anywhere, with the location holding it
    pub async fn find_inventory_item(
        &self,
        item_id: i64,
    ) -> RepoResult<Option<(Location, InventoryItem)>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM location WHERE inventory.id CONTAINS $item_id")
            .bind(("item_id", item_id))
            .await?;
        let locations: Vec<Location> = result.take(0)?;
        Ok(locations.into_iter().find_map(|location| {
            let item = location.inventory_item(item_id).cloned()?;
            Some((location, item))
        }))
    }

    /// Available copies of a movie across all stores
    pub async fn find_available(&self, movie_id: &str) -> RepoResult<Vec<AvailableCopy>> {
        let movie = record_id(MOVIE, movie_id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM location WHERE inventory.movie CONTAINS $movie ORDER BY city")
            .bind(("movie", movie.clone()))
            .await?;
        let locations: Vec<Location> = result.take(0)?;

        let mut copies = Vec::new();
        for location in locations {
            let Some(location_id) = location.id.clone() else {
                continue;
            };
            copies.extend(location.available_copies(&movie).map(|item| AvailableCopy {
                location: location_id.clone(),
                city: location.city.clone(),
                item: item.clone(),
            }));
        }
        Ok(copies)
    }

    /// Set several items of one location to `status` in a single write
    async fn store_items_status(
        &self,
        rid: RecordId,
        mut location: Location,
        item_ids: &[i64],
        status: InventoryStatus,
    ) -> RepoResult<Location> {
        location.set_items_status(item_ids, status)?;
        self.base.replace(rid, location).await
    }

    pub(crate) async fn load(&self, id: &str) -> RepoResult<(RecordId, Location)> {
        let rid = record_id(LOCATION, id)?;
        let location: Location = self
            .base
            .select(rid.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Location {id} not found")))?;
        Ok((rid, location))
    }
}
