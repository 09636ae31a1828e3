use serde_json::Value;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::StoreError;
use crate::models::{Hotel, HotelDraft, HotelView};

/// Hotel rows joined with the destination they reference.
const VIEW_SELECT: &str = "SELECT h.body AS body, d.body AS destination \
     FROM hotels h LEFT JOIN destinations d ON d.id = h.destination_id";

#[derive(Debug, Clone)]
pub struct HotelRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ViewRow {
    body: String,
    destination: Option<String>,
}

#[derive(sqlx::FromRow)]
struct BodyRow {
    body: String,
}

/// Criteria for [`HotelRepository::filter`]. Every bound that is set must
/// hold; ranges include both ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelFilter {
    pub destination_id: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub stars_min: Option<i64>,
    pub stars_max: Option<i64>,
    pub rating_min: Option<f64>,
}

impl HotelFilter {
    pub fn destination(mut self, id: impl Into<String>) -> Self {
        self.destination_id = Some(id.into());
        self
    }

    pub fn price_between(mut self, min: f64, max: f64) -> Self {
        self.price_min = Some(min);
        self.price_max = Some(max);
        self
    }

    pub fn stars_between(mut self, min: i64, max: i64) -> Self {
        self.stars_min = Some(min);
        self.stars_max = Some(max);
        self
    }

    pub fn rating_at_least(mut self, min: f64) -> Self {
        self.rating_min = Some(min);
        self
    }

    fn push_conditions(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        query.push(" WHERE 1 = 1");
        if let Some(id) = &self.destination_id {
            query.push(" AND h.destination_id = ").push_bind(id.clone());
        }
        if let Some(min) = self.price_min {
            query.push(" AND h.price_from >= ").push_bind(min);
        }
        if let Some(max) = self.price_max {
            query.push(" AND h.price_from <= ").push_bind(max);
        }
        if let Some(min) = self.stars_min {
            query.push(" AND h.stars >= ").push_bind(min);
        }
        if let Some(max) = self.stars_max {
            query.push(" AND h.stars <= ").push_bind(max);
        }
        if let Some(min) = self.rating_min {
            query.push(" AND h.rating >= ").push_bind(min);
        }
    }
}

impl HotelRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All hotels ordered by name, each with its destination expanded.
    pub async fn list(&self) -> Result<Vec<HotelView>, StoreError> {
        self.filter(&HotelFilter::default()).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<HotelView>, StoreError> {
        let sql = format!("{VIEW_SELECT} WHERE h.id = ?");
        let row: Option<ViewRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(decode_view).transpose()
    }

    async fn get_hotel(&self, id: &str) -> Result<Option<Hotel>, StoreError> {
        let row: Option<BodyRow> = sqlx::query_as("SELECT body FROM hotels WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| serde_json::from_str(&r.body).map_err(StoreError::from))
            .transpose()
    }

    /// Validates and stores a new hotel.
    ///
    /// The insert only happens if the referenced destination exists at the
    /// moment of the write; otherwise nothing is stored and
    /// [`StoreError::InvalidReference`] is returned.
    pub async fn create(&self, draft: HotelDraft) -> Result<HotelView, StoreError> {
        let hotel = Hotel::new(draft.validate()?);

        let result = sqlx::query(
            r#"
            INSERT INTO hotels (id, destination_id, name, price_from, stars, rating, body, created_at, updated_at)
            SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?
            WHERE EXISTS (SELECT 1 FROM destinations WHERE id = ?)
            "#,
        )
        .bind(&hotel.id)
        .bind(&hotel.destination_id)
        .bind(&hotel.name)
        .bind(hotel.price_from)
        .bind(hotel.stars)
        .bind(hotel.rating)
        .bind(serde_json::to_string(&hotel)?)
        .bind(hotel.created_at.to_rfc3339())
        .bind(hotel.updated_at.to_rfc3339())
        .bind(&hotel.destination_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(
                destination_id = %hotel.destination_id,
                "Rejected hotel with unknown destination"
            );
            return Err(StoreError::InvalidReference(hotel.destination_id));
        }

        tracing::info!(id = %hotel.id, name = %hotel.name, "Created hotel");

        self.get_by_id(&hotel.id)
            .await?
            .ok_or_else(|| StoreError::not_found("hotel", &hotel.id))
    }

    /// Merges `patch` over the stored hotel and writes it back.
    ///
    /// When the patch carries a `destinationId`, the write is conditional on
    /// that destination existing; if it does not, the stored hotel is left
    /// unchanged.
    pub async fn update(&self, id: &str, patch: Value) -> Result<HotelView, StoreError> {
        let current = self
            .get_hotel(id)
            .await?
            .ok_or_else(|| StoreError::not_found("hotel", id))?;

        let (updated, check_destination) = current.patched(patch)?;

        let mut sql = String::from(
            r#"
            UPDATE hotels
            SET destination_id = ?, name = ?, price_from = ?, stars = ?, rating = ?, body = ?, updated_at = ?
            WHERE id = ?
            "#,
        );
        if check_destination {
            sql.push_str(" AND EXISTS (SELECT 1 FROM destinations WHERE id = ?)");
        }

        let mut query = sqlx::query(&sql)
            .bind(&updated.destination_id)
            .bind(&updated.name)
            .bind(updated.price_from)
            .bind(updated.stars)
            .bind(updated.rating)
            .bind(serde_json::to_string(&updated)?)
            .bind(updated.updated_at.to_rfc3339())
            .bind(id);
        if check_destination {
            query = query.bind(&updated.destination_id);
        }

        let result = query.execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            if check_destination && self.get_hotel(id).await?.is_some() {
                return Err(StoreError::InvalidReference(updated.destination_id));
            }
            return Err(StoreError::not_found("hotel", id));
        }

        tracing::info!(id = %id, "Updated hotel");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("hotel", id))
    }

    pub async fn delete(&self, id: &str) -> Result<Hotel, StoreError> {
        let row: Option<BodyRow> = sqlx::query_as("DELETE FROM hotels WHERE id = ? RETURNING body")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let hotel: Hotel = match row {
            Some(row) => serde_json::from_str(&row.body)?,
            None => return Err(StoreError::not_found("hotel", id)),
        };

        tracing::info!(id = %id, "Deleted hotel");
        Ok(hotel)
    }

    pub async fn find_by_destination(
        &self,
        destination_id: &str,
    ) -> Result<Vec<HotelView>, StoreError> {
        self.filter(&HotelFilter::default().destination(destination_id))
            .await
    }

    /// Hotels with `min <= priceFrom <= max`.
    pub async fn find_by_price_range(
        &self,
        min: f64,
        max: f64,
    ) -> Result<Vec<HotelView>, StoreError> {
        self.filter(&HotelFilter::default().price_between(min, max))
            .await
    }

    pub async fn find_by_stars(&self, stars: i64) -> Result<Vec<HotelView>, StoreError> {
        self.filter(&HotelFilter::default().stars_between(stars, stars))
            .await
    }

    /// Hotels matching every bound in `filter`, ordered by name.
    pub async fn filter(&self, filter: &HotelFilter) -> Result<Vec<HotelView>, StoreError> {
        let mut query = QueryBuilder::<Sqlite>::new(VIEW_SELECT);
        filter.push_conditions(&mut query);
        query.push(" ORDER BY h.name");

        let rows: Vec<ViewRow> = query.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter().map(decode_view).collect()
    }

    /// Removes every hotel. Returns how many were deleted.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM hotels").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn decode_view(row: ViewRow) -> Result<HotelView, StoreError> {
    let hotel: Hotel = serde_json::from_str(&row.body)?;
    let destination = row
        .destination
        .map(|body| serde_json::from_str(&body))
        .transpose()?;

    Ok(HotelView { hotel, destination })
}
