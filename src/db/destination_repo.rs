use serde_json::Value;
use sqlx::SqlitePool;

use super::StoreError;
use crate::models::{Destination, DestinationDraft};

#[derive(Debug, Clone)]
pub struct DestinationRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct BodyRow {
    body: String,
}

impl DestinationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All destinations, ordered by name.
    pub async fn list(&self) -> Result<Vec<Destination>, StoreError> {
        let rows: Vec<BodyRow> = sqlx::query_as("SELECT body FROM destinations ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(decode).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Destination>, StoreError> {
        let row: Option<BodyRow> = sqlx::query_as("SELECT body FROM destinations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(decode).transpose()
    }

    pub async fn create(&self, draft: DestinationDraft) -> Result<Destination, StoreError> {
        let destination = Destination::new(draft.validate()?);

        sqlx::query(
            r#"
            INSERT INTO destinations (id, name, country, body, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&destination.id)
        .bind(&destination.name)
        .bind(&destination.country)
        .bind(serde_json::to_string(&destination)?)
        .bind(destination.created_at.to_rfc3339())
        .bind(destination.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::info!(id = %destination.id, name = %destination.name, "Created destination");
        Ok(destination)
    }

    /// Merges `patch` over the stored document, validates, and writes it back.
    pub async fn update(&self, id: &str, patch: Value) -> Result<Destination, StoreError> {
        let current = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("destination", id))?;

        let updated = current.patched(patch)?;

        let result = sqlx::query(
            r#"
            UPDATE destinations
            SET name = ?, country = ?, body = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&updated.name)
        .bind(&updated.country)
        .bind(serde_json::to_string(&updated)?)
        .bind(updated.updated_at.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("destination", id));
        }

        tracing::info!(id = %id, "Updated destination");
        Ok(updated)
    }

    /// Removes the destination and returns it. Hotels pointing at it are
    /// left alone.
    pub async fn delete(&self, id: &str) -> Result<Destination, StoreError> {
        let row: Option<BodyRow> = sqlx::query_as("DELETE FROM destinations WHERE id = ? RETURNING body")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let destination = row
            .map(decode)
            .transpose()?
            .ok_or_else(|| StoreError::not_found("destination", id))?;

        tracing::info!(id = %id, "Deleted destination");
        Ok(destination)
    }

    /// Destinations whose country contains `country`, ignoring case.
    pub async fn find_by_country(&self, country: &str) -> Result<Vec<Destination>, StoreError> {
        let needle = country.trim().to_lowercase();
        let destinations = self.list().await?;

        Ok(destinations
            .into_iter()
            .filter(|d| d.country.to_lowercase().contains(&needle))
            .collect())
    }

    /// Removes every destination. Returns how many were deleted.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM destinations")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn decode(row: BodyRow) -> Result<Destination, StoreError> {
    Ok(serde_json::from_str(&row.body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{test_db, TestDb};
    use crate::models::Coordinates;
    use serde_json::json;

    struct TestContext {
        repo: DestinationRepository,
        _db: TestDb,
    }

    async fn setup_repo() -> TestContext {
        let db = test_db().await;
        TestContext {
            repo: DestinationRepository::new(db.pool.clone()),
            _db: db,
        }
    }

    fn draft(name: &str, country: &str) -> DestinationDraft {
        DestinationDraft::new(
            name,
            country,
            format!("{} description", name),
            Coordinates::new(10.0, 20.0),
        )
    }

    #[tokio::test]
    async fn test_create_and_get_destination() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let paris = DestinationDraft::new(
            "Paris",
            "France",
            "The capital city of France.",
            Coordinates::new(48.8566, 2.3522),
        )
        .with_field("currency", "EUR");

        let created = repo.create(paris).await.unwrap();
        assert!(!created.id.is_empty());

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.coordinates, Coordinates::new(48.8566, 2.3522));
        assert_eq!(fetched.extra["currency"], "EUR");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let ctx = setup_repo().await;

        let result = ctx.repo.create(draft("  ", "France")).await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert!(ctx.repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let ctx = setup_repo().await;
        assert!(ctx.repo.get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.create(draft("Tokyo", "Japan")).await.unwrap();
        repo.create(draft("Dubai", "UAE")).await.unwrap();
        repo.create(draft("Paris", "France")).await.unwrap();

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Dubai", "Paris", "Tokyo"]);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let created = repo.create(draft("Paris", "France")).await.unwrap();
        let updated = repo
            .update(&created.id, json!({"description": "City of light", "bestSeason": "May"}))
            .await
            .unwrap();

        assert_eq!(updated.name, "Paris");
        assert_eq!(updated.description, "City of light");
        assert_eq!(updated.extra["bestSeason"], "May");
        assert!(updated.updated_at >= created.updated_at);

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_update_invalid_leaves_document_unchanged() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let created = repo.create(draft("Paris", "France")).await.unwrap();
        let result = repo
            .update(&created.id, json!({"coordinates": {"lat": "x", "lon": 1}}))
            .await;
        assert!(matches!(result, Err(StoreError::Validation(_))));

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let ctx = setup_repo().await;
        let result = ctx.repo.update("nope", json!({"name": "X"})).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_destination() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let created = repo.create(draft("Paris", "France")).await.unwrap();
        let deleted = repo.delete(&created.id).await.unwrap();
        assert_eq!(deleted.id, created.id);

        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&created.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_find_by_country_is_case_insensitive_substring() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.create(draft("Paris", "France")).await.unwrap();
        repo.create(draft("Nice", "France")).await.unwrap();
        repo.create(draft("Tokyo", "Japan")).await.unwrap();

        let french = repo.find_by_country("FRAN").await.unwrap();
        let names: Vec<&str> = french.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Nice", "Paris"]);

        assert!(repo.find_by_country("Peru").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let ctx = setup_repo().await;
        ctx.repo.create(draft("Paris", "France")).await.unwrap();
        ctx.repo.create(draft("Tokyo", "Japan")).await.unwrap();

        assert_eq!(ctx.repo.clear().await.unwrap(), 2);
        assert!(ctx.repo.list().await.unwrap().is_empty());
    }
}
