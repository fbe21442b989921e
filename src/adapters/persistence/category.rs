use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::category::Category,
    use_cases::categories::CategoryRepo,
};

fn row_to_category(row: sqlx::postgres::PgRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        organization_id: row.get("organization_id"),
    }
}

#[async_trait]
impl CategoryRepo for PostgresPersistence {
    async fn create(&self, organization_id: Uuid, name: &str) -> AppResult<Category> {
        let row = sqlx::query(
            r#"
            INSERT INTO categories (id, name, organization_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, organization_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_category(row))
    }

    async fn list(&self, organization_id: Uuid) -> AppResult<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, organization_id
            FROM categories
            WHERE organization_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows.into_iter().map(row_to_category).collect())
    }

    async fn get(&self, organization_id: Uuid, category_id: Uuid) -> AppResult<Option<Category>> {
        let row = sqlx::query(
            "SELECT id, name, organization_id FROM categories WHERE organization_id = $1 AND id = $2",
        )
        .bind(organization_id)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_category))
    }

    async fn update(
        &self,
        organization_id: Uuid,
        category_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Category>> {
        let row = sqlx::query(
            r#"
            UPDATE categories SET name = $3
            WHERE organization_id = $1 AND id = $2
            RETURNING id, name, organization_id
            "#,
        )
        .bind(organization_id)
        .bind(category_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_category))
    }

    async fn delete(&self, organization_id: Uuid, category_id: Uuid) -> AppResult<bool> {
        // Null the references and drop the row in one transaction so a
        // half-applied delete can never leave dangling leads.
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        sqlx::query(
            r#"
            UPDATE leads SET category_id = NULL
            WHERE organization_id = $1 AND category_id = $2
            "#,
        )
        .bind(organization_id)
        .bind(category_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

        let result = sqlx::query("DELETE FROM categories WHERE organization_id = $1 AND id = $2")
            .bind(organization_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;
        Ok(result.rows_affected() > 0)
    }
}
