use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::lead::{Lead, LeadSource},
    scope::LeadScope,
    use_cases::leads::{LeadRepo, LeadUpdate, NewLead},
};

const LEAD_COLUMNS: &str = "id, first_name, last_name, age, phoned, source, agent_id, \
                            category_id, organization_id, profile_picture, special_files, \
                            created_at";

fn row_to_lead(row: sqlx::postgres::PgRow) -> Lead {
    let source: Option<String> = row.get("source");
    Lead {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        age: row.get("age"),
        phoned: row.get("phoned"),
        source: source.as_deref().and_then(LeadSource::from_str),
        agent_id: row.get("agent_id"),
        category_id: row.get("category_id"),
        organization_id: row.get("organization_id"),
        profile_picture: row.get("profile_picture"),
        special_files: row.get("special_files"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl LeadRepo for PostgresPersistence {
    async fn create(&self, lead: &NewLead) -> AppResult<Lead> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO leads (id, first_name, last_name, age, phoned, source, agent_id,
                               category_id, organization_id, profile_picture, special_files)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&lead.first_name)
        .bind(&lead.last_name)
        .bind(lead.age)
        .bind(lead.phoned)
        .bind(lead.source.map(|s| s.as_str()))
        .bind(lead.agent_id)
        .bind(lead.category_id)
        .bind(lead.organization_id)
        .bind(&lead.profile_picture)
        .bind(&lead.special_files)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_lead(row))
    }

    async fn list_assigned(&self, scope: LeadScope) -> AppResult<Vec<Lead>> {
        let rows = match scope {
            LeadScope::Organization(organization_id) => {
                sqlx::query(&format!(
                    r#"
                    SELECT {LEAD_COLUMNS} FROM leads
                    WHERE organization_id = $1 AND agent_id IS NOT NULL
                    ORDER BY created_at DESC
                    "#
                ))
                .bind(organization_id)
                .fetch_all(&self.pool)
                .await
            }
            LeadScope::AssignedTo {
                organization_id,
                agent_id,
            } => {
                sqlx::query(&format!(
                    r#"
                    SELECT {LEAD_COLUMNS} FROM leads
                    WHERE organization_id = $1 AND agent_id = $2
                    ORDER BY created_at DESC
                    "#
                ))
                .bind(organization_id)
                .bind(agent_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(AppError::from)?;

        Ok(rows.into_iter().map(row_to_lead).collect())
    }

    async fn list_unassigned(&self, organization_id: Uuid) -> AppResult<Vec<Lead>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {LEAD_COLUMNS} FROM leads
            WHERE organization_id = $1 AND agent_id IS NULL
            ORDER BY created_at DESC
            "#
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows.into_iter().map(row_to_lead).collect())
    }

    async fn get(&self, scope: LeadScope, lead_id: Uuid) -> AppResult<Option<Lead>> {
        let row = match scope {
            LeadScope::Organization(organization_id) => {
                sqlx::query(&format!(
                    "SELECT {LEAD_COLUMNS} FROM leads WHERE organization_id = $1 AND id = $2"
                ))
                .bind(organization_id)
                .bind(lead_id)
                .fetch_optional(&self.pool)
                .await
            }
            LeadScope::AssignedTo {
                organization_id,
                agent_id,
            } => {
                sqlx::query(&format!(
                    r#"
                    SELECT {LEAD_COLUMNS} FROM leads
                    WHERE organization_id = $1 AND id = $2 AND agent_id = $3
                    "#
                ))
                .bind(organization_id)
                .bind(lead_id)
                .bind(agent_id)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(AppError::from)?;

        Ok(row.map(row_to_lead))
    }

    async fn update(
        &self,
        organization_id: Uuid,
        lead_id: Uuid,
        update: &LeadUpdate,
    ) -> AppResult<Option<Lead>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE leads
            SET first_name = $3, last_name = $4, age = $5, phoned = $6, source = $7,
                agent_id = $8, category_id = $9, profile_picture = $10, special_files = $11
            WHERE organization_id = $1 AND id = $2
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(lead_id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(update.age)
        .bind(update.phoned)
        .bind(update.source.map(|s| s.as_str()))
        .bind(update.agent_id)
        .bind(update.category_id)
        .bind(&update.profile_picture)
        .bind(&update.special_files)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_lead))
    }

    async fn delete(&self, organization_id: Uuid, lead_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM leads WHERE organization_id = $1 AND id = $2")
            .bind(organization_id)
            .bind(lead_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_agent(
        &self,
        organization_id: Uuid,
        lead_id: Uuid,
        agent_id: Uuid,
    ) -> AppResult<Option<Lead>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE leads SET agent_id = $3
            WHERE organization_id = $1 AND id = $2
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(lead_id)
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_lead))
    }

    async fn set_category(
        &self,
        scope: LeadScope,
        lead_id: Uuid,
        category_id: Option<Uuid>,
    ) -> AppResult<Option<Lead>> {
        let row = match scope {
            LeadScope::Organization(organization_id) => {
                sqlx::query(&format!(
                    r#"
                    UPDATE leads SET category_id = $3
                    WHERE organization_id = $1 AND id = $2
                    RETURNING {LEAD_COLUMNS}
                    "#
                ))
                .bind(organization_id)
                .bind(lead_id)
                .bind(category_id)
                .fetch_optional(&self.pool)
                .await
            }
            LeadScope::AssignedTo {
                organization_id,
                agent_id,
            } => {
                sqlx::query(&format!(
                    r#"
                    UPDATE leads SET category_id = $3
                    WHERE organization_id = $1 AND id = $2 AND agent_id = $4
                    RETURNING {LEAD_COLUMNS}
                    "#
                ))
                .bind(organization_id)
                .bind(lead_id)
                .bind(category_id)
                .bind(agent_id)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(AppError::from)?;

        Ok(row.map(row_to_lead))
    }

    async fn list_by_category(
        &self,
        organization_id: Uuid,
        category_id: Uuid,
    ) -> AppResult<Vec<Lead>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {LEAD_COLUMNS} FROM leads
            WHERE organization_id = $1 AND category_id = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(organization_id)
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows.into_iter().map(row_to_lead).collect())
    }

    async fn count_uncategorized(&self, organization_id: Uuid) -> AppResult<i64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM leads WHERE organization_id = $1 AND category_id IS NULL",
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.0)
    }
}
