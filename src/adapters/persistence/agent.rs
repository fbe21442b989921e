use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::agent::Agent,
    use_cases::agents::{AgentProfile, AgentRepo},
};

fn row_to_agent(row: sqlx::postgres::PgRow) -> Agent {
    Agent {
        id: row.get("id"),
        user_id: row.get("user_id"),
        organization_id: row.get("organization_id"),
        created_at: row.get("created_at"),
    }
}

fn row_to_profile(row: sqlx::postgres::PgRow) -> AgentProfile {
    AgentProfile {
        id: row.get("id"),
        user_id: row.get("user_id"),
        username: row.get("username"),
        email: row.get("email"),
        organization_id: row.get("organization_id"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl AgentRepo for PostgresPersistence {
    async fn create(&self, user_id: Uuid, organization_id: Uuid) -> AppResult<Agent> {
        let row = sqlx::query(
            r#"
            INSERT INTO agents (id, user_id, organization_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, organization_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_agent(row))
    }

    async fn list(&self, organization_id: Uuid) -> AppResult<Vec<AgentProfile>> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.user_id, u.username, u.email, a.organization_id, a.created_at
            FROM agents a
            JOIN users u ON u.id = a.user_id
            WHERE a.organization_id = $1
            ORDER BY u.username ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows.into_iter().map(row_to_profile).collect())
    }

    async fn get(&self, organization_id: Uuid, agent_id: Uuid) -> AppResult<Option<AgentProfile>> {
        let row = sqlx::query(
            r#"
            SELECT a.id, a.user_id, u.username, u.email, a.organization_id, a.created_at
            FROM agents a
            JOIN users u ON u.id = a.user_id
            WHERE a.organization_id = $1 AND a.id = $2
            "#,
        )
        .bind(organization_id)
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_profile))
    }

    async fn get_by_id(&self, agent_id: Uuid) -> AppResult<Option<Agent>> {
        let row = sqlx::query(
            "SELECT id, user_id, organization_id, created_at FROM agents WHERE id = $1",
        )
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_agent))
    }

    async fn get_by_user(&self, user_id: Uuid) -> AppResult<Option<Agent>> {
        let row = sqlx::query(
            "SELECT id, user_id, organization_id, created_at FROM agents WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_agent))
    }

    async fn delete(&self, organization_id: Uuid, agent_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM agents WHERE organization_id = $1 AND id = $2")
            .bind(organization_id)
            .bind(agent_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
