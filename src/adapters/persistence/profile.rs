use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::moderation::ProfileRepo,
    domain::entities::{profile::Profile, role::Role},
};

fn row_to_profile(row: sqlx::postgres::PgRow) -> Profile {
    let role: Option<String> = row.get("role");
    Profile {
        id: row.get("id"),
        username: row.get("username"),
        avatar_url: row.get("avatar_url"),
        role: Role::from_raw(role.as_deref()),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl ProfileRepo for PostgresPersistence {
    async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, avatar_url, role, created_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_profile))
    }

    async fn earliest_admin(&self) -> AppResult<Option<Profile>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, avatar_url, role, created_at
            FROM profiles
            WHERE role = $1
            ORDER BY created_at ASC NULLS LAST
            LIMIT 1
            "#,
        )
        .bind(Role::Admin.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_profile))
    }
}
