use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::moderation::BanRecordRepo,
    domain::entities::ban_record::{BanRecord, NewBanRecord},
};

fn row_to_ban(row: sqlx::postgres::PgRow) -> BanRecord {
    BanRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        reason: row.get("reason"),
        banned_by: row.get("banned_by"),
        banned_until: row.get("banned_until"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl BanRecordRepo for PostgresPersistence {
    async fn get_ban(&self, user_id: Uuid) -> AppResult<Option<BanRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, reason, banned_by, banned_until, created_at
            FROM user_bans
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_ban))
    }

    async fn upsert_ban(&self, ban: &NewBanRecord) -> AppResult<BanRecord> {
        let row = sqlx::query(
            r#"
            INSERT INTO user_bans (id, user_id, reason, banned_by, banned_until)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET reason = EXCLUDED.reason,
                banned_by = EXCLUDED.banned_by,
                banned_until = EXCLUDED.banned_until,
                created_at = NOW()
            RETURNING id, user_id, reason, banned_by, banned_until, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(ban.user_id)
        .bind(ban.reason.as_deref())
        .bind(ban.banned_by)
        .bind(ban.banned_until)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_ban(row))
    }

    async fn delete_ban(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM user_bans WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}
