use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::database::models::Notification;

use super::{ServiceError, ServiceResult};

pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification inside an open transaction, so it commits or
    /// rolls back with the event that caused it.
    pub async fn notify_in(
        conn: &mut PgConnection,
        account_id: Uuid,
        kind: &str,
        title: &str,
        body: Option<&str>,
    ) -> ServiceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (account_id, kind, title, body)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(account_id)
        .bind(kind)
        .bind(title)
        .bind(body)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn list(
        &self,
        account_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<Notification>> {
        let rows: Vec<Notification> = if unread_only {
            sqlx::query_as(
                r#"
                SELECT * FROM notifications
                WHERE account_id = $1 AND read_at IS NULL
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(account_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as(
                r#"
                SELECT * FROM notifications
                WHERE account_id = $1
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(account_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        };
        Ok(rows)
    }

    /// Mark one notification read. Scoped to the owning account.
    pub async fn mark_read(&self, account_id: Uuid, notification_id: Uuid) -> ServiceResult<Notification> {
        sqlx::query_as(
            r#"
            UPDATE notifications
            SET read_at = COALESCE(read_at, now())
            WHERE id = $1 AND account_id = $2
            RETURNING *
            "#,
        )
        .bind(notification_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Notification not found"))
    }

    /// Mark everything read; returns how many rows flipped.
    pub async fn mark_all_read(&self, account_id: Uuid) -> ServiceResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = now() WHERE account_id = $1 AND read_at IS NULL",
        )
        .bind(account_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
