use chrono::Utc;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::config;
use crate::database::models::{Customer, PointEntry};
use crate::types::PointReason;

use super::{ServiceError, ServiceResult};

#[derive(Debug, Serialize)]
pub struct PointsSummary {
    pub balance: i64,
    pub ledger: Vec<PointEntry>,
}

#[derive(Debug, Serialize)]
pub struct ScanResult {
    pub points_awarded: i64,
    pub balance: i64,
}

pub struct PointsService {
    pool: PgPool,
}

impl PointsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Credit points inside an open transaction. The ledger insert and the
    /// cached balance update always land together.
    pub async fn credit_in(
        conn: &mut PgConnection,
        customer_id: Uuid,
        amount: i64,
        reason: PointReason,
        business_id: Option<Uuid>,
        reference_id: Option<Uuid>,
        note: Option<&str>,
    ) -> ServiceResult<i64> {
        if amount <= 0 {
            return Err(ServiceError::invalid("Credit amount must be positive"));
        }

        sqlx::query(
            r#"
            INSERT INTO point_entries (customer_id, delta, reason, business_id, reference_id, note)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(customer_id)
        .bind(amount)
        .bind(reason.as_str())
        .bind(business_id)
        .bind(reference_id)
        .bind(note)
        .execute(&mut *conn)
        .await?;

        let (balance,): (i64,) = sqlx::query_as(
            r#"
            UPDATE customers
            SET points_balance = points_balance + $2, updated_at = now()
            WHERE id = $1
            RETURNING points_balance
            "#,
        )
        .bind(customer_id)
        .bind(amount)
        .fetch_one(&mut *conn)
        .await?;

        Ok(balance)
    }

    /// Debit points inside an open transaction. The balance guard lives in
    /// the UPDATE itself; zero rows means insufficient points, so two
    /// concurrent debits can never drive the balance negative.
    pub async fn debit_in(
        conn: &mut PgConnection,
        customer_id: Uuid,
        amount: i64,
        reason: PointReason,
        business_id: Option<Uuid>,
        reference_id: Option<Uuid>,
        note: Option<&str>,
    ) -> ServiceResult<i64> {
        if amount <= 0 {
            return Err(ServiceError::invalid("Debit amount must be positive"));
        }

        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE customers
            SET points_balance = points_balance - $2, updated_at = now()
            WHERE id = $1 AND points_balance >= $2
            RETURNING points_balance
            "#,
        )
        .bind(customer_id)
        .bind(amount)
        .fetch_optional(&mut *conn)
        .await?;

        let (balance,) = row.ok_or_else(|| ServiceError::conflict("Insufficient points"))?;

        sqlx::query(
            r#"
            INSERT INTO point_entries (customer_id, delta, reason, business_id, reference_id, note)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(customer_id)
        .bind(-amount)
        .bind(reason.as_str())
        .bind(business_id)
        .bind(reference_id)
        .bind(note)
        .execute(&mut *conn)
        .await?;

        Ok(balance)
    }

    /// Balance plus the most recent ledger entries.
    pub async fn summary(&self, customer_id: Uuid, limit: i64) -> ServiceResult<PointsSummary> {
        let customer: Customer = sqlx::query_as("SELECT * FROM customers WHERE id = $1")
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer not found"))?;

        let ledger: Vec<PointEntry> = sqlx::query_as(
            "SELECT * FROM point_entries WHERE customer_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(customer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(PointsSummary { balance: customer.points_balance, ledger })
    }

    /// QR check-in at a business. The UNIQUE(customer, business, day)
    /// constraint is the once-per-day gate; losing the insert race is a
    /// conflict, not a double award.
    pub async fn scan_checkin(&self, customer_id: Uuid, business_id: Uuid) -> ServiceResult<ScanResult> {
        let points = config::config().economy.qr_scan_points;
        let today = Utc::now().date_naive();

        let mut tx = self.pool.begin().await?;

        let inserted: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO qr_scans (customer_id, business_id, scan_day)
            VALUES ($1, $2, $3)
            ON CONFLICT (customer_id, business_id, scan_day) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(customer_id)
        .bind(business_id)
        .bind(today)
        .fetch_optional(&mut *tx)
        .await?;

        let (scan_id,) = inserted
            .ok_or_else(|| ServiceError::conflict("Already checked in at this business today"))?;

        let balance = Self::credit_in(
            &mut *tx,
            customer_id,
            points,
            PointReason::QrScan,
            Some(business_id),
            Some(scan_id),
            None,
        )
        .await?;

        tx.commit().await?;

        Ok(ScanResult { points_awarded: points, balance })
    }

    /// Signed admin adjustment. Credits and debits share the ledger
    /// guarantees above.
    pub async fn admin_adjust(
        &self,
        customer_id: Uuid,
        delta: i64,
        note: &str,
    ) -> ServiceResult<i64> {
        if delta == 0 {
            return Err(ServiceError::invalid("Adjustment must be non-zero"));
        }

        let mut tx = self.pool.begin().await?;

        let balance = if delta > 0 {
            Self::credit_in(&mut *tx, customer_id, delta, PointReason::AdminAdjustment, None, None, Some(note)).await?
        } else {
            Self::debit_in(&mut *tx, customer_id, -delta, PointReason::AdminAdjustment, None, None, Some(note)).await?
        };

        tx.commit().await?;
        Ok(balance)
    }
}
