use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Business, CuratedList};

use super::redemption_service::is_unique_violation;
use super::{ServiceError, ServiceResult};

/// A curated list with its member businesses in position order.
#[derive(Debug, Serialize)]
pub struct ListWithBusinesses {
    pub list: CuratedList,
    pub businesses: Vec<Business>,
}

pub struct ListService {
    pool: PgPool,
}

impl ListService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        owner_account_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> ServiceResult<CuratedList> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ServiceError::invalid("List title must not be empty"));
        }

        // Slug collisions get a numeric suffix rather than an error.
        let base_slug = slugify(title);
        for attempt in 0..5 {
            let slug = if attempt == 0 {
                base_slug.clone()
            } else {
                format!("{}-{}", base_slug, attempt + 1)
            };

            let result: Result<CuratedList, sqlx::Error> = sqlx::query_as(
                r#"
                INSERT INTO curated_lists (owner_account_id, title, slug, description)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(owner_account_id)
            .bind(title)
            .bind(&slug)
            .bind(description)
            .fetch_one(&self.pool)
            .await;

            match result {
                Ok(list) => return Ok(list),
                Err(e) if is_unique_violation(&e, "curated_lists_slug_key") => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::conflict("A list with a very similar title already exists"))
    }

    pub async fn lists_for_owner(&self, owner_account_id: Uuid) -> ServiceResult<Vec<CuratedList>> {
        let rows: Vec<CuratedList> = sqlx::query_as(
            "SELECT * FROM curated_lists WHERE owner_account_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_account_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update(
        &self,
        owner_account_id: Uuid,
        list_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> ServiceResult<CuratedList> {
        if title.trim().is_empty() {
            return Err(ServiceError::invalid("List title must not be empty"));
        }

        sqlx::query_as(
            r#"
            UPDATE curated_lists
            SET title = $3, description = $4, updated_at = now()
            WHERE id = $1 AND owner_account_id = $2
            RETURNING *
            "#,
        )
        .bind(list_id)
        .bind(owner_account_id)
        .bind(title.trim())
        .bind(description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("List not found"))
    }

    pub async fn delete(&self, owner_account_id: Uuid, list_id: Uuid) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM curated_lists WHERE id = $1 AND owner_account_id = $2")
            .bind(list_id)
            .bind(owner_account_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("List not found"));
        }
        Ok(())
    }

    /// Add an approved business to a list. Re-adding moves it to the new
    /// position instead of erroring.
    pub async fn add_entry(
        &self,
        owner_account_id: Uuid,
        list_id: Uuid,
        business_id: Uuid,
        position: i32,
    ) -> ServiceResult<()> {
        self.owned_list(owner_account_id, list_id).await?;

        let business_ok: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM businesses WHERE id = $1 AND status = 'approved'")
                .bind(business_id)
                .fetch_optional(&self.pool)
                .await?;
        if business_ok.is_none() {
            return Err(ServiceError::not_found("Business not found"));
        }

        sqlx::query(
            r#"
            INSERT INTO curated_list_entries (list_id, business_id, position)
            VALUES ($1, $2, $3)
            ON CONFLICT (list_id, business_id) DO UPDATE SET position = EXCLUDED.position
            "#,
        )
        .bind(list_id)
        .bind(business_id)
        .bind(position)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove_entry(
        &self,
        owner_account_id: Uuid,
        list_id: Uuid,
        business_id: Uuid,
    ) -> ServiceResult<()> {
        self.owned_list(owner_account_id, list_id).await?;

        let result =
            sqlx::query("DELETE FROM curated_list_entries WHERE list_id = $1 AND business_id = $2")
                .bind(list_id)
                .bind(business_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("Business is not on this list"));
        }
        Ok(())
    }

    /// Featured lists with members, for the public directory.
    pub async fn featured(&self) -> ServiceResult<Vec<ListWithBusinesses>> {
        let lists: Vec<CuratedList> = sqlx::query_as(
            "SELECT * FROM curated_lists WHERE is_featured ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(lists.len());
        for list in lists {
            let businesses: Vec<Business> = sqlx::query_as(
                r#"
                SELECT b.* FROM curated_list_entries e
                JOIN businesses b ON b.id = e.business_id
                WHERE e.list_id = $1 AND b.status = 'approved'
                ORDER BY e.position, e.created_at
                "#,
            )
            .bind(list.id)
            .fetch_all(&self.pool)
            .await?;
            out.push(ListWithBusinesses { list, businesses });
        }
        Ok(out)
    }

    // --- admin surface ---

    pub async fn set_featured(&self, list_id: Uuid, featured: bool) -> ServiceResult<CuratedList> {
        sqlx::query_as(
            r#"
            UPDATE curated_lists
            SET is_featured = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(list_id)
        .bind(featured)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("List not found"))
    }

    async fn owned_list(&self, owner_account_id: Uuid, list_id: Uuid) -> ServiceResult<CuratedList> {
        sqlx::query_as("SELECT * FROM curated_lists WHERE id = $1 AND owner_account_id = $2")
            .bind(list_id)
            .bind(owner_account_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("List not found"))
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "list".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs() {
        assert_eq!(slugify("Best Brunch in Naga"), "best-brunch-in-naga");
        assert_eq!(slugify("  Coffee & Cake!  "), "coffee-cake");
        assert_eq!(slugify("日本語"), "list");
    }
}
