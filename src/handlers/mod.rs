pub mod elevated;
pub mod protected;
pub mod public;

use sqlx::PgPool;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;

/// Every handler goes through the shared pool manager.
pub(crate) async fn pool() -> Result<PgPool, ApiError> {
    Ok(DatabaseManager::main_pool().await?)
}

/// Clamp client paging input to configured bounds.
pub(crate) fn page_params(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let api = &crate::config::config().api;
    let limit = limit.unwrap_or(api.default_page_size).clamp(1, api.max_page_size);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_clamps() {
        let api = &crate::config::config().api;
        assert_eq!(page_params(None, None), (api.default_page_size, 0));
        assert_eq!(page_params(Some(0), Some(-5)), (1, 0));
        assert_eq!(page_params(Some(api.max_page_size + 1000), None), (api.max_page_size, 0));
    }
}
