use axum::extract::{Path, Query};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Business, Deal};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::affiliate_service::ResolvedLink;
use crate::services::business_service::BusinessDetail;
use crate::services::list_service::ListWithBusinesses;
use crate::services::{AffiliateService, BusinessService, ListService};

#[derive(Debug, Deserialize)]
pub struct DirectoryQuery {
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /directory/businesses - approved businesses, paged
pub async fn businesses(Query(query): Query<DirectoryQuery>) -> ApiResult<Vec<Business>> {
    let (limit, offset) = super::super::page_params(query.limit, query.offset);
    let pool = super::super::pool().await?;
    let rows = BusinessService::new(pool)
        .directory(query.category.as_deref(), limit, offset)
        .await?;
    Ok(ApiResponse::success(rows))
}

/// GET /directory/businesses/:id - approved business with live programs
pub async fn business_detail(Path(id): Path<Uuid>) -> ApiResult<BusinessDetail> {
    let pool = super::super::pool().await?;
    let detail = BusinessService::new(pool).directory_detail(id).await?;
    Ok(ApiResponse::success(detail))
}

/// GET /directory/lists - featured curated lists
pub async fn featured_lists() -> ApiResult<Vec<ListWithBusinesses>> {
    let pool = super::super::pool().await?;
    let lists = ListService::new(pool).featured().await?;
    Ok(ApiResponse::success(lists))
}

/// GET /directory/deals - currently-running deals across businesses
pub async fn running_deals(Query(query): Query<PageQuery>) -> ApiResult<Vec<Deal>> {
    let (limit, offset) = super::super::page_params(query.limit, query.offset);
    let pool = super::super::pool().await?;
    let deals = BusinessService::new(pool).running_deals(limit, offset).await?;
    Ok(ApiResponse::success(deals))
}

/// GET /r/:code - affiliate link resolution. 404 whenever the program is
/// off, before any database work.
pub async fn resolve_affiliate(Path(code): Path<String>) -> ApiResult<ResolvedLink> {
    if !crate::config::config().economy.affiliates_enabled {
        return Err(crate::error::ApiError::not_found("Unknown link"));
    }

    let pool = super::super::pool().await?;
    let link = AffiliateService::new(pool).resolve_click(&code).await?;
    Ok(ApiResponse::success(link))
}
