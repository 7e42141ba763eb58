use axum::{middleware::from_fn, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::middleware::auth::{jwt_auth_middleware, require_admin, require_business};

pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        .merge(directory_routes())
        // Protected API
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
}

fn directory_routes() -> Router {
    use handlers::public::directory;

    Router::new()
        .route("/directory/businesses", get(directory::businesses))
        .route("/directory/businesses/:id", get(directory::business_detail))
        .route("/directory/lists", get(directory::featured_lists))
        .route("/directory/deals", get(directory::running_deals))
        // Affiliate link resolution; dark while the program is disabled
        .route("/r/:code", get(directory::resolve_affiliate))
}

fn protected_routes() -> Router {
    Router::new()
        .merge(customer_api_routes())
        .merge(business_api_routes().layer(from_fn(require_business)))
        .merge(admin_api_routes().layer(from_fn(require_admin)))
        .layer(from_fn(jwt_auth_middleware))
}

fn customer_api_routes() -> Router {
    use axum::routing::post;
    use handlers::protected::auth;
    use handlers::protected::customer::{notifications, points, punch_cards, receipts, rewards};

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        // Points economy
        .route("/api/customer/points", get(points::points))
        .route("/api/scan", post(points::scan))
        // Punch cards
        .route("/api/punch-cards", get(punch_cards::list))
        .route("/api/punch-cards/:id/join", post(punch_cards::join))
        // Receipts
        .route("/api/receipts", get(receipts::list).post(receipts::submit))
        // Rewards and offers
        .route("/api/rewards", get(rewards::rewards))
        .route("/api/rewards/:id/redeem", post(rewards::redeem))
        .route("/api/redemptions", get(rewards::redemptions))
        .route("/api/offers", get(rewards::offers))
        .route("/api/offers/discount/:id/claim", post(rewards::claim_discount))
        .route("/api/offers/exclusive/:id/claim", post(rewards::claim_exclusive))
        // Notifications (any role)
        .route("/api/notifications", get(notifications::list))
        .route("/api/notifications/read-all", post(notifications::mark_all_read))
        .route("/api/notifications/:id/read", post(notifications::mark_read))
}

fn business_api_routes() -> Router {
    use axum::routing::{delete, post};
    use handlers::protected::business::{
        analytics, lists, offers, punch_cards, receipts, redemptions, rewards,
    };

    Router::new()
        // Punch card programs
        .route(
            "/api/business/punch-cards",
            get(punch_cards::list).post(punch_cards::create),
        )
        .route(
            "/api/business/punch-cards/:id",
            axum::routing::put(punch_cards::update).delete(punch_cards::deactivate),
        )
        .route("/api/business/punch-cards/:id/customers", get(punch_cards::customers))
        .route("/api/business/punch-cards/:id/punch", post(punch_cards::punch))
        .route("/api/business/punch-cards/:id/punch/bulk", post(punch_cards::punch_bulk))
        // Rewards
        .route("/api/business/rewards", get(rewards::list).post(rewards::create))
        .route(
            "/api/business/rewards/:id",
            axum::routing::put(rewards::update).delete(rewards::deactivate),
        )
        // Offers and deals
        .route(
            "/api/business/offers/discount",
            get(offers::list_discounts).post(offers::create_discount),
        )
        .route("/api/business/offers/discount/:id", delete(offers::deactivate_discount))
        .route(
            "/api/business/offers/exclusive",
            get(offers::list_exclusives).post(offers::create_exclusive),
        )
        .route("/api/business/offers/exclusive/:id", delete(offers::deactivate_exclusive))
        .route("/api/business/deals", get(offers::list_deals).post(offers::create_deal))
        .route("/api/business/deals/:id", delete(offers::delete_deal))
        // Receipt review
        .route("/api/business/receipts", get(receipts::list))
        .route("/api/business/receipts/:id/approve", post(receipts::approve))
        .route("/api/business/receipts/:id/reject", post(receipts::reject))
        // Redemption verification
        .route("/api/business/redemptions/verify", post(redemptions::verify))
        // Curated lists
        .route("/api/business/lists", get(lists::list).post(lists::create))
        .route(
            "/api/business/lists/:id",
            axum::routing::put(lists::update).delete(lists::delete),
        )
        .route("/api/business/lists/:id/entries", post(lists::add_entry))
        .route(
            "/api/business/lists/:id/entries/:business_id",
            delete(lists::remove_entry),
        )
        // Analytics
        .route("/api/business/analytics", get(analytics::dashboard))
}

fn admin_api_routes() -> Router {
    use axum::routing::post;
    use handlers::elevated::admin::{affiliates, businesses, customers, lists};

    Router::new()
        .route("/api/admin/businesses", get(businesses::list))
        .route("/api/admin/businesses/:id/approve", post(businesses::approve))
        .route("/api/admin/businesses/:id/suspend", post(businesses::suspend))
        .route("/api/admin/businesses/:id/restore", post(businesses::restore))
        .route("/api/admin/customers/:id/adjust-points", post(customers::adjust_points))
        .route("/api/admin/lists/:id/feature", post(lists::feature))
        .route("/api/admin/lists/:id/unfeature", post(lists::unfeature))
        .route("/api/admin/affiliates", get(affiliates::list).post(affiliates::create))
        .route("/api/admin/affiliates/:id/deactivate", post(affiliates::deactivate))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Naga Perks API",
            "version": version,
            "description": "Multi-tenant loyalty and rewards platform",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login, /auth/refresh (public)",
                "directory": "/directory/businesses[/:id], /directory/lists, /directory/deals (public)",
                "customer": "/api/customer/*, /api/punch-cards, /api/receipts, /api/rewards, /api/offers (protected)",
                "business": "/api/business/* (protected, business accounts)",
                "admin": "/api/admin/* (protected, admin accounts)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
