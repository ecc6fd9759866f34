//! # API Route Configuration
//!
//! This module sets up all the HTTP routes for the API.

use actix_web::web;

use super::handlers;

/// Configure all API routes.
///
/// This function is called from main.rs to set up
/// all the endpoint routes.
///
/// ## Route Structure
///
/// ```text
/// /
/// ├── /health                     GET - Health check
/// └── /api
///     ├── /auth
///     │   ├── /register           POST - Create account
///     │   ├── /login              POST - Log in
///     │   ├── /me                 GET - Current account
///     │   ├── /update-profile     PUT - Update profile
///     │   └── /change-password    PUT - Change password
///     ├── /cards
///     │   ├── /                   GET - List cards, POST - Create (admin)
///     │   ├── /import             POST - Bulk import (admin)
///     │   ├── /stats/overview     GET - Catalog aggregates
///     │   └── /{cardId}           GET / PUT / DELETE
///     ├── /collections
///     │   ├── /me                 GET - My collection
///     │   ├── /me/detailed        GET - My collection, joined
///     │   ├── /me/stats           GET - Recompute my stats
///     │   ├── /cards              POST - Add cards
///     │   ├── /cards/{cardId}     DELETE - Remove cards
///     │   ├── /cards/{cardId}/favorite  PUT - Toggle favorite
///     │   └── /{userId}           GET - Another user's stats
///     └── /decks
///         ├── /                   GET - My decks, POST - Create
///         ├── /public/search      GET - Public deck search
///         ├── /{id}               GET / PUT / DELETE
///         ├── /{id}/detailed      GET - Deck, joined
///         ├── /{id}/cards         POST - Add card
///         ├── /{id}/cards/{cardId}  DELETE - Remove card
///         ├── /{id}/validate      POST - Re-check legality
///         └── /{id}/game-result   POST - Record a game
/// ```
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Root endpoint - API information
        .route("/", web::get().to(handlers::api_info))
        // Health check endpoint
        .route("/health", web::get().to(handlers::health_check))
        .service(
            web::scope("/api")
                // Account endpoints
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(handlers::register))
                        .route("/login", web::post().to(handlers::login))
                        .route("/me", web::get().to(handlers::me))
                        .route("/update-profile", web::put().to(handlers::update_profile))
                        .route(
                            "/change-password",
                            web::put().to(handlers::change_password),
                        ),
                )
                // Catalog endpoints
                .service(
                    web::scope("/cards")
                        .route("", web::get().to(handlers::list_cards))
                        .route("", web::post().to(handlers::create_card))
                        .route("/import", web::post().to(handlers::import_cards))
                        .route(
                            "/stats/overview",
                            web::get().to(handlers::card_stats_overview),
                        )
                        .route("/{card_id}", web::get().to(handlers::get_card))
                        .route("/{card_id}", web::put().to(handlers::update_card))
                        .route("/{card_id}", web::delete().to(handlers::delete_card)),
                )
                // Collection endpoints
                .service(
                    web::scope("/collections")
                        .route("/me", web::get().to(handlers::get_my_collection))
                        .route(
                            "/me/detailed",
                            web::get().to(handlers::get_my_collection_detailed),
                        )
                        .route(
                            "/me/stats",
                            web::get().to(handlers::get_my_collection_stats),
                        )
                        .route("/cards", web::post().to(handlers::add_collection_card))
                        .route(
                            "/cards/{card_id}",
                            web::delete().to(handlers::remove_collection_card),
                        )
                        .route(
                            "/cards/{card_id}/favorite",
                            web::put().to(handlers::favorite_card),
                        )
                        .route("/{user_id}", web::get().to(handlers::get_public_collection)),
                )
                // Deck endpoints. The public search is registered before the
                // `{id}` routes so "public" never parses as a deck id.
                .service(
                    web::scope("/decks")
                        .route(
                            "/public/search",
                            web::get().to(handlers::search_public_decks),
                        )
                        .route("", web::get().to(handlers::list_decks))
                        .route("", web::post().to(handlers::create_deck))
                        .route("/{id}", web::get().to(handlers::get_deck))
                        .route("/{id}/detailed", web::get().to(handlers::get_deck_detailed))
                        .route("/{id}", web::put().to(handlers::update_deck))
                        .route("/{id}", web::delete().to(handlers::delete_deck))
                        .route("/{id}/cards", web::post().to(handlers::add_deck_card))
                        .route(
                            "/{id}/cards/{card_id}",
                            web::delete().to(handlers::remove_deck_card),
                        )
                        .route("/{id}/validate", web::post().to(handlers::validate_deck))
                        .route(
                            "/{id}/game-result",
                            web::post().to(handlers::record_game),
                        ),
                ),
        );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use deadpool_postgres::{Config as PoolConfig, Runtime};
    use tokio_postgres::NoTls;
    use uuid::Uuid;

    use crate::config::AppConfig;
    use crate::db::Database;
    use crate::services::{AccountManager, CardCatalog, CollectionManager, DeckManager};
    use crate::AppState;

    use super::configure_routes;

    /// State wired to a pool with nothing listening behind it. Requests
    /// that reach a handler fail at the database (5xx); requests rejected
    /// by the auth extractor never get that far (401).
    fn offline_state() -> Arc<AppState> {
        let mut cfg = PoolConfig::new();
        cfg.dbname = Some("riftbound_test".to_string());
        cfg.host = Some("127.0.0.1".to_string());
        cfg.port = Some(1);
        cfg.user = Some("nobody".to_string());
        let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls).unwrap();

        let db = Database::from_pool(pool);
        let catalog = Arc::new(CardCatalog::new(db.clone()));

        Arc::new(AppState {
            db: db.clone(),
            catalog: catalog.clone(),
            accounts: AccountManager::new(db.clone()),
            collections: CollectionManager::new(db.clone(), catalog.clone()),
            decks: DeckManager::new(db, catalog),
            config: AppConfig {
                database_url: String::new(),
                jwt_secret: "test-secret".to_string(),
                jwt_expire_hours: 1,
                server_host: "127.0.0.1".to_string(),
                server_port: 0,
            },
        })
    }

    #[actix_web::test]
    async fn public_deck_search_accepts_anonymous_requests() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(offline_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/decks/public/search")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_ne!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn public_collection_stats_accept_anonymous_requests() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(offline_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/collections/{}", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_ne!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn private_deck_listing_still_requires_a_token() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(offline_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/decks").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
