use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::db::Storage;
use crate::handlers::{planets, users};
use crate::service::{Mailer, TokenKeys};

/// Application context handed to every handler; no process-wide singletons.
#[derive(Clone)]
pub struct OrreryState {
    pub storage: Storage,
    pub tokens: Arc<TokenKeys>,
    pub mailer: Arc<Mailer>,
    pub reset_ttl_minutes: i64,
}

impl OrreryState {
    pub fn new(
        storage: Storage,
        tokens: TokenKeys,
        mailer: Mailer,
        reset_ttl_minutes: i64,
    ) -> Self {
        Self {
            storage,
            tokens: Arc::new(tokens),
            mailer: Arc::new(mailer),
            reset_ttl_minutes,
        }
    }
}

pub fn orrery_router(state: OrreryState) -> Router {
    Router::new()
        .route(
            "/planets",
            get(planets::list_planets).post(planets::create_planet),
        )
        .route(
            "/planet/{planet_id}",
            get(planets::get_planet).put(planets::update_planet),
        )
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route(
            "/reset_password/{email}",
            get(users::request_password_reset),
        )
        .route("/reset_password", post(users::confirm_password_reset))
        .with_state(state)
}
