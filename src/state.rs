use crate::token::TokenKeeper;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: TokenKeeper,
}

pub type SharedState = Arc<AppState>;
