// src/server/mod.rs
use std::{convert::Infallible, sync::Arc};
use warp::{Filter, Rejection, Reply};

use crate::ai::{Completer, RoleBrief};
use crate::fetch::TextSource;

pub mod handlers;

/// Everything the handlers need, shared across requests.
pub struct AppState {
    pub source: Arc<dyn TextSource>,
    /// `None` when no model API key is configured.
    pub completer: Option<Arc<dyn Completer>>,
    pub brief: RoleBrief,
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// All HTTP routes of the service.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::health);

    let opportunities = warp::path!("api" / "opportunities")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::opportunities);

    let search = warp::path!("api" / "search")
        .and(warp::post())
        .and(warp::body::bytes())
        .and(with_state(state.clone()))
        .and_then(handlers::search);

    let chat = warp::path!("api" / "chat")
        .and(warp::post())
        .and(warp::body::bytes())
        .and(with_state(state))
        .and_then(handlers::chat);

    health.or(opportunities).or(search).or(chat)
}
