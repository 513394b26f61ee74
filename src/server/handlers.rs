use serde::Serialize;
use serde_json::json;
use std::{sync::Arc, time::Instant};
use tracing::{error, info, warn};
use warp::{
    hyper::body::Bytes,
    http::StatusCode,
    reply::{self, Json, WithStatus},
    Rejection,
};

use super::AppState;
use crate::ai::{chat, search, ChatRequest, SearchRequest};
use crate::process::{parse_table, Record};

#[derive(Serialize)]
struct OpportunitiesResponse {
    data: Vec<Record>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct TextResponse {
    text: String,
}

fn json_status<T: Serialize>(body: &T, status: StatusCode) -> WithStatus<Json> {
    reply::with_status(reply::json(body), status)
}

fn error_reply(message: &str, status: StatusCode) -> WithStatus<Json> {
    json_status(
        &ErrorResponse {
            error: message.to_string(),
        },
        status,
    )
}

pub async fn health() -> Result<WithStatus<Json>, Rejection> {
    Ok(json_status(
        &json!({
            "status": "healthy",
            "service": "opportunities"
        }),
        StatusCode::OK,
    ))
}

/// `GET /api/opportunities`: fetch the sheet, parse it, return `{ data }`.
pub async fn opportunities(state: Arc<AppState>) -> Result<WithStatus<Json>, Rejection> {
    let start = Instant::now();

    let body = match state.source.fetch_text().await {
        Ok(b) => b,
        Err(e) => {
            error!("Error fetching opportunities: {:?}", e);
            return Ok(error_reply(
                "Failed to fetch opportunities data",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    };

    let data = parse_table(&body);
    info!(records = data.len(), elapsed = ?start.elapsed(), "served opportunities");
    Ok(json_status(
        &OpportunitiesResponse { data },
        StatusCode::OK,
    ))
}

/// `POST /api/search`: home insights from the model, or the canned answer.
pub async fn search(body: Bytes, state: Arc<AppState>) -> Result<WithStatus<Json>, Rejection> {
    let req = SearchRequest::from_body(&body);
    let Some(query) = req.query() else {
        warn!("search request without query");
        return Ok(error_reply("Missing query", StatusCode::BAD_REQUEST));
    };

    let answer = search::answer(state.completer.as_deref(), query, &req.context).await;
    Ok(json_status(&answer, StatusCode::OK))
}

/// `POST /api/chat`: careers chat replies and job-title remixes.
pub async fn chat(body: Bytes, state: Arc<AppState>) -> Result<WithStatus<Json>, Rejection> {
    let text_reply = |text: &str, status| {
        json_status(
            &TextResponse {
                text: text.to_string(),
            },
            status,
        )
    };

    let Some(completer) = state.completer.as_deref() else {
        return Ok(text_reply(
            chat::NOT_CONFIGURED,
            StatusCode::INTERNAL_SERVER_ERROR,
        ));
    };

    let req: ChatRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "undecodable chat request");
            return Ok(text_reply(chat::APOLOGY, StatusCode::INTERNAL_SERVER_ERROR));
        }
    };

    match chat::reply(completer, &state.brief, &req).await {
        Ok(text) => Ok(text_reply(&text, StatusCode::OK)),
        Err(e) => {
            error!("API error: {:?}", e);
            Ok(text_reply(chat::APOLOGY, StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}
