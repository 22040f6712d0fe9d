//! HTTP request handlers.

use super::types::HealthResponse;
use super::AppState;
use crate::error::ServerError;
use axum::{
    extract::{Path, State},
    Form, Json,
};
use slash_commands::{SlashCommandMetadata, SlashResponse};
use tracing::info;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        commands: state.registry.len(),
    })
}

/// Run a slash command.
///
/// Anything that reaches a known command gets a `200` with a reply body,
/// including token and channel rejections. Unknown names are a `404`.
pub async fn dispatch_command(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Form(metadata): Form<SlashCommandMetadata>,
) -> Result<Json<SlashResponse>, ServerError> {
    let Ok(command) = state.registry.lookup(&name) else {
        return Err(ServerError::UnknownCommand(
            name.trim().trim_start_matches('/').to_string(),
        ));
    };
    info!(command = %command.name(), channel = %metadata.channel_name, "Slash command received");

    let response = state.dispatcher.handle(command, metadata).await;
    Ok(Json(response))
}
