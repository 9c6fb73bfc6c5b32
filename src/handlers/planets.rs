use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;

use crate::db::{NewPlanet, Planet, PlanetPatch};
use crate::error::OrreryError;
use crate::middleware::{ApiJson, AuthUser};
use crate::router::OrreryState;

/// GET /planets -> every planet in the catalog, stable order.
pub async fn list_planets(
    State(state): State<OrreryState>,
) -> Result<Json<Vec<Planet>>, OrreryError> {
    let planets = state.storage.list_planets().await?;
    Ok(Json(planets))
}

/// GET /planet/{planet_id} -> a single planet or 404.
pub async fn get_planet(
    State(state): State<OrreryState>,
    Path(planet_id): Path<i64>,
) -> Result<Json<Planet>, OrreryError> {
    let planet = state
        .storage
        .planet_by_id(planet_id)
        .await?
        .ok_or_else(|| OrreryError::NotFound(format!("no planet with id {planet_id}")))?;
    Ok(Json(planet))
}

/// POST /planets (auth) -> 201. The name must not collide with an existing
/// planet; the pre-check gives a precise message, the schema constraint
/// closes the race behind it.
pub async fn create_planet(
    State(state): State<OrreryState>,
    user: AuthUser,
    ApiJson(body): ApiJson<NewPlanet>,
) -> Result<impl IntoResponse, OrreryError> {
    if body.planet_name.trim().is_empty() {
        return Err(OrreryError::Validation(
            "planet_name must not be empty".to_string(),
        ));
    }

    if state
        .storage
        .planet_by_name(&body.planet_name)
        .await?
        .is_some()
    {
        return Err(OrreryError::Conflict(format!(
            "planet '{}' already exists",
            body.planet_name
        )));
    }

    let planet_id = state.storage.insert_planet(&body).await?;
    info!(planet_id, planet_name = %body.planet_name, by = %user.email, "planet created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": format!("planet '{}' created", body.planet_name) })),
    ))
}

/// PUT /planet/{planet_id} (auth) -> 202. Partial update: only fields whose
/// keys are present in the body change.
pub async fn update_planet(
    State(state): State<OrreryState>,
    user: AuthUser,
    Path(planet_id): Path<i64>,
    ApiJson(patch): ApiJson<PlanetPatch>,
) -> Result<impl IntoResponse, OrreryError> {
    let existing = state
        .storage
        .planet_by_id(planet_id)
        .await?
        .ok_or_else(|| OrreryError::NotFound(format!("no planet with id {planet_id}")))?;

    if let Some(new_name) = patch.planet_name.as_deref() {
        if new_name.trim().is_empty() {
            return Err(OrreryError::Validation(
                "planet_name must not be empty".to_string(),
            ));
        }
        // a rename may collide with any planet other than this one
        if let Some(other) = state.storage.planet_by_name(new_name).await?
            && other.planet_id != planet_id
        {
            return Err(OrreryError::Conflict(format!(
                "planet '{new_name}' already exists"
            )));
        }
    }

    state.storage.update_planet(planet_id, &patch).await?;
    info!(planet_id, planet_name = %existing.planet_name, by = %user.email, "planet updated");

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "message": format!("planet {planet_id} updated") })),
    ))
}
