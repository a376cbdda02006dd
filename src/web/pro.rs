use crate::db;
use crate::domain::ProRole;
use crate::services::mealplan::{self, PlanItem, Prefs};
use crate::services::targets::{self, ResolvedTargets, Targets};
use crate::state::SharedState;
use crate::web::error::ApiError;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/clients/:client_id/targets", get(get_targets))
        .route("/clients/:client_id/targets", put(put_targets))
        .route("/clients/:client_id/prefs", get(get_prefs))
        .route("/clients/:client_id/prefs", put(put_prefs))
        .route("/clients/:client_id/plan", get(get_plan))
        .route("/clients/:client_id/plan", post(generate_plan))
        .route("/self/:user_id/targets", put(put_self_targets))
        .route("/resolved/:user_id", get(resolved_targets))
        .with_state(state)
}

async fn require_client(state: &SharedState, client_id: Uuid) -> Result<db::ProClientRow, ApiError> {
    db::get_pro_client(&state.pool, client_id)
        .await?
        .ok_or_else(|| ApiError::not_found("client not found"))
}

fn ensure_valid_macros(targets: &Targets) -> Result<(), ApiError> {
    if targets.protein_g < 0
        || targets.starchy_carbs_g < 0
        || targets.fibrous_carbs_g < 0
        || targets.fat_g < 0
    {
        return Err(ApiError::validation("macro grams must be non-negative"));
    }
    Ok(())
}

async fn get_targets(
    State(state): State<SharedState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Targets>, ApiError> {
    require_client(&state, client_id).await?;
    Ok(Json(db::get_targets(&state.pool, client_id).await?))
}

async fn put_targets(
    State(state): State<SharedState>,
    Path(client_id): Path<Uuid>,
    Json(targets): Json<Targets>,
) -> Result<Json<Targets>, ApiError> {
    require_client(&state, client_id).await?;
    ensure_valid_macros(&targets)?;
    db::set_targets(&state.pool, client_id, &targets).await?;
    Ok(Json(targets))
}

async fn get_prefs(
    State(state): State<SharedState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Prefs>, ApiError> {
    require_client(&state, client_id).await?;
    Ok(Json(db::get_prefs(&state.pool, client_id).await?))
}

async fn put_prefs(
    State(state): State<SharedState>,
    Path(client_id): Path<Uuid>,
    Json(prefs): Json<Prefs>,
) -> Result<Json<Prefs>, ApiError> {
    require_client(&state, client_id).await?;
    db::set_prefs(&state.pool, client_id, &prefs).await?;
    Ok(Json(prefs))
}

async fn get_plan(
    State(state): State<SharedState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Vec<PlanItem>>, ApiError> {
    require_client(&state, client_id).await?;
    Ok(Json(db::get_plan(&state.pool, client_id).await?))
}

/// Regenerate the 7-day plan from the client's current targets and
/// prefs, replacing whatever was stored.
async fn generate_plan(
    State(state): State<SharedState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Vec<PlanItem>>, ApiError> {
    require_client(&state, client_id).await?;
    let targets = db::get_targets(&state.pool, client_id).await?;
    let prefs = db::get_prefs(&state.pool, client_id).await?;
    let plan = mealplan::generate_plan_7d(&targets, &prefs);
    db::replace_plan(&state.pool, client_id, &plan).await?;
    Ok(Json(plan))
}

async fn put_self_targets(
    State(state): State<SharedState>,
    Path(user_id): Path<Uuid>,
    Json(targets): Json<Targets>,
) -> Result<Json<Targets>, ApiError> {
    ensure_valid_macros(&targets)?;
    db::set_self_targets(&state.pool, user_id, &targets).await?;
    Ok(Json(targets))
}

async fn resolved_targets(
    State(state): State<SharedState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ResolvedTargets>, ApiError> {
    let pro = match db::pro_client_for_user(&state.pool, user_id).await? {
        Some(client) => {
            let stored = db::get_targets(&state.pool, client.id).await?;
            let role = ProRole::parse(&client.professional_role).unwrap_or(ProRole::Coach);
            Some((stored, role))
        }
        None => None,
    };
    let self_set = db::get_self_targets(&state.pool, user_id).await?;
    Ok(Json(targets::resolve_targets(pro, self_set)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_macros_are_rejected() {
        let targets = Targets {
            protein_g: -10,
            ..Targets::default()
        };
        assert!(matches!(
            ensure_valid_macros(&targets),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn default_macros_pass_validation() {
        assert!(ensure_valid_macros(&Targets::default()).is_ok());
    }
}
