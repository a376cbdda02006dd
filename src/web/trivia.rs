use crate::db;
use crate::domain::{parse_tags, Category, PsychTag};
use crate::services::badges;
use crate::services::challenge::{self, MissSummary};
use crate::services::composer;
use crate::services::scoring::{self, ItemResult};
use crate::state::SharedState;
use crate::time_utils;
use crate::web::error::ApiError;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

pub const WEEKLY_TOP_LIMIT: i64 = 25;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/start", post(start))
        .route("/answer", post(answer))
        .route("/finish", post(finish))
        .route("/leaderboard/weekly", get(weekly_leaderboard))
        .route("/stats/:user_id", get(stats))
        .route("/bank/import", post(import_bank))
        .route("/profile", post(update_profile))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartPayload {
    user_id: Option<Uuid>,
    count: Option<i64>,
}

/// Catalog entry as sent to the client: the correct index and the
/// explanation stay server-side until finish.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublicQuestion {
    id: Uuid,
    order: i16,
    category: Category,
    prompt: String,
    choices: Vec<String>,
    difficulty: i16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartResponse {
    round_id: Uuid,
    token: String,
    time_limit_sec: i32,
    questions: Vec<PublicQuestion>,
}

async fn psych_profile(state: &SharedState, user_id: Uuid) -> Result<Vec<PsychTag>, ApiError> {
    let stored = db::get_psych_tags(&state.pool, user_id).await?;
    let tags = stored.map(|raw| parse_tags(&raw)).unwrap_or_default();
    Ok(if tags.is_empty() {
        PsychTag::neutral_profile()
    } else {
        tags
    })
}

async fn start(
    State(state): State<SharedState>,
    Json(payload): Json<StartPayload>,
) -> Result<Json<StartResponse>, ApiError> {
    let user_id = payload.user_id.unwrap_or_else(Uuid::nil);
    let catalog = db::load_active_questions(&state.pool).await?;
    let psych = psych_profile(&state, user_id).await?;

    let composed = {
        let mut rng = rand::thread_rng();
        composer::compose_round(&catalog, &psych, payload.count, &mut rng)
            .map_err(|e| ApiError::Server(e.to_string()))?
    };

    let round_id = Uuid::new_v4();
    let token = state.tokens.issue();
    let token_hash = state
        .tokens
        .hash(round_id, user_id, &token)
        .map_err(|e| ApiError::Internal(e.into()))?;
    let time_limit_sec = scoring::time_limit_sec(composed.len());

    let question_ids: Vec<Uuid> = composed.iter().map(|q| q.id).collect();
    db::create_round(
        &state.pool,
        round_id,
        user_id,
        &token_hash,
        time_limit_sec,
        &question_ids,
    )
    .await?;

    let questions = composed
        .into_iter()
        .enumerate()
        .map(|(ord, q)| PublicQuestion {
            id: q.id,
            order: ord as i16,
            category: q.category,
            prompt: q.prompt,
            choices: q.choices,
            difficulty: q.difficulty,
        })
        .collect();

    Ok(Json(StartResponse {
        round_id,
        token,
        time_limit_sec,
        questions,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerPayload {
    round_id: Uuid,
    token: String,
    order: i16,
    picked_index: i16,
    user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum AnswerResponse {
    Scored { correct: bool },
    AlreadyAnswered { ok: bool },
}

async fn load_verified_round(
    state: &SharedState,
    round_id: Uuid,
    user_id: Uuid,
    token: &str,
) -> Result<db::RoundRow, ApiError> {
    let round = db::get_round(&state.pool, round_id)
        .await?
        .ok_or_else(|| ApiError::not_found("round not found"))?;
    if !state
        .tokens
        .verify(round_id, user_id, token, &round.token_hash)
    {
        return Err(ApiError::forbidden("round token mismatch"));
    }
    Ok(round)
}

async fn answer(
    State(state): State<SharedState>,
    Json(payload): Json<AnswerPayload>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let user_id = payload.user_id.unwrap_or_else(Uuid::nil);
    let round = load_verified_round(&state, payload.round_id, user_id, &payload.token).await?;
    if round.finished_at.is_some() {
        return Err(ApiError::validation("round already finished"));
    }

    let item = db::get_item(&state.pool, round.id, payload.order)
        .await?
        .ok_or_else(|| ApiError::not_found("no such question in this round"))?;
    if item.answered_at.is_some() {
        return Ok(Json(AnswerResponse::AlreadyAnswered { ok: true }));
    }

    let correct = scoring::is_correct(payload.picked_index, item.answer_index);
    let wrote =
        db::record_answer(&state.pool, round.id, payload.order, payload.picked_index, correct)
            .await?;
    if !wrote {
        // Lost a race with a duplicate submission; treat as the no-op case.
        return Ok(Json(AnswerResponse::AlreadyAnswered { ok: true }));
    }
    Ok(Json(AnswerResponse::Scored { correct }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinishPayload {
    round_id: Uuid,
    token: String,
    user_id: Option<Uuid>,
    /// Client-local ISO date, keys the daily challenge.
    local_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExplanationEntry {
    order: i16,
    prompt: String,
    correct: bool,
    explanation: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BadgeAwardedEntry {
    code: String,
    title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FinishResponse {
    score: i32,
    mistakes: i32,
    best_streak: i32,
    elapsed: i64,
    xp_gained: i32,
    mindset_xp_gained: i32,
    explanations: Vec<ExplanationEntry>,
    badges_awarded: Vec<BadgeAwardedEntry>,
    daily_challenge: Option<db::ChallengeRow>,
}

async fn finish(
    State(state): State<SharedState>,
    Json(payload): Json<FinishPayload>,
) -> Result<Json<FinishResponse>, ApiError> {
    let user_id = payload.user_id.unwrap_or_else(Uuid::nil);
    let round = load_verified_round(&state, payload.round_id, user_id, &payload.token).await?;
    if round.finished_at.is_some() {
        return Err(ApiError::validation("round already finished"));
    }

    let items = db::list_items(&state.pool, round.id).await?;
    let psych = psych_profile(&state, user_id).await?;
    let now = Utc::now();
    let elapsed_sec = (now - round.started_at).num_seconds().max(0);

    let outcome = {
        let results: Vec<ItemResult> = items
            .iter()
            .map(|i| ItemResult {
                correct: i.correct.unwrap_or(false),
                tags: parse_tags(&i.psych_tags),
            })
            .collect();
        let mut rng = rand::thread_rng();
        scoring::score_round(&results, &psych, elapsed_sec, round.time_limit_sec, &mut rng)
    };

    let finished = db::finalize_round(
        &state.pool,
        round.id,
        outcome.score,
        outcome.mistakes,
        outcome.best_streak,
    )
    .await?;
    if !finished {
        return Err(ApiError::validation("round already finished"));
    }

    let stats = db::apply_round_stats(
        &state.pool,
        user_id,
        outcome.xp,
        outcome.mindset_xp,
        outcome.score,
        outcome.best_streak,
    )
    .await?;

    let snapshot = badges::StatsSnapshot {
        xp: stats.xp,
        mindset_xp: stats.mindset_xp,
        total_score: stats.total_score,
        rounds_played: stats.rounds_played,
        best_streak: stats.best_streak,
    };
    let catalog = db::list_badges(&state.pool).await?;
    let owned: HashSet<Uuid> = db::owned_badge_ids(&state.pool, user_id)
        .await?
        .into_iter()
        .collect();
    let mut badges_awarded = Vec::new();
    for badge in badges::newly_earned(&catalog, &owned, &snapshot) {
        if db::award_badge(&state.pool, user_id, badge.id).await? {
            badges_awarded.push(BadgeAwardedEntry {
                code: badge.code.clone(),
                title: badge.title.clone(),
            });
        }
    }

    db::bump_weekly_score(
        &state.pool,
        time_utils::iso_week_start(now.date_naive()),
        user_id,
        outcome.score,
    )
    .await?;

    let date_key = time_utils::local_date_key(payload.local_date.as_deref(), now);
    let daily_challenge = match db::get_daily_challenge(&state.pool, user_id, date_key).await? {
        Some(existing) => Some(existing),
        None => {
            let mut summary = MissSummary::default();
            for item in items.iter().filter(|i| !i.correct.unwrap_or(false)) {
                summary.record_miss(item.category, &parse_tags(&item.psych_tags));
            }
            let template = challenge::pick_template(&summary);
            Some(
                db::upsert_daily_challenge(
                    &state.pool,
                    user_id,
                    date_key,
                    template.key,
                    template.title,
                    template.instructions,
                    &crate::domain::tags_to_strings(template.tags),
                )
                .await?,
            )
        }
    };

    let explanations = items
        .iter()
        .map(|i| ExplanationEntry {
            order: i.ord,
            prompt: i.prompt.clone(),
            correct: i.correct.unwrap_or(false),
            explanation: i.explanation.clone(),
        })
        .collect();

    Ok(Json(FinishResponse {
        score: outcome.score,
        mistakes: outcome.mistakes,
        best_streak: outcome.best_streak,
        elapsed: elapsed_sec,
        xp_gained: outcome.xp,
        mindset_xp_gained: outcome.mindset_xp,
        explanations,
        badges_awarded,
        daily_challenge,
    }))
}

async fn weekly_leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<Vec<db::LeaderboardRow>>, ApiError> {
    let week_start = time_utils::iso_week_start(Utc::now().date_naive());
    let entries = db::weekly_top(&state.pool, week_start, WEEKLY_TOP_LIMIT).await?;
    Ok(Json(entries))
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    stats: db::StatsRow,
    badges: Vec<db::AwardedBadge>,
}

async fn stats(
    State(state): State<SharedState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = db::get_stats(&state.pool, user_id)
        .await?
        .unwrap_or(db::StatsRow {
            user_id,
            xp: 0,
            mindset_xp: 0,
            total_score: 0,
            rounds_played: 0,
            best_streak: 0,
            last_played_at: None,
        });
    let badges = db::user_badges(&state.pool, user_id).await?;
    Ok(Json(StatsResponse { stats, badges }))
}

#[derive(Debug, Deserialize)]
struct ImportPayload {
    questions: Vec<db::NewQuestion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportResponse {
    imported: u64,
}

async fn import_bank(
    State(state): State<SharedState>,
    Json(payload): Json<ImportPayload>,
) -> Result<Json<ImportResponse>, ApiError> {
    if payload.questions.is_empty() {
        return Err(ApiError::validation("questions are required"));
    }
    for (i, q) in payload.questions.iter().enumerate() {
        if q.choices.len() < 2 {
            return Err(ApiError::validation(format!(
                "question {i}: at least two choices required"
            )));
        }
        if q.answer_index < 0 || q.answer_index as usize >= q.choices.len() {
            return Err(ApiError::validation(format!(
                "question {i}: answer_index out of range"
            )));
        }
    }
    let imported = db::insert_questions(&state.pool, &payload.questions).await?;
    Ok(Json(ImportResponse { imported }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfilePayload {
    user_id: Uuid,
    tags: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    user_id: Uuid,
    tags: Vec<String>,
}

async fn update_profile(
    State(state): State<SharedState>,
    Json(payload): Json<ProfilePayload>,
) -> Result<Json<ProfileResponse>, ApiError> {
    for raw in &payload.tags {
        if PsychTag::parse(raw).is_none() {
            return Err(ApiError::validation(format!("unknown psych tag: {raw}")));
        }
    }
    db::set_psych_tags(&state.pool, payload.user_id, &payload.tags).await?;
    Ok(Json(ProfileResponse {
        user_id: payload.user_id,
        tags: payload.tags,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_payload_reads_camel_case_keys() {
        let user = Uuid::new_v4();
        let payload: StartPayload =
            serde_json::from_value(json!({ "userId": user, "count": 9 })).unwrap();
        assert_eq!(payload.user_id, Some(user));
        assert_eq!(payload.count, Some(9));
    }

    #[test]
    fn answer_payload_reads_camel_case_keys() {
        let round = Uuid::new_v4();
        let user = Uuid::new_v4();
        let payload: AnswerPayload = serde_json::from_value(json!({
            "roundId": round,
            "token": "abc",
            "order": 3,
            "pickedIndex": 1,
            "userId": user,
        }))
        .unwrap();
        assert_eq!(payload.round_id, round);
        assert_eq!(payload.order, 3);
        assert_eq!(payload.picked_index, 1);
        assert_eq!(payload.user_id, Some(user));
    }

    #[test]
    fn finish_payload_reads_camel_case_keys() {
        let round = Uuid::new_v4();
        let payload: FinishPayload = serde_json::from_value(json!({
            "roundId": round,
            "token": "abc",
            "localDate": "2025-03-11",
        }))
        .unwrap();
        assert_eq!(payload.round_id, round);
        assert_eq!(payload.local_date.as_deref(), Some("2025-03-11"));
        assert_eq!(payload.user_id, None);
    }

    #[test]
    fn start_response_writes_camel_case_keys() {
        let resp = StartResponse {
            round_id: Uuid::new_v4(),
            token: "abc".into(),
            time_limit_sec: 140,
            questions: vec![PublicQuestion {
                id: Uuid::new_v4(),
                order: 0,
                category: Category::Nutrition,
                prompt: "p".into(),
                choices: vec!["a".into(), "b".into()],
                difficulty: 1,
            }],
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value.get("roundId").is_some());
        assert!(value.get("timeLimitSec").is_some());
        let q = &value["questions"][0];
        assert!(q.get("choices").is_some());
        assert!(q.get("answerIndex").is_none());
        assert!(q.get("explanation").is_none());
    }

    #[test]
    fn finish_response_writes_camel_case_keys() {
        let resp = FinishResponse {
            score: 700,
            mistakes: 0,
            best_streak: 7,
            elapsed: 42,
            xp_gained: 105,
            mindset_xp_gained: 10,
            explanations: vec![ExplanationEntry {
                order: 0,
                prompt: "p".into(),
                correct: true,
                explanation: "e".into(),
            }],
            badges_awarded: vec![],
            daily_challenge: None,
        };
        let value = serde_json::to_value(&resp).unwrap();
        for key in [
            "score",
            "mistakes",
            "bestStreak",
            "elapsed",
            "xpGained",
            "mindsetXpGained",
            "explanations",
            "badgesAwarded",
            "dailyChallenge",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert!(value.get("elapsedSec").is_none());
    }

    #[test]
    fn leaderboard_rows_write_camel_case_keys() {
        let row = db::LeaderboardRow {
            week_start: chrono::NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            user_id: Uuid::new_v4(),
            score: 900,
        };
        let value = serde_json::to_value(&row).unwrap();
        assert!(value.get("weekStart").is_some());
        assert!(value.get("userId").is_some());
        assert!(value.get("score").is_some());
    }
}
