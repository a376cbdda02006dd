pub mod seed;

use crate::domain::{Category, StarchStrategy};
use crate::services::mealplan::{PlanItem, Prefs};
use crate::services::targets::Targets;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub category: Category,
    pub mindset_category: Option<Category>,
    pub psych_tags: Vec<String>,
    pub prompt: String,
    pub choices: Vec<String>,
    pub answer_index: i16,
    pub explanation: String,
    pub difficulty: i16,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub category: Category,
    pub mindset_category: Option<Category>,
    #[serde(default)]
    pub psych_tags: Vec<String>,
    pub prompt: String,
    pub choices: Vec<String>,
    pub answer_index: i16,
    #[serde(default)]
    pub explanation: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: i16,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_difficulty() -> i16 {
    1
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, FromRow)]
pub struct RoundRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub size: i16,
    pub time_limit_sec: i32,
    pub token_hash: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub score: i32,
    pub mistakes: i32,
    pub best_streak: i32,
}

/// Round item joined with the catalog fields scoring needs.
#[derive(Debug, Clone, FromRow)]
pub struct ItemWithQuestion {
    pub ord: i16,
    pub picked_index: Option<i16>,
    pub correct: Option<bool>,
    pub answered_at: Option<DateTime<Utc>>,
    pub question_id: Uuid,
    pub answer_index: i16,
    pub category: Category,
    pub psych_tags: Vec<String>,
    pub prompt: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StatsRow {
    pub user_id: Uuid,
    pub xp: i32,
    pub mindset_xp: i32,
    pub total_score: i32,
    pub rounds_played: i32,
    pub best_streak: i32,
    pub last_played_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BadgeRow {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub kind: String,
    pub threshold: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AwardedBadge {
    pub code: String,
    pub title: String,
    pub awarded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub week_start: NaiveDate,
    pub user_id: Uuid,
    pub score: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRow {
    pub user_id: Uuid,
    pub date_key: NaiveDate,
    pub template_key: String,
    pub title: String,
    pub instructions: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProClientRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub professional_role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct TargetsRow {
    protein_g: i32,
    starchy_carbs_g: i32,
    fibrous_carbs_g: i32,
    fat_g: i32,
    starch_strategy: Option<String>,
    low_sodium: bool,
    diabetes_friendly: bool,
    glp1: bool,
    allergens: Vec<String>,
    starchy_cap_g: Option<i32>,
}

impl From<TargetsRow> for Targets {
    fn from(row: TargetsRow) -> Self {
        Targets {
            protein_g: row.protein_g,
            starchy_carbs_g: row.starchy_carbs_g,
            fibrous_carbs_g: row.fibrous_carbs_g,
            fat_g: row.fat_g,
            starch_strategy: row.starch_strategy.as_deref().and_then(StarchStrategy::parse),
            low_sodium: row.low_sodium,
            diabetes_friendly: row.diabetes_friendly,
            glp1: row.glp1,
            allergens: row.allergens,
            starchy_cap_g: row.starchy_cap_g,
        }
    }
}

// ── question catalog ─────────────────────────────────────

pub async fn load_active_questions(pool: &PgPool) -> Result<Vec<QuestionRow>> {
    let rows = sqlx::query_as::<_, QuestionRow>(
        "SELECT * FROM trivia_questions WHERE active = TRUE",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert_questions(pool: &PgPool, questions: &[NewQuestion]) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;
    for q in questions {
        let done = sqlx::query(
            r#"
            INSERT INTO trivia_questions
                (category, mindset_category, psych_tags, prompt, choices,
                 answer_index, explanation, difficulty, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(q.category)
        .bind(q.mindset_category)
        .bind(&q.psych_tags)
        .bind(&q.prompt)
        .bind(&q.choices)
        .bind(q.answer_index)
        .bind(&q.explanation)
        .bind(q.difficulty)
        .bind(q.active)
        .execute(&mut *tx)
        .await?;
        inserted += done.rows_affected();
    }
    tx.commit().await?;
    Ok(inserted)
}

// ── rounds and items ─────────────────────────────────────

pub async fn create_round(
    pool: &PgPool,
    round_id: Uuid,
    user_id: Uuid,
    token_hash: &str,
    time_limit_sec: i32,
    question_ids: &[Uuid],
) -> Result<()> {
    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        INSERT INTO trivia_rounds (id, user_id, size, time_limit_sec, token_hash)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(round_id)
    .bind(user_id)
    .bind(question_ids.len() as i16)
    .bind(time_limit_sec)
    .bind(token_hash)
    .execute(&mut *tx)
    .await?;

    for (ord, question_id) in question_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO trivia_round_items (round_id, question_id, ord) VALUES ($1, $2, $3)",
        )
        .bind(round_id)
        .bind(question_id)
        .bind(ord as i16)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

pub async fn get_round(pool: &PgPool, round_id: Uuid) -> Result<Option<RoundRow>> {
    let row = sqlx::query_as::<_, RoundRow>("SELECT * FROM trivia_rounds WHERE id = $1")
        .bind(round_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn get_item(
    pool: &PgPool,
    round_id: Uuid,
    ord: i16,
) -> Result<Option<ItemWithQuestion>> {
    let row = sqlx::query_as::<_, ItemWithQuestion>(
        r#"
        SELECT i.ord, i.picked_index, i.correct, i.answered_at,
               q.id AS question_id, q.answer_index, q.category, q.psych_tags,
               q.prompt, q.explanation
        FROM trivia_round_items i
        JOIN trivia_questions q ON q.id = i.question_id
        WHERE i.round_id = $1 AND i.ord = $2
        "#,
    )
    .bind(round_id)
    .bind(ord)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn list_items(pool: &PgPool, round_id: Uuid) -> Result<Vec<ItemWithQuestion>> {
    let rows = sqlx::query_as::<_, ItemWithQuestion>(
        r#"
        SELECT i.ord, i.picked_index, i.correct, i.answered_at,
               q.id AS question_id, q.answer_index, q.category, q.psych_tags,
               q.prompt, q.explanation
        FROM trivia_round_items i
        JOIN trivia_questions q ON q.id = i.question_id
        WHERE i.round_id = $1
        ORDER BY i.ord
        "#,
    )
    .bind(round_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Marks an item answered; a no-op when it already was. Returns whether
/// this call did the write, so concurrent duplicates collapse into one.
pub async fn record_answer(
    pool: &PgPool,
    round_id: Uuid,
    ord: i16,
    picked_index: i16,
    correct: bool,
) -> Result<bool> {
    let done = sqlx::query(
        r#"
        UPDATE trivia_round_items
        SET picked_index = $3, correct = $4, answered_at = now()
        WHERE round_id = $1 AND ord = $2 AND answered_at IS NULL
        "#,
    )
    .bind(round_id)
    .bind(ord)
    .bind(picked_index)
    .bind(correct)
    .execute(pool)
    .await?;
    Ok(done.rows_affected() > 0)
}

/// Conditional finish: only the first caller flips `finished_at`, so a
/// double finish can never double-apply stats.
pub async fn finalize_round(
    pool: &PgPool,
    round_id: Uuid,
    score: i32,
    mistakes: i32,
    best_streak: i32,
) -> Result<bool> {
    let done = sqlx::query(
        r#"
        UPDATE trivia_rounds
        SET finished_at = now(), score = $2, mistakes = $3, best_streak = $4
        WHERE id = $1 AND finished_at IS NULL
        "#,
    )
    .bind(round_id)
    .bind(score)
    .bind(mistakes)
    .bind(best_streak)
    .execute(pool)
    .await?;
    Ok(done.rows_affected() > 0)
}

// ── cumulative stats, badges, leaderboard ────────────────

pub async fn get_stats(pool: &PgPool, user_id: Uuid) -> Result<Option<StatsRow>> {
    let row = sqlx::query_as::<_, StatsRow>("SELECT * FROM user_trivia_stats WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn apply_round_stats(
    pool: &PgPool,
    user_id: Uuid,
    xp: i32,
    mindset_xp: i32,
    score: i32,
    best_streak: i32,
) -> Result<StatsRow> {
    let row = sqlx::query_as::<_, StatsRow>(
        r#"
        INSERT INTO user_trivia_stats
            (user_id, xp, mindset_xp, total_score, rounds_played, best_streak, last_played_at)
        VALUES ($1, $2, $3, $4, 1, $5, now())
        ON CONFLICT (user_id) DO UPDATE SET
            xp = user_trivia_stats.xp + EXCLUDED.xp,
            mindset_xp = user_trivia_stats.mindset_xp + EXCLUDED.mindset_xp,
            total_score = user_trivia_stats.total_score + EXCLUDED.total_score,
            rounds_played = user_trivia_stats.rounds_played + 1,
            best_streak = GREATEST(user_trivia_stats.best_streak, EXCLUDED.best_streak),
            last_played_at = now()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(xp)
    .bind(mindset_xp)
    .bind(score)
    .bind(best_streak)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn list_badges(pool: &PgPool) -> Result<Vec<BadgeRow>> {
    let rows = sqlx::query_as::<_, BadgeRow>("SELECT * FROM trivia_badges ORDER BY threshold")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn owned_badge_ids(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>> {
    let rows: Vec<(Uuid,)> =
        sqlx::query_as("SELECT badge_id FROM user_trivia_badges WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub async fn award_badge(pool: &PgPool, user_id: Uuid, badge_id: Uuid) -> Result<bool> {
    let done = sqlx::query(
        r#"
        INSERT INTO user_trivia_badges (user_id, badge_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, badge_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(badge_id)
    .execute(pool)
    .await?;
    Ok(done.rows_affected() > 0)
}

pub async fn user_badges(pool: &PgPool, user_id: Uuid) -> Result<Vec<AwardedBadge>> {
    let rows = sqlx::query_as::<_, AwardedBadge>(
        r#"
        SELECT b.code, b.title, ub.awarded_at
        FROM user_trivia_badges ub
        JOIN trivia_badges b ON b.id = ub.badge_id
        WHERE ub.user_id = $1
        ORDER BY ub.awarded_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn bump_weekly_score(
    pool: &PgPool,
    week_start: NaiveDate,
    user_id: Uuid,
    delta: i32,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO weekly_leaderboard (week_start, user_id, score)
        VALUES ($1, $2, $3)
        ON CONFLICT (week_start, user_id) DO UPDATE
        SET score = weekly_leaderboard.score + EXCLUDED.score
        "#,
    )
    .bind(week_start)
    .bind(user_id)
    .bind(delta)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn weekly_top(
    pool: &PgPool,
    week_start: NaiveDate,
    limit: i64,
) -> Result<Vec<LeaderboardRow>> {
    let rows = sqlx::query_as::<_, LeaderboardRow>(
        r#"
        SELECT week_start, user_id, score
        FROM weekly_leaderboard
        WHERE week_start = $1
        ORDER BY score DESC
        LIMIT $2
        "#,
    )
    .bind(week_start)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ── daily challenges ─────────────────────────────────────

pub async fn get_daily_challenge(
    pool: &PgPool,
    user_id: Uuid,
    date_key: NaiveDate,
) -> Result<Option<ChallengeRow>> {
    let row = sqlx::query_as::<_, ChallengeRow>(
        "SELECT * FROM user_daily_challenges WHERE user_id = $1 AND date_key = $2",
    )
    .bind(user_id)
    .bind(date_key)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert-if-absent then read back: concurrent finishes for the same
/// day converge on whichever row landed first.
pub async fn upsert_daily_challenge(
    pool: &PgPool,
    user_id: Uuid,
    date_key: NaiveDate,
    template_key: &str,
    title: &str,
    instructions: &str,
    tags: &[String],
) -> Result<ChallengeRow> {
    sqlx::query(
        r#"
        INSERT INTO user_daily_challenges
            (user_id, date_key, template_key, title, instructions, tags)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id, date_key) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(date_key)
    .bind(template_key)
    .bind(title)
    .bind(instructions)
    .bind(tags)
    .execute(pool)
    .await?;

    let row = sqlx::query_as::<_, ChallengeRow>(
        "SELECT * FROM user_daily_challenges WHERE user_id = $1 AND date_key = $2",
    )
    .bind(user_id)
    .bind(date_key)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

// ── psych profiles ───────────────────────────────────────

pub async fn get_psych_tags(pool: &PgPool, user_id: Uuid) -> Result<Option<Vec<String>>> {
    let row: Option<(Vec<String>,)> =
        sqlx::query_as("SELECT tags FROM user_psych_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(tags,)| tags))
}

pub async fn set_psych_tags(pool: &PgPool, user_id: Uuid, tags: &[String]) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_psych_profiles (user_id, tags, updated_at)
        VALUES ($1, $2, now())
        ON CONFLICT (user_id) DO UPDATE SET tags = EXCLUDED.tags, updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(tags)
    .execute(pool)
    .await?;
    Ok(())
}

// ── pro portal store ─────────────────────────────────────

pub async fn get_pro_client(pool: &PgPool, client_id: Uuid) -> Result<Option<ProClientRow>> {
    let row = sqlx::query_as::<_, ProClientRow>("SELECT * FROM pro_clients WHERE id = $1")
        .bind(client_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn pro_client_for_user(pool: &PgPool, user_id: Uuid) -> Result<Option<ProClientRow>> {
    let row = sqlx::query_as::<_, ProClientRow>("SELECT * FROM pro_clients WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// First read creates the default record, matching the "targets exist
/// from the moment a client is opened" behavior the resolver relies on.
pub async fn get_targets(pool: &PgPool, client_id: Uuid) -> Result<Targets> {
    let row = sqlx::query_as::<_, TargetsRow>(
        r#"
        SELECT protein_g, starchy_carbs_g, fibrous_carbs_g, fat_g, starch_strategy,
               low_sodium, diabetes_friendly, glp1, allergens, starchy_cap_g
        FROM pro_targets WHERE client_id = $1
        "#,
    )
    .bind(client_id)
    .fetch_optional(pool)
    .await?;
    if let Some(row) = row {
        return Ok(row.into());
    }
    let defaults = Targets::default();
    set_targets(pool, client_id, &defaults).await?;
    Ok(defaults)
}

pub async fn set_targets(pool: &PgPool, client_id: Uuid, targets: &Targets) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO pro_targets
            (client_id, protein_g, starchy_carbs_g, fibrous_carbs_g, fat_g,
             starch_strategy, low_sodium, diabetes_friendly, glp1, allergens,
             starchy_cap_g, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, now())
        ON CONFLICT (client_id) DO UPDATE SET
            protein_g = EXCLUDED.protein_g,
            starchy_carbs_g = EXCLUDED.starchy_carbs_g,
            fibrous_carbs_g = EXCLUDED.fibrous_carbs_g,
            fat_g = EXCLUDED.fat_g,
            starch_strategy = EXCLUDED.starch_strategy,
            low_sodium = EXCLUDED.low_sodium,
            diabetes_friendly = EXCLUDED.diabetes_friendly,
            glp1 = EXCLUDED.glp1,
            allergens = EXCLUDED.allergens,
            starchy_cap_g = EXCLUDED.starchy_cap_g,
            updated_at = now()
        "#,
    )
    .bind(client_id)
    .bind(targets.protein_g)
    .bind(targets.starchy_carbs_g)
    .bind(targets.fibrous_carbs_g)
    .bind(targets.fat_g)
    .bind(targets.starch_strategy.map(|s| s.as_str()))
    .bind(targets.low_sodium)
    .bind(targets.diabetes_friendly)
    .bind(targets.glp1)
    .bind(&targets.allergens)
    .bind(targets.starchy_cap_g)
    .execute(pool)
    .await?;
    Ok(())
}

#[derive(Debug, Clone, FromRow)]
struct PrefsRow {
    dislikes: Vec<String>,
    allergens: Vec<String>,
    cuisines: Vec<String>,
    effort: Option<String>,
    budget: Option<String>,
}

pub async fn get_prefs(pool: &PgPool, client_id: Uuid) -> Result<Prefs> {
    let row = sqlx::query_as::<_, PrefsRow>(
        "SELECT dislikes, allergens, cuisines, effort, budget FROM pro_prefs WHERE client_id = $1",
    )
    .bind(client_id)
    .fetch_optional(pool)
    .await?;
    Ok(match row {
        Some(row) => Prefs {
            dislikes: row.dislikes,
            allergens: row.allergens,
            cuisines: row
                .cuisines
                .iter()
                .filter_map(|c| crate::domain::Cuisine::parse(c))
                .collect(),
            effort: row.effort,
            budget: row.budget,
        },
        None => Prefs::default(),
    })
}

pub async fn set_prefs(pool: &PgPool, client_id: Uuid, prefs: &Prefs) -> Result<()> {
    let cuisines: Vec<String> = prefs.cuisines.iter().map(|c| c.as_str().to_string()).collect();
    sqlx::query(
        r#"
        INSERT INTO pro_prefs (client_id, dislikes, allergens, cuisines, effort, budget, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, now())
        ON CONFLICT (client_id) DO UPDATE SET
            dislikes = EXCLUDED.dislikes,
            allergens = EXCLUDED.allergens,
            cuisines = EXCLUDED.cuisines,
            effort = EXCLUDED.effort,
            budget = EXCLUDED.budget,
            updated_at = now()
        "#,
    )
    .bind(client_id)
    .bind(&prefs.dislikes)
    .bind(&prefs.allergens)
    .bind(&cuisines)
    .bind(&prefs.effort)
    .bind(&prefs.budget)
    .execute(pool)
    .await?;
    Ok(())
}

#[derive(Debug, Clone, FromRow)]
struct PlanItemRow {
    day: i16,
    slot: String,
    label: String,
    kcal: i32,
    protein_g: i32,
    carbs_g: i32,
    fat_g: i32,
}

pub async fn replace_plan(pool: &PgPool, client_id: Uuid, plan: &[PlanItem]) -> Result<()> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM plan_items WHERE client_id = $1")
        .bind(client_id)
        .execute(&mut *tx)
        .await?;
    for item in plan {
        sqlx::query(
            r#"
            INSERT INTO plan_items (client_id, day, slot, label, kcal, protein_g, carbs_g, fat_g)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(client_id)
        .bind(item.day)
        .bind(item.slot.as_str())
        .bind(&item.label)
        .bind(item.kcal)
        .bind(item.protein_g)
        .bind(item.carbs_g)
        .bind(item.fat_g)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

pub async fn get_plan(pool: &PgPool, client_id: Uuid) -> Result<Vec<PlanItem>> {
    let rows = sqlx::query_as::<_, PlanItemRow>(
        r#"
        SELECT day, slot, label, kcal, protein_g, carbs_g, fat_g
        FROM plan_items
        WHERE client_id = $1
        ORDER BY day, slot
        "#,
    )
    .bind(client_id)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let slot = crate::domain::MealSlot::parse(&row.slot)?;
            Some(PlanItem {
                day: row.day,
                slot,
                label: row.label,
                kcal: row.kcal,
                protein_g: row.protein_g,
                carbs_g: row.carbs_g,
                fat_g: row.fat_g,
            })
        })
        .collect())
}

pub async fn get_self_targets(pool: &PgPool, user_id: Uuid) -> Result<Option<Targets>> {
    #[derive(FromRow)]
    struct SelfRow {
        protein_g: i32,
        starchy_carbs_g: i32,
        fibrous_carbs_g: i32,
        fat_g: i32,
    }
    let row = sqlx::query_as::<_, SelfRow>(
        "SELECT protein_g, starchy_carbs_g, fibrous_carbs_g, fat_g FROM self_targets WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| Targets {
        protein_g: r.protein_g,
        starchy_carbs_g: r.starchy_carbs_g,
        fibrous_carbs_g: r.fibrous_carbs_g,
        fat_g: r.fat_g,
        ..Targets::default()
    }))
}

pub async fn set_self_targets(pool: &PgPool, user_id: Uuid, targets: &Targets) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO self_targets (user_id, protein_g, starchy_carbs_g, fibrous_carbs_g, fat_g, updated_at)
        VALUES ($1, $2, $3, $4, $5, now())
        ON CONFLICT (user_id) DO UPDATE SET
            protein_g = EXCLUDED.protein_g,
            starchy_carbs_g = EXCLUDED.starchy_carbs_g,
            fibrous_carbs_g = EXCLUDED.fibrous_carbs_g,
            fat_g = EXCLUDED.fat_g,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(targets.protein_g)
    .bind(targets.starchy_carbs_g)
    .bind(targets.fibrous_carbs_g)
    .bind(targets.fat_g)
    .execute(pool)
    .await?;
    Ok(())
}
