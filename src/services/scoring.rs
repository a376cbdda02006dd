use crate::domain::PsychTag;
use rand::Rng;

pub const BASE_POINTS: i32 = 100;
pub const JACKPOT_CHANCE: f64 = 0.18;
pub const JACKPOT_BONUS: i32 = 50;
pub const XP_PER_CORRECT: i32 = 15;
pub const MINDSET_XP_PER_HIT: i32 = 10;
/// Score multiplier applied when the round ran past twice its limit.
pub const LATE_PENALTY: f64 = 0.8;

pub fn is_correct(picked_index: i16, answer_index: i16) -> bool {
    picked_index == answer_index
}

/// Per-round-size time limit, stored on the round at start.
pub fn time_limit_sec(round_size: usize) -> i32 {
    round_size as i32 * 20
}

/// One answered (or skipped) slot, in round order.
pub struct ItemResult {
    pub correct: bool,
    pub tags: Vec<PsychTag>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RoundOutcome {
    pub score: i32,
    pub correct_count: i32,
    pub mistakes: i32,
    pub best_streak: i32,
    pub xp: i32,
    pub mindset_xp: i32,
}

/// Replay a round's items in order and produce the final tally. The
/// jackpot is re-rolled here, at finish time, not when the answer was
/// recorded. Unanswered slots count as mistakes.
pub fn score_round<R: Rng>(
    items: &[ItemResult],
    psych_tags: &[PsychTag],
    elapsed_sec: i64,
    time_limit_sec: i32,
    rng: &mut R,
) -> RoundOutcome {
    let mut score = 0i32;
    let mut correct_count = 0i32;
    let mut streak = 0i32;
    let mut best_streak = 0i32;
    let mut mindset_xp = 0i32;

    for item in items {
        if item.correct {
            correct_count += 1;
            score += BASE_POINTS;
            if rng.gen_bool(JACKPOT_CHANCE) {
                score += JACKPOT_BONUS;
            }
            streak += 1;
            best_streak = best_streak.max(streak);
            if item.tags.iter().any(|t| psych_tags.contains(t)) {
                mindset_xp += MINDSET_XP_PER_HIT;
            }
        } else {
            streak = 0;
        }
    }

    if elapsed_sec > i64::from(time_limit_sec) * 2 {
        score = (f64::from(score) * LATE_PENALTY).floor() as i32;
    }

    RoundOutcome {
        score,
        correct_count,
        mistakes: items.len() as i32 - correct_count,
        best_streak,
        xp: correct_count * XP_PER_CORRECT,
        mindset_xp,
    }
}
