use crate::db::QuestionRow;
use crate::domain::{Category, PsychTag};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use thiserror::Error;

pub const MIN_ROUND_SIZE: usize = 5;
pub const MAX_ROUND_SIZE: usize = 20;
pub const DEFAULT_ROUND_SIZE: usize = 7;

/// Share of filler slots drawn from the user's growth pool.
const GROWTH_FILL_BIAS: f64 = 0.6;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("no active questions in the catalog")]
    EmptyCatalog,
}

pub fn clamp_size(requested: Option<i64>) -> usize {
    match requested {
        Some(n) if n < MIN_ROUND_SIZE as i64 => MIN_ROUND_SIZE,
        Some(n) if n > MAX_ROUND_SIZE as i64 => MAX_ROUND_SIZE,
        Some(n) => n as usize,
        None => DEFAULT_ROUND_SIZE,
    }
}

fn intersects(question_tags: &[String], psych: &[PsychTag]) -> bool {
    question_tags
        .iter()
        .filter_map(|t| PsychTag::parse(t))
        .any(|t| psych.contains(&t))
}

fn draw<R: Rng>(pool: &mut Vec<usize>, rng: &mut R) -> Option<usize> {
    if pool.is_empty() {
        return None;
    }
    let at = rng.gen_range(0..pool.len());
    Some(pool.swap_remove(at))
}

/// Compose an ordered round from the active catalog, biased toward the
/// user's psych-profile tags.
///
/// Slot rules, applied in order: an easy opener (difficulty 1) holds
/// position 0, a mindset-category question holds the final position, a
/// growth quota of max(3, 60% of the round) comes from tag-matching
/// questions, and Nutrition/Fitness each get at least one slot when the
/// catalog allows. The middle of the round is shuffled; the opener and
/// closer stay fixed. Repeats are allowed only once the catalog is
/// exhausted.
pub fn compose_round<R: Rng>(
    catalog: &[QuestionRow],
    psych: &[PsychTag],
    requested: Option<i64>,
    rng: &mut R,
) -> Result<Vec<QuestionRow>, ComposeError> {
    if catalog.is_empty() {
        return Err(ComposeError::EmptyCatalog);
    }
    let size = clamp_size(requested);
    let body_cap = size - 1; // final slot is reserved for the closer

    let mut picked: HashSet<usize> = HashSet::new();
    let mut body: Vec<usize> = Vec::with_capacity(body_cap);

    // 1. Easy win opener.
    let mut easy: Vec<usize> = (0..catalog.len())
        .filter(|&i| catalog[i].difficulty == 1)
        .collect();
    let has_opener = if let Some(i) = draw(&mut easy, rng) {
        picked.insert(i);
        body.push(i);
        true
    } else {
        false
    };

    // 2. Growth quota from tag-matching questions.
    let growth_set: HashSet<usize> = (0..catalog.len())
        .filter(|&i| intersects(&catalog[i].psych_tags, psych))
        .collect();
    let growth_target = 3usize.max((GROWTH_FILL_BIAS * size as f64).floor() as usize);
    let mut growth_pool: Vec<usize> = growth_set
        .iter()
        .copied()
        .filter(|i| !picked.contains(i))
        .collect();
    while body.len() < body_cap.min(growth_target) {
        match draw(&mut growth_pool, rng) {
            Some(i) => {
                picked.insert(i);
                body.push(i);
            }
            None => break,
        }
    }

    // 3. Category coverage: at least one Nutrition and one Fitness slot.
    for cat in [Category::Nutrition, Category::Fitness] {
        if body.len() >= body_cap {
            break;
        }
        if body.iter().any(|&i| catalog[i].category == cat) {
            continue;
        }
        let mut candidates: Vec<usize> = (0..catalog.len())
            .filter(|&i| catalog[i].category == cat && !picked.contains(&i))
            .collect();
        if let Some(i) = draw(&mut candidates, rng) {
            picked.insert(i);
            body.push(i);
        }
    }

    // 4. Fill the rest, 60% biased toward the growth pool.
    while body.len() < body_cap {
        let from_growth = rng.gen_bool(GROWTH_FILL_BIAS);
        let mut pool: Vec<usize> = (0..catalog.len())
            .filter(|&i| {
                !picked.contains(&i) && (!from_growth || growth_set.contains(&i))
            })
            .collect();
        if pool.is_empty() {
            pool = (0..catalog.len()).filter(|i| !picked.contains(i)).collect();
        }
        match draw(&mut pool, rng) {
            Some(i) => {
                picked.insert(i);
                body.push(i);
            }
            // Catalog exhausted: repeats allowed from here on.
            None => {
                body.push(rng.gen_range(0..catalog.len()));
            }
        }
    }

    // 5. Mindset closer, random fallback when none exist.
    let mut mindset: Vec<usize> = (0..catalog.len())
        .filter(|&i| catalog[i].category.is_mindset() && !picked.contains(&i))
        .collect();
    if mindset.is_empty() {
        mindset = (0..catalog.len())
            .filter(|&i| catalog[i].category.is_mindset())
            .collect();
    }
    let closer = match draw(&mut mindset, rng) {
        Some(i) => i,
        None => {
            let mut rest: Vec<usize> =
                (0..catalog.len()).filter(|i| !picked.contains(i)).collect();
            draw(&mut rest, rng).unwrap_or_else(|| rng.gen_range(0..catalog.len()))
        }
    };

    // 6. Shuffle the middle; opener and closer keep their slots.
    let shuffle_from = usize::from(has_opener);
    if body.len() > shuffle_from {
        body[shuffle_from..].shuffle(rng);
    }
    body.push(closer);

    Ok(body.into_iter().map(|i| catalog[i].clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn question(category: Category, difficulty: i16, tags: &[PsychTag]) -> QuestionRow {
        QuestionRow {
            id: Uuid::new_v4(),
            category,
            mindset_category: category.is_mindset().then_some(category),
            psych_tags: tags.iter().map(|t| t.as_str().to_string()).collect(),
            prompt: format!("{category:?} question"),
            choices: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            answer_index: 0,
            explanation: String::new(),
            difficulty,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn catalog() -> Vec<QuestionRow> {
        let mut qs = Vec::new();
        qs.push(question(Category::Nutrition, 1, &[]));
        for _ in 0..6 {
            qs.push(question(Category::Nutrition, 2, &[PsychTag::SugarCravings]));
        }
        for _ in 0..6 {
            qs.push(question(Category::Fitness, 2, &[PsychTag::Motivation]));
        }
        for _ in 0..4 {
            qs.push(question(Category::Mindfulness, 3, &[PsychTag::StressManagement]));
        }
        for _ in 0..4 {
            qs.push(question(Category::Habits, 2, &[PsychTag::Consistency]));
        }
        qs
    }

    #[test]
    fn round_size_is_clamped() {
        assert_eq!(clamp_size(None), 7);
        assert_eq!(clamp_size(Some(1)), 5);
        assert_eq!(clamp_size(Some(50)), 20);
        assert_eq!(clamp_size(Some(9)), 9);
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            compose_round(&[], &[], None, &mut rng),
            Err(ComposeError::EmptyCatalog)
        ));
    }

    #[test]
    fn opener_is_easy_and_closer_is_mindset() {
        let catalog = catalog();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let round =
                compose_round(&catalog, &PsychTag::neutral_profile(), None, &mut rng).unwrap();
            assert_eq!(round.len(), 7);
            assert_eq!(round[0].difficulty, 1);
            assert!(round.last().unwrap().category.is_mindset());
        }
    }

    #[test]
    fn nutrition_and_fitness_are_covered() {
        let catalog = catalog();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let round = compose_round(&catalog, &[PsychTag::Consistency], None, &mut rng).unwrap();
            assert!(round.iter().any(|q| q.category == Category::Nutrition));
            assert!(round.iter().any(|q| q.category == Category::Fitness));
        }
    }

    #[test]
    fn growth_quota_pulls_from_profile_tags() {
        let catalog = catalog();
        let psych = vec![PsychTag::Consistency, PsychTag::StressManagement];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let round = compose_round(&catalog, &psych, Some(10), &mut rng).unwrap();
            let growth_hits = round
                .iter()
                .filter(|q| {
                    q.psych_tags
                        .iter()
                        .filter_map(|t| PsychTag::parse(t))
                        .any(|t| psych.contains(&t))
                })
                .count();
            // Quota is max(3, floor(0.6 * 10)) = 6 and the pool holds 8.
            assert!(growth_hits >= 3, "seed {seed}: only {growth_hits} growth hits");
        }
    }

    #[test]
    fn tiny_catalog_fills_round_with_repeats() {
        let catalog = vec![
            question(Category::Nutrition, 1, &[]),
            question(Category::Habits, 2, &[]),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let round = compose_round(&catalog, &[], Some(5), &mut rng).unwrap();
        assert_eq!(round.len(), 5);
        assert_eq!(round[0].difficulty, 1);
        assert!(round.last().unwrap().category.is_mindset());
    }

    #[test]
    fn closer_falls_back_when_no_mindset_exists() {
        let catalog: Vec<QuestionRow> = (0..8)
            .map(|i| question(Category::Nutrition, if i == 0 { 1 } else { 2 }, &[]))
            .collect();
        let mut rng = StdRng::seed_from_u64(3);
        let round = compose_round(&catalog, &[], Some(5), &mut rng).unwrap();
        assert_eq!(round.len(), 5);
    }
}
