use crate::db::BadgeRow;
use crate::domain::BadgeKind;
use std::collections::HashSet;
use uuid::Uuid;

/// Cumulative stats *after* applying the round that just finished.
#[derive(Debug, Clone, Copy)]
pub struct StatsSnapshot {
    pub xp: i32,
    pub mindset_xp: i32,
    pub total_score: i32,
    pub rounds_played: i32,
    pub best_streak: i32,
}

fn counter_for(kind: BadgeKind, stats: &StatsSnapshot) -> i32 {
    match kind {
        BadgeKind::Streak => stats.best_streak,
        BadgeKind::Score => stats.total_score,
        BadgeKind::Xp => stats.xp,
        BadgeKind::MindsetXp => stats.mindset_xp,
        BadgeKind::Rounds => stats.rounds_played,
    }
}

/// Badges newly earned by the post-update stats. Already-owned badges
/// are skipped; the database's (user_id, badge_id) key is the final
/// guard against double awards.
pub fn newly_earned<'a>(
    all: &'a [BadgeRow],
    owned: &HashSet<Uuid>,
    stats: &StatsSnapshot,
) -> Vec<&'a BadgeRow> {
    all.iter()
        .filter(|b| !owned.contains(&b.id))
        .filter(|b| match BadgeKind::parse(&b.kind) {
            Some(kind) => counter_for(kind, stats) >= b.threshold,
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn badge(code: &str, kind: BadgeKind, threshold: i32) -> BadgeRow {
        BadgeRow {
            id: Uuid::new_v4(),
            code: code.to_string(),
            title: code.to_string(),
            kind: kind.as_str().to_string(),
            threshold,
        }
    }

    fn stats() -> StatsSnapshot {
        StatsSnapshot {
            xp: 300,
            mindset_xp: 40,
            total_score: 2100,
            rounds_played: 12,
            best_streak: 6,
        }
    }

    #[test]
    fn thresholds_are_inclusive() {
        let catalog = vec![
            badge("streak_6", BadgeKind::Streak, 6),
            badge("streak_7", BadgeKind::Streak, 7),
            badge("score_2000", BadgeKind::Score, 2000),
            badge("xp_500", BadgeKind::Xp, 500),
            badge("mindset_25", BadgeKind::MindsetXp, 25),
            badge("rounds_10", BadgeKind::Rounds, 10),
        ];
        let earned = newly_earned(&catalog, &HashSet::new(), &stats());
        let codes: Vec<&str> = earned.iter().map(|b| b.code.as_str()).collect();
        assert_eq!(codes, vec!["streak_6", "score_2000", "mindset_25", "rounds_10"]);
    }

    #[test]
    fn owned_badges_are_never_reawarded() {
        let catalog = vec![badge("rounds_10", BadgeKind::Rounds, 10)];
        let owned: HashSet<Uuid> = catalog.iter().map(|b| b.id).collect();
        assert!(newly_earned(&catalog, &owned, &stats()).is_empty());
    }

    #[test]
    fn unknown_kind_is_skipped() {
        let mut odd = badge("weird", BadgeKind::Xp, 1);
        odd.kind = "emoji_count".to_string();
        assert!(newly_earned(&[odd], &HashSet::new(), &stats()).is_empty());
    }
}
