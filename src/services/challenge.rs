use crate::domain::{Category, PsychTag};
use std::collections::HashMap;

/// What the user got wrong this round, grouped for template matching.
#[derive(Debug, Default)]
pub struct MissSummary {
    pub by_category: HashMap<Category, u32>,
    pub missed_tags: Vec<PsychTag>,
}

impl MissSummary {
    pub fn record_miss(&mut self, category: Category, tags: &[PsychTag]) {
        *self.by_category.entry(category).or_insert(0) += 1;
        for tag in tags {
            if !self.missed_tags.contains(tag) {
                self.missed_tags.push(*tag);
            }
        }
    }

    fn misses_in(&self, category: Category) -> u32 {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    fn missed(&self, tag: PsychTag) -> bool {
        self.missed_tags.contains(&tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeTemplate {
    pub key: &'static str,
    pub title: &'static str,
    pub instructions: &'static str,
    pub tags: &'static [PsychTag],
}

struct TemplateRule {
    template: ChallengeTemplate,
    matches: fn(&MissSummary) -> bool,
}

/// Scanned strictly top-to-bottom; the first matching rule wins. The
/// order is a documented contract, not an implementation accident.
const RULES: &[TemplateRule] = &[
    TemplateRule {
        template: ChallengeTemplate {
            key: "habit_anchor",
            title: "Anchor one habit",
            instructions: "Pick one meal today and eat it at the same time you did yesterday. \
                           Consistency beats intensity.",
            tags: &[PsychTag::Consistency],
        },
        matches: |s| s.misses_in(Category::Habits) > 0 || s.missed(PsychTag::Consistency),
    },
    TemplateRule {
        template: ChallengeTemplate {
            key: "breath_reset",
            title: "Two-minute reset",
            instructions: "Before your largest meal, pause for two minutes of slow breathing. \
                           Notice hunger level before the first bite.",
            tags: &[PsychTag::StressManagement, PsychTag::MindfulEating],
        },
        matches: |s| {
            s.misses_in(Category::Mindfulness) > 0
                || s.misses_in(Category::MentalWellness) > 0
                || s.missed(PsychTag::StressManagement)
        },
    },
    TemplateRule {
        template: ChallengeTemplate {
            key: "label_detective",
            title: "Read one label",
            instructions: "Check the added-sugar line on one packaged food you eat today and \
                           compare it against your daily target.",
            tags: &[PsychTag::MindfulEating, PsychTag::SugarCravings],
        },
        matches: |s| s.misses_in(Category::Nutrition) > 0 || s.missed(PsychTag::SugarCravings),
    },
    TemplateRule {
        template: ChallengeTemplate {
            key: "single_task_sprint",
            title: "Single-task one meal",
            instructions: "Eat one meal today with no screen in reach. Just the food, \
                           start to finish.",
            tags: &[PsychTag::Motivation],
        },
        matches: |s| {
            s.misses_in(Category::Focus) > 0 || s.misses_in(Category::Resilience) > 0
        },
    },
    TemplateRule {
        template: ChallengeTemplate {
            key: "movement_snack",
            title: "Movement snack",
            instructions: "Take a ten-minute walk within an hour of your biggest meal.",
            tags: &[PsychTag::Motivation],
        },
        matches: |s| s.misses_in(Category::Fitness) > 0 || s.missed(PsychTag::Motivation),
    },
];

/// Fallback when the round gave nothing to work with.
pub const BASELINE: ChallengeTemplate = ChallengeTemplate {
    key: "hydration_baseline",
    title: "Hydration baseline",
    instructions: "Drink a full glass of water before each meal today.",
    tags: &[PsychTag::Hydration],
};

/// First-match template dispatch over the ordered rule list.
pub fn pick_template(summary: &MissSummary) -> ChallengeTemplate {
    RULES
        .iter()
        .find(|r| (r.matches)(summary))
        .map(|r| r.template)
        .unwrap_or(BASELINE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_round_gets_the_baseline() {
        let summary = MissSummary::default();
        assert_eq!(pick_template(&summary).key, "hydration_baseline");
    }

    #[test]
    fn earliest_matching_rule_wins() {
        // Misses in Habits, Nutrition and Fitness at once: the habit rule
        // sits first, so it must win.
        let mut summary = MissSummary::default();
        summary.record_miss(Category::Fitness, &[PsychTag::Motivation]);
        summary.record_miss(Category::Nutrition, &[PsychTag::SugarCravings]);
        summary.record_miss(Category::Habits, &[PsychTag::Consistency]);
        assert_eq!(pick_template(&summary).key, "habit_anchor");
    }

    #[test]
    fn each_rule_is_reachable() {
        let cases: [(Category, &str); 5] = [
            (Category::Habits, "habit_anchor"),
            (Category::Mindfulness, "breath_reset"),
            (Category::Nutrition, "label_detective"),
            (Category::Focus, "single_task_sprint"),
            (Category::Fitness, "movement_snack"),
        ];
        for (category, expected) in cases {
            let mut summary = MissSummary::default();
            summary.record_miss(category, &[]);
            assert_eq!(pick_template(&summary).key, expected, "{category:?}");
        }
    }

    #[test]
    fn missed_tag_alone_can_trigger_a_rule() {
        let mut summary = MissSummary::default();
        summary.record_miss(Category::Fitness, &[PsychTag::StressManagement]);
        // Fitness miss would match movement_snack, but the stress tag
        // matches breath_reset higher up the list.
        assert_eq!(pick_template(&summary).key, "breath_reset");
    }

    #[test]
    fn miss_tags_are_deduplicated() {
        let mut summary = MissSummary::default();
        summary.record_miss(Category::Nutrition, &[PsychTag::SugarCravings]);
        summary.record_miss(Category::Nutrition, &[PsychTag::SugarCravings]);
        assert_eq!(summary.missed_tags.len(), 1);
        assert_eq!(summary.misses_in(Category::Nutrition), 2);
    }
}
