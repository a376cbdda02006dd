use serde::{Deserialize, Serialize};

/// Question catalog categories. The last five form the "mindset" set
/// used to reserve the closing slot of every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "trivia_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Nutrition,
    Fitness,
    Habits,
    Mindfulness,
    Focus,
    Resilience,
    MentalWellness,
}

impl Category {
    pub fn is_mindset(self) -> bool {
        matches!(
            self,
            Category::Habits
                | Category::Mindfulness
                | Category::Focus
                | Category::Resilience
                | Category::MentalWellness
        )
    }
}

/// Closed set of psychological-profile tags. Stored as TEXT[] in the
/// database; unknown strings are dropped at the edge rather than carried
/// around as free-form data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsychTag {
    Consistency,
    StressManagement,
    MindfulEating,
    SugarCravings,
    MealPrep,
    Motivation,
    SleepHygiene,
    Hydration,
}

impl PsychTag {
    pub const ALL: [PsychTag; 8] = [
        PsychTag::Consistency,
        PsychTag::StressManagement,
        PsychTag::MindfulEating,
        PsychTag::SugarCravings,
        PsychTag::MealPrep,
        PsychTag::Motivation,
        PsychTag::SleepHygiene,
        PsychTag::Hydration,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PsychTag::Consistency => "consistency",
            PsychTag::StressManagement => "stress_management",
            PsychTag::MindfulEating => "mindful_eating",
            PsychTag::SugarCravings => "sugar_cravings",
            PsychTag::MealPrep => "meal_prep",
            PsychTag::Motivation => "motivation",
            PsychTag::SleepHygiene => "sleep_hygiene",
            PsychTag::Hydration => "hydration",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        PsychTag::ALL.iter().copied().find(|t| t.as_str() == raw)
    }

    /// Profile applied when a user has never filled the psych quiz.
    pub fn neutral_profile() -> Vec<PsychTag> {
        vec![PsychTag::Consistency, PsychTag::Hydration]
    }
}

pub fn parse_tags(raw: &[String]) -> Vec<PsychTag> {
    raw.iter().filter_map(|s| PsychTag::parse(s)).collect()
}

pub fn tags_to_strings(tags: &[PsychTag]) -> Vec<String> {
    tags.iter().map(|t| t.as_str().to_string()).collect()
}

/// Which cumulative counter a badge threshold is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    Streak,
    Score,
    Xp,
    MindsetXp,
    Rounds,
}

impl BadgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeKind::Streak => "streak",
            BadgeKind::Score => "score",
            BadgeKind::Xp => "xp",
            BadgeKind::MindsetXp => "mindset_xp",
            BadgeKind::Rounds => "rounds",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "streak" => Some(BadgeKind::Streak),
            "score" => Some(BadgeKind::Score),
            "xp" => Some(BadgeKind::Xp),
            "mindset_xp" => Some(BadgeKind::MindsetXp),
            "rounds" => Some(BadgeKind::Rounds),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        MealSlot::ALL.iter().copied().find(|s| s.as_str() == raw)
    }

    /// Share of the daily kcal budget assigned to this slot.
    pub fn kcal_weight(self) -> f64 {
        match self {
            MealSlot::Breakfast => 0.25,
            MealSlot::Lunch => 0.35,
            MealSlot::Dinner => 0.30,
            MealSlot::Snack => 0.10,
        }
    }
}

/// How starchy-carb grams are spread across the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarchStrategy {
    One,
    Flex,
}

impl StarchStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            StarchStrategy::One => "one",
            StarchStrategy::Flex => "flex",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "one" => Some(StarchStrategy::One),
            "flex" => Some(StarchStrategy::Flex),
            _ => None,
        }
    }
}

/// Clinical/dietary tags a recipe can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeTag {
    LowSodium,
    DiabetesFriendly,
    Glp1Support,
    HighProtein,
    HighFiber,
    Vegetarian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cuisine {
    Mediterranean,
    Mexican,
    Asian,
    American,
    Indian,
}

impl Cuisine {
    pub const ALL: [Cuisine; 5] = [
        Cuisine::Mediterranean,
        Cuisine::Mexican,
        Cuisine::Asian,
        Cuisine::American,
        Cuisine::Indian,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Cuisine::Mediterranean => "mediterranean",
            Cuisine::Mexican => "mexican",
            Cuisine::Asian => "asian",
            Cuisine::American => "american",
            Cuisine::Indian => "indian",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Cuisine::ALL.iter().copied().find(|c| c.as_str() == raw)
    }
}

/// Role of the professional linked to a client, used to annotate
/// pro-sourced targets with a readable title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProRole {
    Coach,
    Trainer,
    Dietitian,
    Clinician,
}

impl ProRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ProRole::Coach => "coach",
            ProRole::Trainer => "trainer",
            ProRole::Dietitian => "dietitian",
            ProRole::Clinician => "clinician",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "coach" => Some(ProRole::Coach),
            "trainer" => Some(ProRole::Trainer),
            "dietitian" => Some(ProRole::Dietitian),
            "clinician" => Some(ProRole::Clinician),
            _ => None,
        }
    }

    pub fn display_title(self) -> &'static str {
        match self {
            ProRole::Coach => "Set by your coach",
            ProRole::Trainer => "Set by your trainer",
            ProRole::Dietitian => "Set by your dietitian",
            ProRole::Clinician => "Set by your care team",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mindset_set_excludes_knowledge_categories() {
        assert!(!Category::Nutrition.is_mindset());
        assert!(!Category::Fitness.is_mindset());
        assert!(Category::Habits.is_mindset());
        assert!(Category::MentalWellness.is_mindset());
    }

    #[test]
    fn psych_tags_round_trip_through_strings() {
        for tag in PsychTag::ALL {
            assert_eq!(PsychTag::parse(tag.as_str()), Some(tag));
        }
        assert_eq!(PsychTag::parse("late_night_doomscrolling"), None);
    }

    #[test]
    fn slot_weights_cover_the_day() {
        let total: f64 = MealSlot::ALL.iter().map(|s| s.kcal_weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
