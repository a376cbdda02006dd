use crate::domain::{BadgeKind, Category, PsychTag};
use anyhow::Result;
use sqlx::PgPool;

struct SeedBadge<'a> {
    code: &'a str,
    title: &'a str,
    kind: BadgeKind,
    threshold: i32,
}

struct SeedQuestion<'a> {
    category: Category,
    tags: &'a [PsychTag],
    prompt: &'a str,
    choices: [&'a str; 4],
    answer_index: i16,
    explanation: &'a str,
    difficulty: i16,
}

pub async fn seed_all(pool: &PgPool) -> Result<()> {
    seed_badges(pool).await?;
    seed_questions(pool).await?;
    Ok(())
}

async fn seed_badges(pool: &PgPool) -> Result<()> {
    let badges = [
        SeedBadge { code: "first_round", title: "First Serving", kind: BadgeKind::Rounds, threshold: 1 },
        SeedBadge { code: "regular", title: "Regular at the Table", kind: BadgeKind::Rounds, threshold: 10 },
        SeedBadge { code: "streak_5", title: "On a Roll", kind: BadgeKind::Streak, threshold: 5 },
        SeedBadge { code: "streak_10", title: "Unstoppable", kind: BadgeKind::Streak, threshold: 10 },
        SeedBadge { code: "score_1000", title: "Four Figures", kind: BadgeKind::Score, threshold: 1000 },
        SeedBadge { code: "score_10000", title: "Heavyweight", kind: BadgeKind::Score, threshold: 10_000 },
        SeedBadge { code: "xp_500", title: "Student of the Game", kind: BadgeKind::Xp, threshold: 500 },
        SeedBadge { code: "mindset_200", title: "Inner Work", kind: BadgeKind::MindsetXp, threshold: 200 },
    ];

    for b in badges {
        sqlx::query(
            r#"
            INSERT INTO trivia_badges (code, title, kind, threshold)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(b.code)
        .bind(b.title)
        .bind(b.kind.as_str())
        .bind(b.threshold)
        .execute(pool)
        .await?;
    }
    tracing::info!("badge catalog seeded");
    Ok(())
}

async fn seed_questions(pool: &PgPool) -> Result<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trivia_questions")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let questions = [
        SeedQuestion {
            category: Category::Nutrition,
            tags: &[],
            prompt: "Which macronutrient carries the most calories per gram?",
            choices: ["Protein", "Carbohydrate", "Fat", "Fiber"],
            answer_index: 2,
            explanation: "Fat provides 9 kcal per gram versus 4 for protein and carbs.",
            difficulty: 1,
        },
        SeedQuestion {
            category: Category::Nutrition,
            tags: &[PsychTag::SugarCravings],
            prompt: "Where does most added sugar in a typical diet come from?",
            choices: ["Fresh fruit", "Sweetened drinks", "Bread", "Dairy"],
            answer_index: 1,
            explanation: "Sweetened beverages are the single largest added-sugar source.",
            difficulty: 2,
        },
        SeedQuestion {
            category: Category::Nutrition,
            tags: &[PsychTag::MealPrep],
            prompt: "Roughly how much protein does a cooked chicken breast (150g) hold?",
            choices: ["15g", "25g", "45g", "60g"],
            answer_index: 2,
            explanation: "Cooked chicken breast runs about 30g protein per 100g.",
            difficulty: 2,
        },
        SeedQuestion {
            category: Category::Fitness,
            tags: &[PsychTag::Motivation],
            prompt: "What matters most for building strength as a beginner?",
            choices: ["Supplements", "Progressive overload", "Training to failure daily", "Long cardio"],
            answer_index: 1,
            explanation: "Gradually increasing demand drives adaptation.",
            difficulty: 2,
        },
        SeedQuestion {
            category: Category::Fitness,
            tags: &[],
            prompt: "How many minutes of moderate activity per week do guidelines suggest?",
            choices: ["30", "75", "150", "300"],
            answer_index: 2,
            explanation: "150 minutes of moderate activity is the standard baseline.",
            difficulty: 1,
        },
        SeedQuestion {
            category: Category::Habits,
            tags: &[PsychTag::Consistency],
            prompt: "What is 'habit stacking'?",
            choices: [
                "Doing many habits at once",
                "Attaching a new habit to an existing one",
                "Tracking habits in a spreadsheet",
                "Replacing one habit per week",
            ],
            answer_index: 1,
            explanation: "Anchoring a new behavior to an established routine makes it stick.",
            difficulty: 2,
        },
        SeedQuestion {
            category: Category::Mindfulness,
            tags: &[PsychTag::StressManagement, PsychTag::MindfulEating],
            prompt: "What does 'mindful eating' primarily train?",
            choices: ["Eating faster", "Noticing hunger and fullness cues", "Counting calories", "Skipping meals"],
            answer_index: 1,
            explanation: "Attention to internal cues, not external rules, is the point.",
            difficulty: 2,
        },
        SeedQuestion {
            category: Category::Focus,
            tags: &[PsychTag::SleepHygiene],
            prompt: "Which habit most reliably improves next-day focus?",
            choices: ["Extra coffee", "Consistent sleep schedule", "Skipping breakfast", "Late workouts"],
            answer_index: 1,
            explanation: "A stable sleep-wake rhythm beats any stimulant.",
            difficulty: 2,
        },
        SeedQuestion {
            category: Category::Resilience,
            tags: &[PsychTag::Motivation, PsychTag::Consistency],
            prompt: "After missing a planned workout, what response predicts long-term success?",
            choices: [
                "Doubling the next session",
                "Restarting the whole program",
                "Resuming the normal schedule",
                "Taking the week off",
            ],
            answer_index: 2,
            explanation: "Never missing twice matters more than any single slip.",
            difficulty: 2,
        },
        SeedQuestion {
            category: Category::MentalWellness,
            tags: &[PsychTag::StressManagement],
            prompt: "Slow exhale-focused breathing mainly activates which system?",
            choices: ["Sympathetic", "Parasympathetic", "Endocrine", "Skeletal"],
            answer_index: 1,
            explanation: "Long exhales engage the body's rest-and-digest response.",
            difficulty: 3,
        },
        SeedQuestion {
            category: Category::Habits,
            tags: &[PsychTag::Hydration],
            prompt: "Which cue works best for remembering to drink water?",
            choices: ["Willpower", "Tying it to meals", "Thirst alone", "Evening catch-up"],
            answer_index: 1,
            explanation: "Meal-anchored cues outperform relying on thirst.",
            difficulty: 1,
        },
    ];

    for q in questions {
        let tags: Vec<String> = q.tags.iter().map(|t| t.as_str().to_string()).collect();
        let choices: Vec<String> = q.choices.iter().map(|c| c.to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO trivia_questions
                (category, mindset_category, psych_tags, prompt, choices,
                 answer_index, explanation, difficulty)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(q.category)
        .bind(q.category.is_mindset().then_some(q.category))
        .bind(&tags)
        .bind(q.prompt)
        .bind(&choices)
        .bind(q.answer_index)
        .bind(q.explanation)
        .bind(q.difficulty)
        .execute(pool)
        .await?;
    }
    tracing::info!("starter question bank seeded");
    Ok(())
}
