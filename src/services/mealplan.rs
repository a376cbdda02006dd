use crate::domain::{Cuisine, MealSlot, RecipeTag};
use crate::services::targets::Targets;
use serde::{Deserialize, Serialize};

/// Scaling factor bounds; protects against cartoonish portions when a
/// slot target sits far from every recipe in the bank.
pub const MIN_SCALE: f64 = 0.75;
pub const MAX_SCALE: f64 = 1.35;

pub const PLAN_DAYS: i16 = 7;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Prefs {
    pub dislikes: Vec<String>,
    pub allergens: Vec<String>,
    pub cuisines: Vec<Cuisine>,
    pub effort: Option<String>,
    pub budget: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Recipe {
    pub slot: MealSlot,
    pub label: &'static str,
    pub kcal: i32,
    pub protein_g: i32,
    pub carbs_g: i32,
    pub fat_g: i32,
    pub tags: &'static [RecipeTag],
    pub cuisines: &'static [Cuisine],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    pub day: i16,
    #[serde(rename = "mealSlot")]
    pub slot: MealSlot,
    pub label: String,
    pub kcal: i32,
    #[serde(rename = "protein")]
    pub protein_g: i32,
    #[serde(rename = "carbs")]
    pub carbs_g: i32,
    #[serde(rename = "fat")]
    pub fat_g: i32,
}

pub static RECIPE_BANK: &[Recipe] = &[
    // Breakfast
    Recipe { slot: MealSlot::Breakfast, label: "Greek yogurt bowl with berries", kcal: 420, protein_g: 32, carbs_g: 44, fat_g: 12, tags: &[RecipeTag::HighProtein, RecipeTag::DiabetesFriendly, RecipeTag::Vegetarian], cuisines: &[Cuisine::Mediterranean] },
    Recipe { slot: MealSlot::Breakfast, label: "Veggie egg scramble with toast", kcal: 460, protein_g: 28, carbs_g: 38, fat_g: 20, tags: &[RecipeTag::HighProtein, RecipeTag::LowSodium, RecipeTag::Vegetarian], cuisines: &[Cuisine::American] },
    Recipe { slot: MealSlot::Breakfast, label: "Overnight oats with chia", kcal: 390, protein_g: 18, carbs_g: 58, fat_g: 10, tags: &[RecipeTag::HighFiber, RecipeTag::DiabetesFriendly, RecipeTag::Glp1Support, RecipeTag::Vegetarian], cuisines: &[Cuisine::American] },
    Recipe { slot: MealSlot::Breakfast, label: "Masala tofu scramble", kcal: 410, protein_g: 26, carbs_g: 30, fat_g: 18, tags: &[RecipeTag::LowSodium, RecipeTag::Vegetarian], cuisines: &[Cuisine::Indian] },
    Recipe { slot: MealSlot::Breakfast, label: "Breakfast burrito with black beans", kcal: 520, protein_g: 27, carbs_g: 54, fat_g: 19, tags: &[RecipeTag::HighFiber], cuisines: &[Cuisine::Mexican] },
    // Lunch
    Recipe { slot: MealSlot::Lunch, label: "Grilled chicken quinoa bowl", kcal: 620, protein_g: 48, carbs_g: 55, fat_g: 18, tags: &[RecipeTag::HighProtein, RecipeTag::LowSodium, RecipeTag::DiabetesFriendly], cuisines: &[Cuisine::Mediterranean] },
    Recipe { slot: MealSlot::Lunch, label: "Salmon poke bowl", kcal: 640, protein_g: 38, carbs_g: 62, fat_g: 22, tags: &[RecipeTag::HighProtein, RecipeTag::Glp1Support], cuisines: &[Cuisine::Asian] },
    Recipe { slot: MealSlot::Lunch, label: "Turkey chili with cornbread", kcal: 680, protein_g: 44, carbs_g: 64, fat_g: 22, tags: &[RecipeTag::HighFiber], cuisines: &[Cuisine::American, Cuisine::Mexican] },
    Recipe { slot: MealSlot::Lunch, label: "Chickpea spinach curry with rice", kcal: 600, protein_g: 22, carbs_g: 82, fat_g: 18, tags: &[RecipeTag::HighFiber, RecipeTag::Vegetarian, RecipeTag::LowSodium], cuisines: &[Cuisine::Indian] },
    Recipe { slot: MealSlot::Lunch, label: "Tuna nicoise salad", kcal: 540, protein_g: 40, carbs_g: 30, fat_g: 26, tags: &[RecipeTag::HighProtein, RecipeTag::DiabetesFriendly, RecipeTag::Glp1Support, RecipeTag::LowSodium], cuisines: &[Cuisine::Mediterranean] },
    // Dinner
    Recipe { slot: MealSlot::Dinner, label: "Baked cod with roasted vegetables", kcal: 520, protein_g: 42, carbs_g: 34, fat_g: 20, tags: &[RecipeTag::LowSodium, RecipeTag::DiabetesFriendly, RecipeTag::Glp1Support, RecipeTag::HighProtein], cuisines: &[Cuisine::Mediterranean] },
    Recipe { slot: MealSlot::Dinner, label: "Chicken stir-fry with brown rice", kcal: 580, protein_g: 40, carbs_g: 58, fat_g: 16, tags: &[RecipeTag::HighProtein, RecipeTag::DiabetesFriendly], cuisines: &[Cuisine::Asian] },
    Recipe { slot: MealSlot::Dinner, label: "Lean beef tacos with slaw", kcal: 610, protein_g: 38, carbs_g: 48, fat_g: 26, tags: &[RecipeTag::HighProtein], cuisines: &[Cuisine::Mexican] },
    Recipe { slot: MealSlot::Dinner, label: "Lentil dal with cauliflower rice", kcal: 480, protein_g: 24, carbs_g: 60, fat_g: 14, tags: &[RecipeTag::HighFiber, RecipeTag::Vegetarian, RecipeTag::LowSodium, RecipeTag::DiabetesFriendly], cuisines: &[Cuisine::Indian] },
    Recipe { slot: MealSlot::Dinner, label: "Turkey meatballs with zucchini noodles", kcal: 540, protein_g: 44, carbs_g: 28, fat_g: 24, tags: &[RecipeTag::HighProtein, RecipeTag::LowSodium, RecipeTag::Glp1Support], cuisines: &[Cuisine::Mediterranean, Cuisine::American] },
    // Snacks
    Recipe { slot: MealSlot::Snack, label: "Apple with peanut butter", kcal: 220, protein_g: 7, carbs_g: 26, fat_g: 11, tags: &[RecipeTag::Vegetarian, RecipeTag::DiabetesFriendly], cuisines: &[Cuisine::American] },
    Recipe { slot: MealSlot::Snack, label: "Cottage cheese with pineapple", kcal: 190, protein_g: 22, carbs_g: 18, fat_g: 3, tags: &[RecipeTag::HighProtein, RecipeTag::Vegetarian, RecipeTag::LowSodium, RecipeTag::Glp1Support], cuisines: &[Cuisine::American] },
    Recipe { slot: MealSlot::Snack, label: "Roasted chickpeas", kcal: 180, protein_g: 9, carbs_g: 24, fat_g: 6, tags: &[RecipeTag::HighFiber, RecipeTag::Vegetarian, RecipeTag::LowSodium, RecipeTag::DiabetesFriendly], cuisines: &[Cuisine::Mediterranean, Cuisine::Indian] },
    Recipe { slot: MealSlot::Snack, label: "Edamame with sea salt", kcal: 160, protein_g: 14, carbs_g: 12, fat_g: 7, tags: &[RecipeTag::HighProtein, RecipeTag::Vegetarian, RecipeTag::DiabetesFriendly], cuisines: &[Cuisine::Asian] },
];

/// Clinical "must" tags derived from targets flags. Recipes lacking any
/// of these are filtered out, with a fallback when the filter would
/// empty the candidate set.
fn must_tags(targets: &Targets) -> Vec<RecipeTag> {
    let mut tags = Vec::new();
    if targets.low_sodium {
        tags.push(RecipeTag::LowSodium);
    }
    if targets.diabetes_friendly {
        tags.push(RecipeTag::DiabetesFriendly);
    }
    if targets.glp1 {
        tags.push(RecipeTag::Glp1Support);
    }
    tags
}

fn label_matches_any(label: &str, terms: &[String]) -> bool {
    let label = label.to_lowercase();
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .any(|t| label.contains(&t))
}

fn scale(recipe: &Recipe, target_kcal: i32) -> PlanItem {
    let factor = if recipe.kcal > 0 {
        (f64::from(target_kcal) / f64::from(recipe.kcal)).clamp(MIN_SCALE, MAX_SCALE)
    } else {
        1.0
    };
    let apply = |v: i32| (f64::from(v) * factor).round() as i32;
    PlanItem {
        day: 0,
        slot: recipe.slot,
        label: recipe.label.to_string(),
        kcal: apply(recipe.kcal),
        protein_g: apply(recipe.protein_g),
        carbs_g: apply(recipe.carbs_g),
        fat_g: apply(recipe.fat_g),
    }
}

fn candidates_for<'a>(
    bank: &'a [Recipe],
    slot: MealSlot,
    targets: &Targets,
    prefs: &Prefs,
) -> Vec<&'a Recipe> {
    let slot_pool: Vec<&Recipe> = bank.iter().filter(|r| r.slot == slot).collect();

    let required = must_tags(targets);
    let mut pool: Vec<&Recipe> = slot_pool
        .iter()
        .copied()
        .filter(|r| required.iter().all(|t| r.tags.contains(t)))
        .collect();
    if pool.is_empty() {
        pool = slot_pool;
    }

    let mut excluded_terms: Vec<String> = prefs.dislikes.clone();
    excluded_terms.extend(prefs.allergens.iter().cloned());
    excluded_terms.extend(targets.allergens.iter().cloned());
    let kept: Vec<&Recipe> = pool
        .iter()
        .copied()
        .filter(|r| !label_matches_any(r.label, &excluded_terms))
        .collect();
    if !kept.is_empty() {
        pool = kept;
    }

    if !prefs.cuisines.is_empty() {
        let preferred: Vec<&Recipe> = pool
            .iter()
            .copied()
            .filter(|r| r.cuisines.iter().any(|c| prefs.cuisines.contains(c)))
            .collect();
        if !preferred.is_empty() {
            pool = preferred;
        }
    }

    pool
}

/// Build the 7-day x 4-slot plan for one client. Fully deterministic:
/// candidate filtering is order-preserving and day `d` takes candidate
/// `(d - 1) mod len`, so identical inputs always produce the same plan.
pub fn generate_plan_7d(targets: &Targets, prefs: &Prefs) -> Vec<PlanItem> {
    generate_with_bank(RECIPE_BANK, targets, prefs)
}

pub fn generate_with_bank(bank: &[Recipe], targets: &Targets, prefs: &Prefs) -> Vec<PlanItem> {
    let total_kcal = targets.daily_kcal();
    let mut plan = Vec::with_capacity(PLAN_DAYS as usize * MealSlot::ALL.len());

    for day in 1..=PLAN_DAYS {
        for slot in MealSlot::ALL {
            // Each slot rounds its share independently; the four shares
            // need not reassemble the exact daily total.
            let slot_kcal = (f64::from(total_kcal) * slot.kcal_weight()).round() as i32;
            let pool = candidates_for(bank, slot, targets, prefs);
            if pool.is_empty() {
                continue;
            }
            let recipe = pool[(day as usize - 1) % pool.len()];
            let mut item = scale(recipe, slot_kcal);
            item.day = day;
            plan.push(item);
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> Targets {
        Targets {
            protein_g: 150,
            starchy_carbs_g: 150,
            fibrous_carbs_g: 50,
            fat_g: 60,
            ..Targets::default()
        }
    }

    #[test]
    fn kcal_split_follows_slot_weights() {
        let t = targets();
        assert_eq!(t.daily_kcal(), 1940);
        assert_eq!((1940.0 * MealSlot::Breakfast.kcal_weight()).round() as i32, 485);
        assert_eq!((1940.0 * MealSlot::Lunch.kcal_weight()).round() as i32, 679);
        assert_eq!((1940.0 * MealSlot::Dinner.kcal_weight()).round() as i32, 582);
        assert_eq!((1940.0 * MealSlot::Snack.kcal_weight()).round() as i32, 194);
    }

    #[test]
    fn plan_covers_seven_days_and_four_slots() {
        let plan = generate_plan_7d(&targets(), &Prefs::default());
        assert_eq!(plan.len(), 28);
        for day in 1..=7i16 {
            for slot in MealSlot::ALL {
                assert!(plan.iter().any(|i| i.day == day && i.slot == slot));
            }
        }
    }

    #[test]
    fn plan_is_deterministic() {
        let t = targets();
        let p = Prefs {
            dislikes: vec!["tofu".into()],
            cuisines: vec![Cuisine::Mediterranean],
            ..Prefs::default()
        };
        assert_eq!(generate_plan_7d(&t, &p), generate_plan_7d(&t, &p));
    }

    #[test]
    fn rotation_walks_candidates_in_order() {
        let bank = [
            Recipe { slot: MealSlot::Breakfast, label: "first", kcal: 400, protein_g: 30, carbs_g: 40, fat_g: 10, tags: &[], cuisines: &[] },
            Recipe { slot: MealSlot::Breakfast, label: "second", kcal: 400, protein_g: 30, carbs_g: 40, fat_g: 10, tags: &[], cuisines: &[] },
            Recipe { slot: MealSlot::Breakfast, label: "third", kcal: 400, protein_g: 30, carbs_g: 40, fat_g: 10, tags: &[], cuisines: &[] },
        ];
        let plan = generate_with_bank(&bank, &targets(), &Prefs::default());
        let breakfasts: Vec<&str> = plan
            .iter()
            .filter(|i| i.slot == MealSlot::Breakfast)
            .map(|i| i.label.as_str())
            .collect();
        assert_eq!(
            breakfasts,
            vec!["first", "second", "third", "first", "second", "third", "first"]
        );
    }

    #[test]
    fn scaling_stays_inside_the_clamp() {
        let plan = generate_plan_7d(&targets(), &Prefs::default());
        for item in &plan {
            let source = RECIPE_BANK
                .iter()
                .find(|r| r.label == item.label)
                .expect("plan item comes from the bank");
            let lo = (f64::from(source.kcal) * MIN_SCALE).round() as i32;
            let hi = (f64::from(source.kcal) * MAX_SCALE).round() as i32;
            assert!(
                (lo..=hi).contains(&item.kcal),
                "{}: {} outside [{lo}, {hi}]",
                item.label,
                item.kcal
            );
        }
    }

    #[test]
    fn clinical_flags_restrict_candidates_with_fallback() {
        let clinical = Targets {
            low_sodium: true,
            glp1: true,
            ..targets()
        };
        let plan = generate_plan_7d(&clinical, &Prefs::default());
        for item in plan.iter().filter(|i| i.slot == MealSlot::Dinner) {
            let source = RECIPE_BANK.iter().find(|r| r.label == item.label).unwrap();
            assert!(source.tags.contains(&RecipeTag::LowSodium));
            assert!(source.tags.contains(&RecipeTag::Glp1Support));
        }

        // All three flags leave no matching breakfast; the slot falls
        // back to its unfiltered set instead of going empty.
        let strict = Targets {
            low_sodium: true,
            diabetes_friendly: true,
            glp1: true,
            ..targets()
        };
        let plan = generate_plan_7d(&strict, &Prefs::default());
        assert_eq!(plan.len(), 28);
    }

    #[test]
    fn dislikes_exclude_by_case_insensitive_substring() {
        let prefs = Prefs {
            dislikes: vec!["Chicken".into()],
            ..Prefs::default()
        };
        let plan = generate_plan_7d(&targets(), &prefs);
        assert!(plan
            .iter()
            .all(|i| !i.label.to_lowercase().contains("chicken")));
    }

    #[test]
    fn cuisine_preference_applies_when_matches_exist() {
        let prefs = Prefs {
            cuisines: vec![Cuisine::Indian],
            ..Prefs::default()
        };
        let plan = generate_plan_7d(&targets(), &prefs);
        for item in plan.iter().filter(|i| i.slot == MealSlot::Lunch) {
            let source = RECIPE_BANK.iter().find(|r| r.label == item.label).unwrap();
            assert!(source.cuisines.contains(&Cuisine::Indian));
        }
    }
}
