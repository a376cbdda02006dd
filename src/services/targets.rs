use crate::domain::{ProRole, StarchStrategy};
use serde::{Deserialize, Serialize};

/// Daily macro targets for one client, professional- or self-set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Targets {
    #[serde(rename = "protein")]
    pub protein_g: i32,
    #[serde(rename = "starchyCarbs")]
    pub starchy_carbs_g: i32,
    #[serde(rename = "fibrousCarbs")]
    pub fibrous_carbs_g: i32,
    #[serde(rename = "fat")]
    pub fat_g: i32,
    pub starch_strategy: Option<StarchStrategy>,
    pub low_sodium: bool,
    pub diabetes_friendly: bool,
    pub glp1: bool,
    pub allergens: Vec<String>,
    #[serde(rename = "starchyCap")]
    pub starchy_cap_g: Option<i32>,
}

impl Default for Targets {
    /// The ~2000 kcal starting point every new client record gets
    /// (160g protein + 180g carbs + 70g fat).
    fn default() -> Self {
        Self {
            protein_g: 160,
            starchy_carbs_g: 130,
            fibrous_carbs_g: 50,
            fat_g: 70,
            starch_strategy: None,
            low_sodium: false,
            diabetes_friendly: false,
            glp1: false,
            allergens: Vec::new(),
            starchy_cap_g: None,
        }
    }
}

impl Targets {
    pub fn daily_kcal(&self) -> i32 {
        self.protein_g * 4 + (self.starchy_carbs_g + self.fibrous_carbs_g) * 4 + self.fat_g * 9
    }

    /// Whether the record still matches the untouched default. A pro who
    /// deliberately saves targets equal to the default is misread as
    /// "never configured" — known limitation, kept for compatibility.
    pub fn is_default(&self) -> bool {
        *self == Targets::default()
    }

    fn zero() -> Self {
        Self {
            protein_g: 0,
            starchy_carbs_g: 0,
            fibrous_carbs_g: 0,
            fat_g: 0,
            starch_strategy: None,
            low_sodium: false,
            diabetes_friendly: false,
            glp1: false,
            allergens: Vec::new(),
            starchy_cap_g: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSource {
    #[serde(rename = "pro")]
    Pro,
    #[serde(rename = "self")]
    SelfSet,
    #[serde(rename = "none")]
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTargets {
    pub source: TargetSource,
    pub title: Option<String>,
    #[serde(flatten)]
    pub targets: Targets,
}

/// Precedence between professionally-set and self-set targets:
/// pro wins only when its record has actually been edited away from the
/// default tuple, otherwise self-set, otherwise an all-zero sentinel.
pub fn resolve_targets(
    pro: Option<(Targets, ProRole)>,
    self_set: Option<Targets>,
) -> ResolvedTargets {
    if let Some((targets, role)) = pro {
        if !targets.is_default() {
            return ResolvedTargets {
                source: TargetSource::Pro,
                title: Some(role.display_title().to_string()),
                targets,
            };
        }
    }
    if let Some(targets) = self_set {
        return ResolvedTargets {
            source: TargetSource::SelfSet,
            title: None,
            targets,
        };
    }
    ResolvedTargets {
        source: TargetSource::None,
        title: None,
        targets: Targets::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edited() -> Targets {
        Targets {
            protein_g: 150,
            ..Targets::default()
        }
    }

    #[test]
    fn default_tuple_adds_up_to_roughly_2000_kcal() {
        let kcal = Targets::default().daily_kcal();
        assert_eq!(kcal, 160 * 4 + 180 * 4 + 70 * 9);
    }

    #[test]
    fn nothing_configured_yields_zero_sentinel() {
        let resolved = resolve_targets(None, None);
        assert_eq!(resolved.source, TargetSource::None);
        assert_eq!(resolved.targets.daily_kcal(), 0);
        assert!(resolved.title.is_none());
    }

    #[test]
    fn self_targets_used_when_no_pro_link() {
        let resolved = resolve_targets(None, Some(edited()));
        assert_eq!(resolved.source, TargetSource::SelfSet);
        assert_eq!(resolved.targets.protein_g, 150);
    }

    #[test]
    fn edited_pro_targets_win_over_self() {
        let resolved = resolve_targets(
            Some((edited(), ProRole::Dietitian)),
            Some(Targets::default()),
        );
        assert_eq!(resolved.source, TargetSource::Pro);
        assert_eq!(resolved.title.as_deref(), Some("Set by your dietitian"));
    }

    #[test]
    fn untouched_pro_record_falls_through_to_self() {
        let resolved = resolve_targets(
            Some((Targets::default(), ProRole::Trainer)),
            Some(edited()),
        );
        assert_eq!(resolved.source, TargetSource::SelfSet);

        let resolved = resolve_targets(Some((Targets::default(), ProRole::Trainer)), None);
        assert_eq!(resolved.source, TargetSource::None);
    }

    #[test]
    fn flag_only_edit_counts_as_configured() {
        let flagged = Targets {
            low_sodium: true,
            ..Targets::default()
        };
        let resolved = resolve_targets(Some((flagged, ProRole::Clinician)), None);
        assert_eq!(resolved.source, TargetSource::Pro);
        assert_eq!(resolved.title.as_deref(), Some("Set by your care team"));
    }
}
