pub mod badges;
pub mod challenge;
pub mod composer;
pub mod mealplan;
pub mod scoring;
pub mod targets;
