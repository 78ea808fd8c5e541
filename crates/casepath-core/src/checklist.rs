//! # Preparation Checklist
//!
//! The self-assessed checklist a candidate ticks off before starting a
//! stage. Independent of the quiz and exercise progress in `preparation`:
//! items are toggled freely, including back off.
//!
//! Progress is the share of checked items, rounded half up. The stage can
//! be started only once every item is checked.

use crate::CasepathError;
use crate::preparation::rounded_percent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Advice shown next to the checklist.
pub const EXPERT_TIPS: [&str; 4] = [
    "Develop a \"consultant mindset\" - think analytically and strategically about everyday situations",
    "Practice the \"Pyramid Principle\" for structured communication - start with the conclusion, then provide supporting arguments",
    "Stay updated on business news and industry trends - read publications like The Economist, Wall Street Journal, or Harvard Business Review",
    "Improve your mental math skills - practice quick calculations and estimations daily",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistItem {
    Frameworks,
    MentalMath,
    StructuredResponses,
    IndustryTrends,
}

impl ChecklistItem {
    pub const ALL: [ChecklistItem; 4] = [
        ChecklistItem::Frameworks,
        ChecklistItem::MentalMath,
        ChecklistItem::StructuredResponses,
        ChecklistItem::IndustryTrends,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecklistItem::Frameworks => "frameworks",
            ChecklistItem::MentalMath => "mental_math",
            ChecklistItem::StructuredResponses => "structured_responses",
            ChecklistItem::IndustryTrends => "industry_trends",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ChecklistItem::Frameworks => "Review relevant business frameworks",
            ChecklistItem::MentalMath => "Practice quick mental math and data interpretation",
            ChecklistItem::StructuredResponses => "Prepare concise and structured responses",
            ChecklistItem::IndustryTrends => "Research recent industry trends",
        }
    }
}

impl fmt::Display for ChecklistItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChecklistItem {
    type Err = CasepathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChecklistItem::ALL
            .into_iter()
            .find(|item| item.as_str() == s)
            .ok_or_else(|| CasepathError::UnknownChecklistItem(s.to_string()))
    }
}

/// Checked items for one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparationChecklist {
    checked: BTreeSet<ChecklistItem>,
}

impl PreparationChecklist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_checked(&self, item: ChecklistItem) -> bool {
        self.checked.contains(&item)
    }

    /// Flip one item. Returns its new state.
    pub fn toggle(&mut self, item: ChecklistItem) -> bool {
        let checked = !self.is_checked(item);
        self.set(item, checked);
        checked
    }

    /// Check or uncheck one item. Returns whether anything changed.
    pub fn set(&mut self, item: ChecklistItem, checked: bool) -> bool {
        if checked {
            self.checked.insert(item)
        } else {
            self.checked.remove(&item)
        }
    }

    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    /// Share of items checked, 0..=100.
    #[must_use]
    pub fn percent(&self) -> u8 {
        rounded_percent(self.checked.len() as u32, ChecklistItem::ALL.len() as u32)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.checked.len() == ChecklistItem::ALL.len()
    }

    /// "I'm ready to start" once complete, otherwise "N% Prepared".
    #[must_use]
    pub fn start_label(&self) -> String {
        if self.is_ready() {
            "I'm ready to start".to_string()
        } else {
            format!("{}% Prepared", self.percent())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_names_roundtrip() {
        for item in ChecklistItem::ALL {
            assert_eq!(item.as_str().parse::<ChecklistItem>().expect("parse"), item);
        }
        assert!(matches!(
            "mentalMath".parse::<ChecklistItem>(),
            Err(CasepathError::UnknownChecklistItem(_))
        ));
    }

    #[test]
    fn empty_checklist() {
        let checklist = PreparationChecklist::new();
        assert_eq!(checklist.percent(), 0);
        assert!(!checklist.is_ready());
        assert_eq!(checklist.start_label(), "0% Prepared");
    }

    #[test]
    fn each_item_is_a_quarter() {
        let mut checklist = PreparationChecklist::new();
        assert!(checklist.toggle(ChecklistItem::Frameworks));
        assert_eq!(checklist.percent(), 25);
        assert!(checklist.set(ChecklistItem::MentalMath, true));
        assert!(checklist.set(ChecklistItem::IndustryTrends, true));
        assert_eq!(checklist.percent(), 75);
        assert_eq!(checklist.start_label(), "75% Prepared");
    }

    #[test]
    fn unchecking_lowers_progress() {
        let mut checklist = PreparationChecklist::new();
        for item in ChecklistItem::ALL {
            checklist.set(item, true);
        }
        assert!(checklist.is_ready());
        assert_eq!(checklist.start_label(), "I'm ready to start");

        assert!(!checklist.toggle(ChecklistItem::StructuredResponses));
        assert_eq!(checklist.percent(), 75);
        assert!(!checklist.is_ready());
        assert!(!checklist.is_checked(ChecklistItem::StructuredResponses));
    }

    #[test]
    fn set_reports_changes_only() {
        let mut checklist = PreparationChecklist::new();
        assert!(!checklist.set(ChecklistItem::Frameworks, false));
        assert!(checklist.set(ChecklistItem::Frameworks, true));
        assert!(!checklist.set(ChecklistItem::Frameworks, true));
        assert_eq!(checklist.checked_count(), 1);
    }
}
