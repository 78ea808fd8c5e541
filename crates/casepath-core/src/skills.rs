//! # Skill Catalog
//!
//! Static copy for each `SkillCategory`: display name, description,
//! improvement tips and the score breakdown.
//!
//! Every table is an exhaustive `match`, so adding a category does not
//! compile until each table covers it.

use crate::primitives::DEFAULT_PRACTICE_TARGETS;
use crate::progression::compute_skill_practice_targets;
use crate::{SkillCategory, Stage, StageResult};
use serde::Serialize;

// =============================================================================
// SKILL PROFILE
// =============================================================================

/// Display name shown on cards and practice buttons.
#[must_use]
pub fn display_name(category: SkillCategory) -> &'static str {
    match category {
        SkillCategory::ProblemStructuring => "Business Problem Structuring",
        SkillCategory::QuantitativeAnalysis => "Quantitative Problem Solving",
        SkillCategory::BusinessAcumen => "Market & Industry Analysis",
        SkillCategory::Communication => "Case Communication & Presentation",
        SkillCategory::Creativity => "Data-Driven Decision Making",
    }
}

#[must_use]
pub fn description(category: SkillCategory) -> &'static str {
    match category {
        SkillCategory::ProblemStructuring => {
            "Master key business frameworks and learn to structure your approach to various case types."
        }
        SkillCategory::QuantitativeAnalysis => {
            "Enhance your ability to perform quick calculations and analyze numerical data in case scenarios."
        }
        SkillCategory::BusinessAcumen => {
            "Learn techniques to analyze markets, industries, and competitive landscapes crucial for strategic business decisions."
        }
        SkillCategory::Communication => {
            "Develop skills to articulate your solutions clearly and persuasively in various formats."
        }
        SkillCategory::Creativity => {
            "Improve your ability to analyze complex data sets, draw insights, and make informed decisions."
        }
    }
}

/// Generic improvement tips, most general first.
#[must_use]
pub fn improvement_tips(category: SkillCategory) -> &'static [&'static str] {
    match category {
        SkillCategory::ProblemStructuring => &[
            "Break down complex problems into manageable parts",
            "Develop a structured approach to problem-solving",
            "Identify key issues and prioritize them effectively",
        ],
        SkillCategory::QuantitativeAnalysis => &[
            "Improve your mental math skills",
            "Practice data interpretation and analysis",
            "Enhance your ability to draw insights from numbers",
        ],
        SkillCategory::BusinessAcumen => &[
            "Deepen your understanding of business models",
            "Stay updated on current market trends",
            "Develop a strategic mindset for business challenges",
        ],
        SkillCategory::Communication => &[
            "Articulate your thoughts more clearly and concisely",
            "Improve your ability to explain complex concepts simply",
            "Enhance your active listening skills",
        ],
        SkillCategory::Creativity => &[
            "Generate more innovative solutions to problems",
            "Practice thinking outside the box",
            "Improve your ability to connect disparate ideas",
        ],
    }
}

/// Serializable bundle of a category's static copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillProfile {
    pub category: SkillCategory,
    pub name: &'static str,
    pub description: &'static str,
    pub tips: &'static [&'static str],
}

impl SkillProfile {
    #[must_use]
    pub fn of(category: SkillCategory) -> Self {
        Self {
            category,
            name: display_name(category),
            description: description(category),
            tips: improvement_tips(category),
        }
    }

    /// Profiles for every category, in declaration order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        SkillCategory::ALL.iter().map(|c| Self::of(*c)).collect()
    }
}

// =============================================================================
// SCORE BREAKDOWN
// =============================================================================

/// One sub-metric within a category breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakdownMetric {
    pub name: &'static str,
    pub description: &'static str,
    /// Reference score for the sub-metric, 0..=100.
    pub score: u8,
}

/// Detailed breakdown behind a category score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub category: SkillCategory,
    pub title: &'static str,
    pub overall: u8,
    pub metrics: [BreakdownMetric; 3],
    pub methodology: &'static str,
}

const METHODOLOGY: &str = "Scores are based on your performance across multiple case interviews \
and practice sessions. Each metric is evaluated based on specific criteria and weighted to provide \
a comprehensive assessment of your skills in this area.";

const fn metric(name: &'static str, description: &'static str, score: u8) -> BreakdownMetric {
    BreakdownMetric {
        name,
        description,
        score,
    }
}

/// Breakdown for a category shown next to an overall score.
#[must_use]
pub fn score_breakdown(category: SkillCategory, overall: u8) -> ScoreBreakdown {
    let (title, metrics) = match category {
        SkillCategory::QuantitativeAnalysis => (
            "Quantitative Problem Solving Breakdown",
            [
                metric(
                    "Calculation Accuracy",
                    "Ability to perform calculations quickly and accurately",
                    85,
                ),
                metric(
                    "Data Interpretation",
                    "Skill in analyzing and drawing insights from numerical data",
                    75,
                ),
                metric(
                    "Estimation Skills",
                    "Ability to make reasonable assumptions and estimates",
                    70,
                ),
            ],
        ),
        SkillCategory::BusinessAcumen => (
            "Market & Industry Analysis Breakdown",
            [
                metric(
                    "Market Understanding",
                    "Knowledge of market dynamics and trends",
                    80,
                ),
                metric(
                    "Competitive Analysis",
                    "Ability to analyze competitive landscapes",
                    75,
                ),
                metric(
                    "Strategic Thinking",
                    "Capability to identify strategic implications",
                    70,
                ),
            ],
        ),
        SkillCategory::ProblemStructuring => (
            "Business Problem Structuring Breakdown",
            [
                metric(
                    "Framework Application",
                    "Effective use of business frameworks",
                    80,
                ),
                metric(
                    "Issue Identification",
                    "Ability to identify key business issues",
                    75,
                ),
                metric(
                    "Solution Development",
                    "Skill in developing structured solutions",
                    70,
                ),
            ],
        ),
        SkillCategory::Creativity => (
            "Data-Driven Decision Making Breakdown",
            [
                metric("Data Analysis", "Ability to analyze complex datasets", 80),
                metric(
                    "Insight Generation",
                    "Skill in drawing meaningful insights",
                    75,
                ),
                metric("Decision Quality", "Quality of data-backed decisions", 70),
            ],
        ),
        SkillCategory::Communication => (
            "Case Communication & Presentation Breakdown",
            [
                metric("Clarity", "Clear and concise communication", 85),
                metric("Structure", "Logical flow and organization", 75),
                metric("Engagement", "Ability to engage and persuade", 80),
            ],
        ),
    };

    ScoreBreakdown {
        category,
        title,
        overall,
        metrics,
        methodology: METHODOLOGY,
    }
}

// =============================================================================
// IMPROVEMENT TIPS
// =============================================================================

/// Chooses a fallback tip when no grader note matches.
pub trait TipSelector {
    /// Pick an index in `0..tip_count`. `tip_count` is never zero.
    fn select(&self, category: SkillCategory, tip_count: usize) -> usize;
}

/// Always the first tip.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTip;

impl TipSelector for FirstTip {
    fn select(&self, _category: SkillCategory, _tip_count: usize) -> usize {
        0
    }
}

/// Seeded rotation: the same seed always yields the same tips, different
/// seeds spread across them.
#[derive(Debug, Clone, Copy)]
pub struct RotatingTip {
    seed: u64,
}

impl RotatingTip {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl TipSelector for RotatingTip {
    fn select(&self, category: SkillCategory, tip_count: usize) -> usize {
        let offset = self.seed.wrapping_add(category.ordinal() as u64);
        (offset % tip_count as u64) as usize
    }
}

/// Tip for `category`, preferring the grader's own improvement notes.
///
/// A note matches when it contains one of the category's generic tips,
/// ignoring case. Otherwise `selector` picks a generic tip.
#[must_use]
pub fn improvement_tip(
    category: SkillCategory,
    improvement_areas: &[String],
    selector: &dyn TipSelector,
) -> String {
    let tips = improvement_tips(category);

    let matching_note = improvement_areas.iter().find(|area| {
        let area = area.to_lowercase();
        tips.iter().any(|tip| area.contains(&tip.to_lowercase()))
    });

    if let Some(note) = matching_note {
        return note.clone();
    }

    let index = selector.select(category, tips.len()).min(tips.len() - 1);
    tips.get(index).copied().unwrap_or_default().to_string()
}

// =============================================================================
// FOCUSED IMPROVEMENT
// =============================================================================

/// One skill the candidate should practice next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PracticeTarget {
    pub category: SkillCategory,
    pub name: &'static str,
    pub score: Option<u8>,
    pub tip: String,
}

/// Practice plan derived from a single result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusedImprovement {
    pub stage: Stage,
    pub passed: bool,
    pub targets: Vec<PracticeTarget>,
}

/// Build the practice plan for `result` with `k` targets.
#[must_use]
pub fn focused_improvement(
    result: &StageResult,
    k: usize,
    selector: &dyn TipSelector,
) -> FocusedImprovement {
    let targets = compute_skill_practice_targets(result, k)
        .into_iter()
        .map(|category| PracticeTarget {
            category,
            name: display_name(category),
            score: result.score_for(category),
            tip: improvement_tip(category, result.improvement_areas(), selector),
        })
        .collect();

    FocusedImprovement {
        stage: result.stage(),
        passed: result.passed(),
        targets,
    }
}

/// Practice plan with the default target count and first-tip fallback.
#[must_use]
pub fn default_focused_improvement(result: &StageResult) -> FocusedImprovement {
    focused_improvement(result, DEFAULT_PRACTICE_TARGETS, &FirstTip)
}

// =============================================================================
// TESTS
// =============================================================================
