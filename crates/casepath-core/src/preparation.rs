//! # Preparation Model
//!
//! The four study areas a candidate works through before starting a stage,
//! and the per-stage progress they accumulate.
//!
//! Progress rules:
//! - a correct quiz answer awards `PREPARATION_STEP_PERCENT` once per area
//! - completing the exercise awards `PREPARATION_STEP_PERCENT` once per area
//! - practice sessions add arbitrary increments
//! - every area is capped at `PREPARATION_AREA_MAX_PERCENT`
//!
//! A stage is ready to start once every area reaches the cap.

use crate::primitives::{PREPARATION_AREA_MAX_PERCENT, PREPARATION_STEP_PERCENT};
use crate::CasepathError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// PREPARATION AREA
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreparationArea {
    Frameworks,
    MentalMath,
    StructuredCommunication,
    IndustryKnowledge,
}

impl PreparationArea {
    pub const ALL: [PreparationArea; 4] = [
        PreparationArea::Frameworks,
        PreparationArea::MentalMath,
        PreparationArea::StructuredCommunication,
        PreparationArea::IndustryKnowledge,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PreparationArea::Frameworks => "frameworks",
            PreparationArea::MentalMath => "mental_math",
            PreparationArea::StructuredCommunication => "structured_communication",
            PreparationArea::IndustryKnowledge => "industry_knowledge",
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            PreparationArea::Frameworks => "Business Frameworks",
            PreparationArea::MentalMath => "Mental Math",
            PreparationArea::StructuredCommunication => "Structured Communication",
            PreparationArea::IndustryKnowledge => "Industry Knowledge",
        }
    }

    /// Learn text, quiz and exercise for this area.
    #[must_use]
    pub fn content(&self) -> AreaContent {
        match self {
            PreparationArea::Frameworks => AreaContent {
                area: *self,
                title: self.title(),
                text: "Master key business frameworks to structure your approach to case interviews.",
                quiz: Quiz {
                    question: "Which framework would you use to analyze a company's competitive position?",
                    options: &[
                        "SWOT Analysis",
                        "Porter's Five Forces",
                        "4Ps of Marketing",
                        "BCG Matrix",
                    ],
                    correct_answer: "Porter's Five Forces",
                },
                exercise: Exercise {
                    instruction: "Apply the MECE principle to categorize the following list of fruits: Apple, Banana, Orange, Grape, Watermelon, Strawberry, Blueberry, Mango.",
                    hint: "Consider categories like color, size, or type of fruit.",
                },
            },
            PreparationArea::MentalMath => AreaContent {
                area: *self,
                title: self.title(),
                text: "Sharpen your mental math skills for quick calculations during case interviews.",
                quiz: Quiz {
                    question: "What is 15% of 80?",
                    options: &["10", "12", "15", "18"],
                    correct_answer: "12",
                },
                exercise: Exercise {
                    instruction: "Estimate the result of 38 x 42 without using a calculator.",
                    hint: "Round to nearby numbers and adjust: (40 x 40) - (2 x 40) + (38 x 2)",
                },
            },
            PreparationArea::StructuredCommunication => AreaContent {
                area: *self,
                title: self.title(),
                text: "Learn to communicate your thoughts clearly and concisely using structured approaches.",
                quiz: Quiz {
                    question: "What is the first step in the Pyramid Principle?",
                    options: &[
                        "Start with details",
                        "Begin with the conclusion",
                        "List all options",
                        "Describe the problem",
                    ],
                    correct_answer: "Begin with the conclusion",
                },
                exercise: Exercise {
                    instruction: "Structure a response to the question: \"Why should our company expand into the Asian market?\"",
                    hint: "Use the Pyramid Principle: Start with your recommendation, then provide 2-3 supporting arguments.",
                },
            },
            PreparationArea::IndustryKnowledge => AreaContent {
                area: *self,
                title: self.title(),
                text: "Stay updated on current business trends and industry-specific knowledge.",
                quiz: Quiz {
                    question: "Which of these is NOT a current trend in the tech industry?",
                    options: &[
                        "Artificial Intelligence",
                        "Blockchain",
                        "Floppy Disk Storage",
                        "Internet of Things",
                    ],
                    correct_answer: "Floppy Disk Storage",
                },
                exercise: Exercise {
                    instruction: "Research and summarize a recent development in an industry of your choice.",
                    hint: "Consider recent news in industries like healthcare, finance, or technology.",
                },
            },
        }
    }
}

impl fmt::Display for PreparationArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for PreparationArea {
    type Err = CasepathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PreparationArea::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CasepathError::UnknownArea(s.to_string()))
    }
}

// =============================================================================
// AREA CONTENT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quiz {
    pub question: &'static str,
    pub options: &'static [&'static str],
    pub correct_answer: &'static str,
}

impl Quiz {
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        answer.trim() == self.correct_answer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Exercise {
    pub instruction: &'static str,
    pub hint: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AreaContent {
    pub area: PreparationArea,
    pub title: &'static str,
    pub text: &'static str,
    pub quiz: Quiz,
    pub exercise: Exercise,
}

/// Result of answering a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub correct: bool,
    pub feedback: String,
    /// Percentage actually added to the area (0 on repeats or wrong answers).
    pub awarded: u8,
    pub area_percent: u8,
}

/// `part / whole` as a whole percentage, rounded half up. `whole` must be non-zero.
pub(crate) fn rounded_percent(part: u32, whole: u32) -> u8 {
    ((part * 200 + whole) / (whole * 2)).min(100) as u8
}

// =============================================================================
// PREPARATION PROGRESS
// =============================================================================

/// Preparation state for one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparationProgress {
    areas: BTreeMap<PreparationArea, u8>,
    quizzes_passed: BTreeSet<PreparationArea>,
    exercises_completed: BTreeSet<PreparationArea>,
}

impl PreparationProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage for one area, 0..=100.
    #[must_use]
    pub fn area_percent(&self, area: PreparationArea) -> u8 {
        self.areas
            .get(&area)
            .copied()
            .unwrap_or(0)
            .min(PREPARATION_AREA_MAX_PERCENT)
    }

    #[must_use]
    pub fn is_area_complete(&self, area: PreparationArea) -> bool {
        self.area_percent(area) >= PREPARATION_AREA_MAX_PERCENT
    }

    /// Add `increment` to an area, capped at 100. Returns the amount added.
    pub fn advance(&mut self, area: PreparationArea, increment: u8) -> u8 {
        let before = self.area_percent(area);
        let after = before
            .saturating_add(increment)
            .min(PREPARATION_AREA_MAX_PERCENT);
        self.areas.insert(area, after);
        after - before
    }

    /// Grade a quiz answer. Only the first correct answer per area counts.
    pub fn answer_quiz(&mut self, area: PreparationArea, answer: &str) -> QuizOutcome {
        let quiz = area.content().quiz;
        let correct = quiz.is_correct(answer);

        let awarded = if correct && self.quizzes_passed.insert(area) {
            self.advance(area, PREPARATION_STEP_PERCENT)
        } else {
            0
        };

        let feedback = if correct {
            "Correct! Well done.".to_string()
        } else {
            format!("Not quite. The correct answer is: {}", quiz.correct_answer)
        };

        QuizOutcome {
            correct,
            feedback,
            awarded,
            area_percent: self.area_percent(area),
        }
    }

    /// Mark an area's exercise done. Returns the amount added.
    pub fn complete_exercise(&mut self, area: PreparationArea) -> u8 {
        if self.exercises_completed.insert(area) {
            self.advance(area, PREPARATION_STEP_PERCENT)
        } else {
            0
        }
    }

    #[must_use]
    pub fn quiz_passed(&self, area: PreparationArea) -> bool {
        self.quizzes_passed.contains(&area)
    }

    #[must_use]
    pub fn exercise_completed(&self, area: PreparationArea) -> bool {
        self.exercises_completed.contains(&area)
    }

    /// Mean of all area percentages, rounded half up.
    #[must_use]
    pub fn overall_percent(&self) -> u8 {
        let sum: u32 = PreparationArea::ALL
            .iter()
            .map(|a| u32::from(self.area_percent(*a)))
            .sum();
        rounded_percent(sum, 100 * PreparationArea::ALL.len() as u32)
    }

    /// Every area at 100. Checked per area since the rounded mean reaches 100 early.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        PreparationArea::ALL
            .iter()
            .all(|area| self.is_area_complete(*area))
    }

    /// Label for the start button: "Start Case Interview" or "N% Prepared".
    #[must_use]
    pub fn start_label(&self) -> String {
        if self.is_ready() {
            "Start Case Interview".to_string()
        } else {
            format!("{}% Prepared", self.overall_percent())
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_wire_names_roundtrip() {
        for area in PreparationArea::ALL {
            assert_eq!(area.as_str().parse::<PreparationArea>().expect("parse"), area);
        }
        assert!("cooking".parse::<PreparationArea>().is_err());
    }

    #[test]
    fn correct_quiz_awards_once() {
        let mut progress = PreparationProgress::new();

        let first = progress.answer_quiz(PreparationArea::MentalMath, "12");
        assert!(first.correct);
        assert_eq!(first.awarded, 25);
        assert_eq!(first.feedback, "Correct! Well done.");

        let repeat = progress.answer_quiz(PreparationArea::MentalMath, "12");
        assert!(repeat.correct);
        assert_eq!(repeat.awarded, 0);
        assert_eq!(progress.area_percent(PreparationArea::MentalMath), 25);
    }

    #[test]
    fn wrong_quiz_reveals_answer() {
        let mut progress = PreparationProgress::new();
        let outcome = progress.answer_quiz(PreparationArea::Frameworks, "BCG Matrix");
        assert!(!outcome.correct);
        assert_eq!(outcome.awarded, 0);
        assert_eq!(
            outcome.feedback,
            "Not quite. The correct answer is: Porter's Five Forces"
        );
        assert!(!progress.quiz_passed(PreparationArea::Frameworks));
    }

    #[test]
    fn exercise_awards_once() {
        let mut progress = PreparationProgress::new();
        assert_eq!(progress.complete_exercise(PreparationArea::IndustryKnowledge), 25);
        assert_eq!(progress.complete_exercise(PreparationArea::IndustryKnowledge), 0);
        assert!(progress.exercise_completed(PreparationArea::IndustryKnowledge));
    }

    #[test]
    fn advance_caps_at_100() {
        let mut progress = PreparationProgress::new();
        assert_eq!(progress.advance(PreparationArea::Frameworks, 90), 90);
        assert_eq!(progress.advance(PreparationArea::Frameworks, 90), 10);
        assert_eq!(progress.area_percent(PreparationArea::Frameworks), 100);
        assert!(progress.is_area_complete(PreparationArea::Frameworks));
    }

    #[test]
    fn overall_is_mean_of_areas() {
        let mut progress = PreparationProgress::new();
        progress.advance(PreparationArea::Frameworks, 100);
        progress.advance(PreparationArea::MentalMath, 50);
        assert_eq!(progress.overall_percent(), 38);
        assert_eq!(progress.start_label(), "38% Prepared");
        assert!(!progress.is_ready());
    }

    #[test]
    fn rounded_mean_is_not_readiness() {
        let mut progress = PreparationProgress::new();
        for area in PreparationArea::ALL {
            progress.advance(area, 100);
        }
        let mut almost = PreparationProgress::new();
        almost.advance(PreparationArea::Frameworks, 99);
        for area in &PreparationArea::ALL[1..] {
            almost.advance(*area, 100);
        }
        assert_eq!(almost.overall_percent(), 100);
        assert!(!almost.is_ready());
        assert_eq!(almost.start_label(), "100% Prepared");
        assert!(progress.is_ready());
    }

    #[test]
    fn ready_when_every_area_full() {
        let mut progress = PreparationProgress::new();
        for area in PreparationArea::ALL {
            progress.advance(area, 100);
        }
        assert!(progress.is_ready());
        assert_eq!(progress.start_label(), "Start Case Interview");
    }

    #[test]
    fn every_quiz_lists_its_answer() {
        for area in PreparationArea::ALL {
            let quiz = area.content().quiz;
            assert!(quiz.options.contains(&quiz.correct_answer));
        }
    }
}
