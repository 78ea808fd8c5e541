//! # Journey Primitives
//!
//! Hardcoded runtime constants for the Casepath CORE.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! Anything a deployment may want to tune (practice-target count, tip seed)
//! lives in the app configuration and is passed in explicitly.

/// Magic bytes for the Casepath binary format header.
///
/// - File Header = Magic Bytes ("CASE") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"CASE";

/// Current serialization format version.
///
/// Increment this when making breaking changes to the serialization format.
pub const FORMAT_VERSION: u8 = 2;

/// Highest score a skill can receive.
pub const MAX_SKILL_SCORE: u8 = 100;

/// Percentage awarded per completed preparation activity.
///
/// Quizzes and exercises each award this once per area.
pub const PREPARATION_STEP_PERCENT: u8 = 25;

/// Completion ceiling for a single preparation area.
pub const PREPARATION_AREA_MAX_PERCENT: u8 = 100;

/// Number of lowest-scoring skills surfaced by the focused-improvement view.
pub const DEFAULT_PRACTICE_TARGETS: usize = 3;

/// Number of practice recommendations shown for a completed stage.
pub const COMPLETED_STAGE_RECOMMENDATIONS: usize = 2;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for a session identifier.
pub const MAX_SESSION_ID_LENGTH: usize = 128;

/// Maximum length for grader feedback text (16KB).
pub const MAX_FEEDBACK_LENGTH: usize = 16 * 1024;

/// Maximum number of improvement-area notes attached to a result.
pub const MAX_IMPROVEMENT_AREAS: usize = 32;

/// Maximum length of a single improvement-area note.
pub const MAX_IMPROVEMENT_AREA_LENGTH: usize = 512;

/// Maximum number of results a single ledger may hold.
///
/// Retakes append new entries, so this bounds a session that keeps failing.
pub const MAX_LEDGER_ENTRIES: usize = 1000;

/// Maximum number of practice targets a caller may request.
pub const MAX_PRACTICE_TARGETS: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_correct() {
        assert_eq!(MAGIC_BYTES, b"CASE");
    }

    #[test]
    fn four_steps_fill_an_area() {
        assert_eq!(
            u16::from(PREPARATION_STEP_PERCENT) * 4,
            u16::from(PREPARATION_AREA_MAX_PERCENT)
        );
    }
}
