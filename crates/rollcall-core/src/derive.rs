//! Derived row state: remaining-lessons projection and severity tiers.
//!
//! Everything here is pure. Row state is always recomputed from scratch
//! from (base remaining, pending delta, debt); nothing is patched in place.

use serde::Serialize;

/// Rows with a projected balance below this are flagged `Warn`.
pub const WARN_THRESHOLD: i32 = 4;

/// Rows with a projected balance below this are flagged `Low`.
pub const CRITICAL_THRESHOLD: i32 = 2;

/// Placeholder shown when the server does not track remaining lessons.
pub const REMAINING_PLACEHOLDER: &str = "-";

/// Visual classification of a roster row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Normal,
    Warn,
    Low,
    /// Outstanding debt, overrides every other tier.
    Debt,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warn => "warn",
            Self::Low => "low",
            Self::Debt => "debt",
        }
    }
}

/// Projected balance after pending extra lessons, `None` if untracked.
pub fn resulting_remaining(base: Option<i32>, extra_lessons: i32) -> Option<i32> {
    base.map(|b| b - extra_lessons)
}

/// Severity tier for a projected balance and debt.
pub fn severity(resulting: Option<i32>, debt: Option<f64>) -> Severity {
    if debt.is_some_and(|d| d > 0.0) {
        return Severity::Debt;
    }
    match resulting {
        Some(r) if r < CRITICAL_THRESHOLD => Severity::Low,
        Some(r) if r < WARN_THRESHOLD => Severity::Warn,
        _ => Severity::Normal,
    }
}

/// Computed display state of one roster row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RowState {
    pub resulting: Option<i32>,
    pub severity: Severity,
    /// Shown iff the projected balance dropped below zero.
    pub negative_warning: bool,
}

impl RowState {
    pub fn compute(base: Option<i32>, extra_lessons: i32, debt: Option<f64>) -> Self {
        let resulting = resulting_remaining(base, extra_lessons);
        Self {
            resulting,
            severity: severity(resulting, debt),
            negative_warning: resulting.is_some_and(|r| r < 0),
        }
    }

    /// Projected balance as shown in the remaining column.
    pub fn remaining_display(&self) -> String {
        match self.resulting {
            Some(r) => r.to_string(),
            None => REMAINING_PLACEHOLDER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resulting_subtracts_delta() {
        assert_eq!(resulting_remaining(Some(5), 2), Some(3));
        assert_eq!(resulting_remaining(Some(1), 3), Some(-2));
        assert_eq!(resulting_remaining(Some(1), -2), Some(3));
        assert_eq!(resulting_remaining(None, 4), None);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(severity(Some(4), None), Severity::Normal);
        assert_eq!(severity(Some(3), None), Severity::Warn);
        assert_eq!(severity(Some(2), None), Severity::Warn);
        assert_eq!(severity(Some(1), None), Severity::Low);
        assert_eq!(severity(Some(-5), None), Severity::Low);
    }

    #[test]
    fn test_debt_overrides_all_tiers() {
        assert_eq!(severity(Some(10), Some(0.5)), Severity::Debt);
        assert_eq!(severity(Some(-1), Some(100.0)), Severity::Debt);
        assert_eq!(severity(None, Some(1.0)), Severity::Debt);
    }

    #[test]
    fn test_zero_or_missing_debt_is_ignored() {
        assert_eq!(severity(Some(1), Some(0.0)), Severity::Low);
        assert_eq!(severity(Some(1), Some(-3.0)), Severity::Low);
        assert_eq!(severity(None, None), Severity::Normal);
    }

    #[test]
    fn test_tier_matches_definition_over_grid() {
        for base in -3..8 {
            for delta in -3..6 {
                for debt in [None, Some(0.0), Some(2.5)] {
                    let state = RowState::compute(Some(base), delta, debt);
                    let resulting = base - delta;
                    assert_eq!(state.resulting, Some(resulting));
                    let expected = if debt.is_some_and(|d| d > 0.0) {
                        Severity::Debt
                    } else if resulting < 2 {
                        Severity::Low
                    } else if resulting < 4 {
                        Severity::Warn
                    } else {
                        Severity::Normal
                    };
                    assert_eq!(state.severity, expected);
                    assert_eq!(state.negative_warning, resulting < 0);
                    assert_eq!(state, RowState::compute(Some(base), delta, debt));
                }
            }
        }
    }

    #[test]
    fn test_negative_warning_independent_of_debt() {
        let state = RowState::compute(Some(0), 1, Some(10.0));
        assert_eq!(state.severity, Severity::Debt);
        assert!(state.negative_warning);
    }

    #[test]
    fn test_untracked_remaining_uses_placeholder() {
        let state = RowState::compute(None, 3, None);
        assert_eq!(state.remaining_display(), "-");
        assert!(!state.negative_warning);
        assert_eq!(state.severity, Severity::Normal);
        assert_eq!(RowState::compute(Some(3), 5, None).remaining_display(), "-2");
    }
}
