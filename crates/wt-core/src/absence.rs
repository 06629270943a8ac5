//! Absence rules crediting hours against the expected total.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A planned absence over a closed date interval.
///
/// A rule with no `end` covers a single day. A rule with no `hours` credits
/// the full configured workday for each covered day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsenceRule {
    /// First covered date.
    pub start: NaiveDate,
    /// Last covered date, inclusive. Defaults to `start` when absent.
    #[serde(default)]
    pub end: Option<NaiveDate>,
    /// Free-form label (vacation, public holiday, ...).
    #[serde(default)]
    pub reason: String,
    /// Credited hours per covered day; `None` means the full workday.
    #[serde(default)]
    pub hours: Option<f64>,
}

impl AbsenceRule {
    /// Last covered date, falling back to `start` for single-day rules.
    #[must_use]
    pub fn effective_end(&self) -> NaiveDate {
        self.end.unwrap_or(self.start)
    }

    /// Whether this rule covers the given date.
    #[must_use]
    pub fn includes(&self, target: NaiveDate) -> bool {
        self.start <= target && target <= self.effective_end()
    }

    /// Year bucket this rule is persisted under.
    #[must_use]
    pub fn bucket_year(&self) -> i32 {
        self.start.year()
    }
}

/// Sorts rules by `(start, effective end, reason)`, the persisted order.
pub fn sort_rules(rules: &mut [AbsenceRule]) {
    rules.sort_by(|a, b| {
        (a.start, a.effective_end(), &a.reason).cmp(&(b.start, b.effective_end(), &b.reason))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn single_day_rule_covers_only_its_start() {
        let rule = AbsenceRule {
            start: day(6),
            end: None,
            reason: "holiday".to_string(),
            hours: None,
        };
        assert!(rule.includes(day(6)));
        assert!(!rule.includes(day(5)));
        assert!(!rule.includes(day(7)));
    }

    #[test]
    fn range_rule_covers_both_endpoints() {
        let rule = AbsenceRule {
            start: day(6),
            end: Some(day(10)),
            reason: "vacation".to_string(),
            hours: None,
        };
        assert!(rule.includes(day(6)));
        assert!(rule.includes(day(8)));
        assert!(rule.includes(day(10)));
        assert!(!rule.includes(day(11)));
    }

    #[test]
    fn rules_sort_by_start_then_end_then_reason() {
        let mut rules = vec![
            AbsenceRule {
                start: day(10),
                end: None,
                reason: "b".to_string(),
                hours: None,
            },
            AbsenceRule {
                start: day(10),
                end: None,
                reason: "a".to_string(),
                hours: None,
            },
            AbsenceRule {
                start: day(2),
                end: Some(day(12)),
                reason: "c".to_string(),
                hours: Some(4.0),
            },
        ];
        sort_rules(&mut rules);
        assert_eq!(rules[0].reason, "c");
        assert_eq!(rules[1].reason, "a");
        assert_eq!(rules[2].reason, "b");
    }
}
