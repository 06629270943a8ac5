//! Retrieval capabilities decoupling the summary engine from storage.

use chrono::NaiveDate;

use crate::absence::AbsenceRule;
use crate::config::TrackerConfig;
use crate::entry::Entry;

/// Source of the entries belonging to a day.
pub trait EntryRetriever {
    fn entries_for_day(&self, day: NaiveDate) -> Vec<Entry>;
}

/// Source of the absence rules covering a day.
pub trait AbsenceRetriever {
    fn absences_for_day(&self, day: NaiveDate) -> Vec<AbsenceRule>;
}

/// Absence retriever reading directly from a [`TrackerConfig`].
#[derive(Debug, Clone, Copy)]
pub struct ConfigAbsences<'a> {
    config: &'a TrackerConfig,
}

impl<'a> ConfigAbsences<'a> {
    #[must_use]
    pub const fn new(config: &'a TrackerConfig) -> Self {
        Self { config }
    }
}

impl AbsenceRetriever for ConfigAbsences<'_> {
    fn absences_for_day(&self, day: NaiveDate) -> Vec<AbsenceRule> {
        self.config
            .absences
            .iter()
            .filter(|rule| rule.includes(day))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_absences_filters_by_date() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let other = NaiveDate::from_ymd_opt(2025, 2, 6).unwrap();
        let config = TrackerConfig {
            absences: vec![
                AbsenceRule {
                    start: day,
                    end: None,
                    reason: "covered".to_string(),
                    hours: None,
                },
                AbsenceRule {
                    start: other,
                    end: None,
                    reason: "elsewhere".to_string(),
                    hours: None,
                },
            ],
            ..TrackerConfig::default()
        };
        let retriever = ConfigAbsences::new(&config);
        let rules = retriever.absences_for_day(day);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].reason, "covered");
        assert!(retriever
            .absences_for_day(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
            .is_empty());
    }
}
