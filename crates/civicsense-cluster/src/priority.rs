//! Keyword-based urgency tiers for listing and filtering reports.

use std::collections::HashSet;

use civicsense_core::{Error, Report, Result, VocabularyConfig};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::similarity::tokenize;

static DEFAULT_KEYWORDS: Lazy<PriorityKeywords> = Lazy::new(PriorityKeywords::default);

const DEFAULT_HIGH: &[&str] = &[
    "fallen",
    "tree",
    "fire",
    "accident",
    "collapse",
    "collapsed",
    "electrocution",
    "sparking",
    "explosion",
    "gas",
    "emergency",
    "danger",
    "dangerous",
    "injured",
    "injury",
    "flood",
    "flooding",
];

const DEFAULT_MEDIUM: &[&str] = &[
    "pothole",
    "potholes",
    "leak",
    "leaking",
    "broken",
    "damaged",
    "damage",
    "garbage",
    "overflow",
    "overflowing",
    "sewage",
    "drainage",
    "streetlight",
    "outage",
    "blocked",
    "waterlogging",
];

/// Coarse urgency of a report: 1 is the most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PriorityTier {
    High = 1,
    Medium = 2,
    Low = 3,
}

impl PriorityTier {
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::High),
            2 => Some(Self::Medium),
            3 => Some(Self::Low),
            _ => None,
        }
    }

    /// Human-readable label shown next to the tier number.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Accepts a label ("high") or a level ("1").
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        match value.as_str() {
            "high" | "1" => Some(Self::High),
            "medium" | "2" => Some(Self::Medium),
            "low" | "3" => Some(Self::Low),
            _ => None,
        }
    }
}

impl From<PriorityTier> for u8 {
    fn from(tier: PriorityTier) -> u8 {
        tier.level()
    }
}

impl TryFrom<u8> for PriorityTier {
    type Error = String;

    fn try_from(level: u8) -> std::result::Result<Self, Self::Error> {
        Self::from_level(level).ok_or_else(|| format!("invalid priority level: {}", level))
    }
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// High and medium vocabularies. Anything matching neither is low.
///
/// Unlike department routing, a keyword must equal a whole token.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityKeywords {
    high: HashSet<String>,
    medium: HashSet<String>,
}

/// A report paired with its computed tier.
#[derive(Debug, Clone, Serialize)]
pub struct RankedReport<'a> {
    pub report: &'a Report,
    pub priority: PriorityTier,
    pub label: &'static str,
}

impl PriorityKeywords {
    pub fn new<I, J, S, T>(high: I, medium: J) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Ok(Self {
            high: normalize("high", high)?,
            medium: normalize("medium", medium)?,
        })
    }

    /// Use configured overrides where present, built-in lists otherwise.
    pub fn from_config(vocabulary: &VocabularyConfig) -> Result<Self> {
        let defaults = Self::default();
        let high = match &vocabulary.priority_high {
            Some(words) => normalize("high", words)?,
            None => defaults.high,
        };
        let medium = match &vocabulary.priority_medium {
            Some(words) => normalize("medium", words)?,
            None => defaults.medium,
        };
        Ok(Self { high, medium })
    }

    pub fn score(&self, description: Option<&str>) -> PriorityTier {
        let tokens = tokenize(description);
        if tokens.iter().any(|t| self.high.contains(t)) {
            PriorityTier::High
        } else if tokens.iter().any(|t| self.medium.contains(t)) {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }

    /// Every report with its tier, most urgent first.
    ///
    /// The sort is stable, so reports keep their input order within a tier.
    pub fn rank<'a>(&self, reports: &'a [Report]) -> Vec<RankedReport<'a>> {
        let mut ranked: Vec<RankedReport<'a>> = reports
            .iter()
            .map(|report| {
                let priority = self.score(report.description());
                RankedReport {
                    report,
                    priority,
                    label: priority.label(),
                }
            })
            .collect();
        ranked.sort_by_key(|r| r.priority);
        ranked
    }

    /// Reports whose tier equals `tier`, in input order.
    pub fn filter<'a>(&self, reports: &'a [Report], tier: PriorityTier) -> Vec<&'a Report> {
        reports
            .iter()
            .filter(|r| self.score(r.description()) == tier)
            .collect()
    }
}

impl Default for PriorityKeywords {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH.iter().map(|w| w.to_string()).collect(),
            medium: DEFAULT_MEDIUM.iter().map(|w| w.to_string()).collect(),
        }
    }
}

fn normalize<I, S>(tier: &str, words: I) -> Result<HashSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = HashSet::new();
    for word in words {
        let word = word.as_ref().trim().to_lowercase();
        if word.is_empty() {
            return Err(Error::Config(format!("empty {} priority keyword", tier)));
        }
        // Keywords are compared against single tokens.
        if tokenize(Some(word.as_str())).len() != 1 {
            return Err(Error::Config(format!(
                "{} priority keyword must be a single word: {}",
                tier, word
            )));
        }
        set.insert(word);
    }
    Ok(set)
}

/// Score a description with the built-in vocabulary.
pub fn score(description: Option<&str>) -> PriorityTier {
    DEFAULT_KEYWORDS.score(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_fallen_tree_is_high() {
        assert_eq!(score(Some("fallen tree blocking road")), PriorityTier::High);
        assert_eq!(score(Some("fallen tree blocking road")).level(), 1);
    }

    #[test]
    fn test_minor_graffiti_is_low() {
        assert_eq!(score(Some("minor graffiti")), PriorityTier::Low);
        assert_eq!(score(Some("random unrelated text")), PriorityTier::Low);
        assert_eq!(score(Some("")), PriorityTier::Low);
        assert_eq!(score(None), PriorityTier::Low);
    }

    #[test]
    fn test_medium() {
        assert_eq!(score(Some("Big pothole near the school")), PriorityTier::Medium);
    }

    #[test]
    fn test_high_beats_medium() {
        assert_eq!(score(Some("broken pipe caused flooding")), PriorityTier::High);
    }

    #[test]
    fn test_exact_token_match_only() {
        // "trees" and "firefly" are not exact tokens of the high set.
        assert_eq!(score(Some("trees and a firefly")), PriorityTier::Low);
    }

    #[test]
    fn test_labels_and_levels() {
        assert_eq!(PriorityTier::High.label(), "High");
        assert_eq!(PriorityTier::Medium.label(), "Medium");
        assert_eq!(PriorityTier::Low.label(), "Low");
        assert_eq!(PriorityTier::from_level(2), Some(PriorityTier::Medium));
        assert_eq!(PriorityTier::from_level(4), None);
        assert_eq!(PriorityTier::parse("LOW"), Some(PriorityTier::Low));
        assert_eq!(PriorityTier::parse("1"), Some(PriorityTier::High));
        assert_eq!(serde_json::to_string(&PriorityTier::Medium).unwrap(), "2");
    }

    #[test]
    fn test_rank_orders_by_tier_and_keeps_input_order() {
        let now = Utc::now();
        let reports = vec![
            Report::new("a", "minor graffiti", now),
            Report::new("b", "pothole on 3rd street", now),
            Report::new("c", "gas smell near market", now),
            Report::new("d", "garbage not collected", now),
        ];
        let ranked = PriorityKeywords::default().rank(&reports);
        let order: Vec<&str> = ranked.iter().map(|r| r.report.id.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "d", "a"]);
        assert_eq!(ranked[0].label, "High");
    }

    #[test]
    fn test_filter_by_tier() {
        let now = Utc::now();
        let reports = vec![
            Report::new("a", "leak in main pipe", now),
            Report::new("b", "graffiti on wall", now),
            Report::new("c", "sewage overflow", now),
        ];
        let keywords = PriorityKeywords::default();
        let medium = keywords.filter(&reports, PriorityTier::Medium);
        let ids: Vec<&str> = medium.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(keywords.filter(&reports, PriorityTier::High).is_empty());
    }

    #[test]
    fn test_custom_vocabulary() {
        let keywords = PriorityKeywords::new(["Sinkhole"], ["graffiti"]).unwrap();
        assert_eq!(keywords.score(Some("sinkhole opened")), PriorityTier::High);
        assert_eq!(keywords.score(Some("minor graffiti")), PriorityTier::Medium);
        assert_eq!(keywords.score(Some("fallen tree")), PriorityTier::Low);
    }

    #[test]
    fn test_invalid_keywords_rejected() {
        assert!(PriorityKeywords::new([""], ["leak"]).is_err());
        assert!(PriorityKeywords::new(["live wire"], ["leak"]).is_err());
    }

    #[test]
    fn test_from_config_partial_override() {
        let vocabulary = VocabularyConfig {
            priority_medium: Some(vec!["graffiti".into()]),
            ..Default::default()
        };
        let keywords = PriorityKeywords::from_config(&vocabulary).unwrap();
        assert_eq!(keywords.score(Some("fallen tree")), PriorityTier::High);
        assert_eq!(keywords.score(Some("minor graffiti")), PriorityTier::Medium);
        assert_eq!(keywords.score(Some("pothole")), PriorityTier::Low);
    }
}
