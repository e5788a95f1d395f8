//! Keyword-based department routing.

use std::collections::BTreeMap;

use civicsense_core::{Department, Error, Result, VocabularyConfig};
use once_cell::sync::Lazy;
use serde::Serialize;

/// Department chosen when no keyword matches.
pub const FALLBACK_DEPARTMENT: Department = Department::Roads;

static DEFAULT_KEYWORDS: Lazy<DepartmentKeywords> = Lazy::new(DepartmentKeywords::default);

/// Per-department keyword lists, checked in table order.
///
/// Matching is plain substring containment on the lower-cased description,
/// so "streetlight" counts for both `street` (roads) and `light`
/// (electricity).
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentKeywords {
    table: Vec<(Department, Vec<String>)>,
}

/// Keyword hit count for one department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DepartmentScore {
    pub department: Department,
    pub matches: usize,
}

impl DepartmentKeywords {
    /// Build a table from explicit entries. Earlier entries win ties.
    pub fn new(table: Vec<(Department, Vec<String>)>) -> Result<Self> {
        if table.is_empty() {
            return Err(Error::Config("department keyword table is empty".into()));
        }
        let mut normalized = Vec::with_capacity(table.len());
        for (department, words) in table {
            if normalized.iter().any(|(d, _)| *d == department) {
                return Err(Error::Config(format!(
                    "department {} listed more than once",
                    department
                )));
            }
            let mut keywords = Vec::with_capacity(words.len());
            for word in words {
                let word = word.trim().to_lowercase();
                if word.is_empty() {
                    return Err(Error::Config(format!(
                        "empty keyword for department {}",
                        department
                    )));
                }
                keywords.push(word);
            }
            normalized.push((department, keywords));
        }
        Ok(Self { table: normalized })
    }

    /// Build a table from a map; entries are taken in department order.
    pub fn from_map(map: &BTreeMap<Department, Vec<String>>) -> Result<Self> {
        Self::new(map.iter().map(|(d, w)| (*d, w.clone())).collect())
    }

    /// Use the configured override if present, the built-in table otherwise.
    pub fn from_config(vocabulary: &VocabularyConfig) -> Result<Self> {
        match &vocabulary.departments {
            Some(map) => Self::from_map(map),
            None => Ok(Self::default()),
        }
    }

    pub fn keywords(&self, department: Department) -> &[String] {
        self.table
            .iter()
            .find(|(d, _)| *d == department)
            .map(|(_, words)| words.as_slice())
            .unwrap_or(&[])
    }

    /// Keyword hit counts for every department, in table order.
    pub fn score_all(&self, description: Option<&str>) -> Vec<DepartmentScore> {
        let lower = description.unwrap_or("").to_lowercase();
        self.table
            .iter()
            .map(|(department, words)| DepartmentScore {
                department: *department,
                matches: words.iter().filter(|w| lower.contains(w.as_str())).count(),
            })
            .collect()
    }

    /// The department with the most keyword hits; ties keep the earlier one.
    pub fn recommend(&self, description: Option<&str>) -> Department {
        let mut best = FALLBACK_DEPARTMENT;
        let mut best_matches = 0;
        for score in self.score_all(description) {
            if score.matches > best_matches {
                best_matches = score.matches;
                best = score.department;
            }
        }
        best
    }
}

impl Default for DepartmentKeywords {
    fn default() -> Self {
        let table = [
            (
                Department::Roads,
                &["road", "pothole", "street", "footpath", "traffic", "bridge", "construction"][..],
            ),
            (
                Department::Water,
                &["water", "pipe", "leak", "drainage", "sewage", "flood"][..],
            ),
            (
                Department::Waste,
                &["garbage", "waste", "trash", "dump", "cleaning", "sanitation"][..],
            ),
            (
                Department::Electricity,
                &["light", "electricity", "power", "streetlight", "electric", "wire"][..],
            ),
            (
                Department::Parks,
                &["park", "garden", "tree", "playground", "grass", "recreation"][..],
            ),
        ];
        Self {
            table: table
                .iter()
                .map(|(d, words)| (*d, words.iter().map(|w| w.to_string()).collect()))
                .collect(),
        }
    }
}

/// Recommend a department using the built-in keyword table.
pub fn recommend(description: Option<&str>) -> Department {
    DEFAULT_KEYWORDS.recommend(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_roads() {
        assert_eq!(recommend(Some("pothole on main road")), Department::Roads);
    }

    #[test]
    fn test_recommend_waste() {
        assert_eq!(recommend(Some("garbage overflow")), Department::Waste);
    }

    #[test]
    fn test_recommend_empty_defaults_to_roads() {
        assert_eq!(recommend(Some("")), Department::Roads);
        assert_eq!(recommend(None), Department::Roads);
        assert_eq!(recommend(Some("nothing relevant here")), Department::Roads);
    }

    #[test]
    fn test_substring_matching() {
        // "leaking" contains "leak", "pipeline" contains "pipe".
        assert_eq!(recommend(Some("LEAKING pipeline")), Department::Water);
    }

    #[test]
    fn test_tie_keeps_earlier_department() {
        // One roads hit ("road") and one parks hit ("tree").
        assert_eq!(recommend(Some("tree on road")), Department::Roads);
    }

    #[test]
    fn test_streetlight_counts_for_electricity() {
        // roads: street (1); electricity: light, streetlight (2).
        assert_eq!(recommend(Some("streetlight broken")), Department::Electricity);
    }

    #[test]
    fn test_score_all_counts() {
        let scores = DepartmentKeywords::default().score_all(Some("garbage dump and trash"));
        let waste = scores
            .iter()
            .find(|s| s.department == Department::Waste)
            .unwrap();
        assert_eq!(waste.matches, 3);
        assert_eq!(scores.len(), 5);
        assert_eq!(scores[0].department, Department::Roads);
    }

    #[test]
    fn test_custom_vocabulary() {
        let table = DepartmentKeywords::new(vec![
            (Department::Parks, vec!["Bench".into()]),
            (Department::Water, vec!["tap".into()]),
        ])
        .unwrap();
        assert_eq!(table.recommend(Some("broken bench")), Department::Parks);
        assert_eq!(table.recommend(Some("dry tap")), Department::Water);
        assert_eq!(table.recommend(Some("pothole")), Department::Roads);
        assert_eq!(table.keywords(Department::Parks), ["bench".to_string()]);
        assert!(table.keywords(Department::Roads).is_empty());
    }

    #[test]
    fn test_invalid_tables_rejected() {
        assert!(DepartmentKeywords::new(vec![]).is_err());
        assert!(DepartmentKeywords::new(vec![(Department::Roads, vec!["  ".into()])]).is_err());
        assert!(DepartmentKeywords::new(vec![
            (Department::Roads, vec!["road".into()]),
            (Department::Roads, vec!["street".into()]),
        ])
        .is_err());
    }

    #[test]
    fn test_from_config_falls_back_to_default() {
        let table = DepartmentKeywords::from_config(&VocabularyConfig::default()).unwrap();
        assert_eq!(table, DepartmentKeywords::default());

        let mut map = BTreeMap::new();
        map.insert(Department::Electricity, vec!["transformer".to_string()]);
        let vocabulary = VocabularyConfig {
            departments: Some(map),
            ..Default::default()
        };
        let table = DepartmentKeywords::from_config(&vocabulary).unwrap();
        assert_eq!(table.recommend(Some("transformer sparking")), Department::Electricity);
    }
}
