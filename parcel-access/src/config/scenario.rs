use std::collections::HashSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// a named analysis scenario bound to one network dataset. the name is used
/// as the prefix of every output the scenario writes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ScenarioConfig {
    pub name: String,
    /// path of the network dataset, relative to the workspace
    pub network_dataset: String,
}

impl ScenarioConfig {
    pub fn new(name: &str, network_dataset: &str) -> Self {
        Self {
            name: name.to_string(),
            network_dataset: network_dataset.to_string(),
        }
    }

    /// a scenario whose network dataset sits inside a feature dataset of the
    /// same name, at `<feature_dataset>/<feature_dataset>_ND`.
    pub fn from_feature_dataset(name: &str, feature_dataset: &str) -> Self {
        Self::new(name, &format!("{feature_dataset}/{feature_dataset}_ND"))
    }

    /// name of the scenario's OD cost matrix analysis layer
    pub fn layer_name(&self) -> String {
        self.output_name("network_matrix")
    }

    pub fn output_name(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.name)
    }
}

/// ordered, validated list of scenarios: non-empty with unique names.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioList(Vec<ScenarioConfig>);

impl ScenarioList {
    pub fn new(scenarios: Vec<ScenarioConfig>) -> Result<Self, ConfigError> {
        if scenarios.is_empty() {
            return Err(ConfigError::NoScenarios);
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for s in scenarios.iter() {
            if s.name.is_empty() {
                return Err(ConfigError::InvalidUserInput(String::from(
                    "scenario name cannot be empty",
                )));
            }
            if !seen.insert(s.name.as_str()) {
                return Err(ConfigError::DuplicateScenario(s.name.clone()));
            }
        }
        Ok(Self(scenarios))
    }

    /// pairs scenario names with feature dataset names by position. both lists
    /// must have the same length.
    pub fn from_parallel_lists(
        names: &[String],
        feature_datasets: &[String],
    ) -> Result<Self, ConfigError> {
        if names.len() != feature_datasets.len() {
            return Err(ConfigError::ScenarioLengthMismatch {
                names: names.len(),
                networks: feature_datasets.len(),
            });
        }
        let scenarios = names
            .iter()
            .zip(feature_datasets.iter())
            .map(|(name, fd)| ScenarioConfig::from_feature_dataset(name, fd))
            .collect_vec();
        Self::new(scenarios)
    }

    /// restrict to the named scenarios, keeping the configured order. an empty
    /// selection keeps every scenario.
    pub fn select(&self, names: &[String]) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        if let Some(unknown) = names.iter().find(|n| self.get(n).is_none()) {
            return Err(ConfigError::UnknownScenario(unknown.clone()));
        }
        let selected = self
            .0
            .iter()
            .filter(|s| names.contains(&s.name))
            .cloned()
            .collect_vec();
        Self::new(selected)
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioConfig> {
        self.0.iter().find(|s| s.name == name)
    }

    pub fn first(&self) -> Option<&ScenarioConfig> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScenarioConfig> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parallel_lists_pair_by_position() {
        let names = strings(&["Inequality_Full_Road_", "Inequality_Tier_0_"]);
        let fds = strings(&["MontgomeryCounty_LTS", "Tier_0_LTS"]);
        let list = ScenarioList::from_parallel_lists(&names, &fds).unwrap();
        let tier_0 = list.get("Inequality_Tier_0_").unwrap();
        assert_eq!(tier_0.network_dataset, "Tier_0_LTS/Tier_0_LTS_ND");
        assert_eq!(tier_0.layer_name(), "Inequality_Tier_0_network_matrix");
    }

    #[test]
    fn test_parallel_lists_of_different_length_fail() {
        let names = strings(&["Full_Road_", "Tier_0_", "Tier_1_"]);
        let fds = strings(&["Full_LTS", "Tier_0_LTS"]);
        let result = ScenarioList::from_parallel_lists(&names, &fds);
        assert!(matches!(
            result,
            Err(ConfigError::ScenarioLengthMismatch {
                names: 3,
                networks: 2
            })
        ));
    }

    #[test]
    fn test_duplicates_and_empty_rejected() {
        let dup = vec![
            ScenarioConfig::new("Tier_1_", "a"),
            ScenarioConfig::new("Tier_1_", "b"),
        ];
        assert!(matches!(
            ScenarioList::new(dup),
            Err(ConfigError::DuplicateScenario(n)) if n == "Tier_1_"
        ));
        assert!(matches!(ScenarioList::new(vec![]), Err(ConfigError::NoScenarios)));
    }

    #[test]
    fn test_select_preserves_configured_order() {
        let list = ScenarioList::new(vec![
            ScenarioConfig::new("A_", "a"),
            ScenarioConfig::new("B_", "b"),
            ScenarioConfig::new("C_", "c"),
        ])
        .unwrap();
        let selected = list.select(&strings(&["C_", "A_"])).unwrap();
        let names = selected.iter().map(|s| s.name.as_str()).collect_vec();
        assert_eq!(names, vec!["A_", "C_"]);
        assert!(matches!(
            list.select(&strings(&["D_"])),
            Err(ConfigError::UnknownScenario(_))
        ));
    }
}
