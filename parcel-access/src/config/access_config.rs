use std::path::Path;

use config::{Config, File, FileFormat};
use parcel_access_core::model::{
    spatial_join::MergeRule, CostCutoff, ImpedanceAttribute, OutputLines,
};
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use super::{ConfigError, ScenarioConfig, ScenarioList};

/// top-level configuration of an accessibility run.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AccessConfig {
    /// directory holding input datasets; outputs are written here too
    pub workspace: String,
    /// replace outputs of a previous run instead of failing
    #[serde(default = "default_overwrite_output")]
    pub overwrite_output: bool,
    /// licensed engine extension checked out for the duration of the run
    #[serde(default = "default_extension")]
    pub extension: String,
    /// stop at the first failing scenario
    #[serde(default)]
    pub fail_fast: bool,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub inputs: InputsConfig,
    #[serde(default)]
    pub outputs: OutputNamingConfig,
    #[serde(default)]
    pub join: JoinConfig,
    #[serde(default)]
    pub scenarios: Vec<ScenarioConfig>,
    /// legacy form: scenario names paired by position with `network_datasets`
    #[serde(default)]
    pub scenario_names: Vec<String>,
    /// legacy form: feature dataset names, each holding `<name>_ND`
    #[serde(default)]
    pub network_datasets: Vec<String>,
    /// scenario whose per-parcel value is joined onto every other scenario
    #[serde(default)]
    pub baseline_scenario: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub impedance_attribute: ImpedanceAttribute,
    /// solver cutoff, in impedance units
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
    /// post-solve line filter, in impedance units. defaults to the solver cutoff.
    #[serde(default)]
    pub line_filter_cutoff: Option<f64>,
    #[serde(default = "default_search_tolerance_meters")]
    pub search_tolerance_meters: f64,
    #[serde(default)]
    pub output_lines: OutputLines,
}

/// point and polygon datasets shared by every scenario.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct InputsConfig {
    pub origins: String,
    /// loaded onto the Destinations sublayer in this order
    pub destinations: Vec<String>,
    pub parcels: String,
}

/// suffixes appended to the scenario name to name each output.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OutputNamingConfig {
    #[serde(default = "default_lines_suffix")]
    pub lines_suffix: String,
    #[serde(default = "default_origins_suffix")]
    pub origins_suffix: String,
    #[serde(default = "default_frequency_suffix")]
    pub frequency_suffix: String,
    #[serde(default = "default_accessibility_suffix")]
    pub accessibility_suffix: String,
    /// also write a JSON summary per scenario
    #[serde(default = "default_write_summary")]
    pub write_summary: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct JoinConfig {
    #[serde(default)]
    pub merge_rule: MergeRule,
    /// name of the destination count field on the accessibility layer
    #[serde(default = "default_output_field")]
    pub output_field: String,
}

impl AccessConfig {
    /// reads a configuration file in any format the `config` crate recognizes
    /// by extension (TOML, JSON, YAML).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path))
            .build()
            .and_then(|c| c.try_deserialize::<AccessConfig>())
            .map_err(|e| ConfigError::ReadError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize::<AccessConfig>())
            .map_err(|e| ConfigError::InvalidUserInput(format!("failed reading TOML: {e}")))
    }

    /// checks every setting that can be checked without touching the
    /// workspace, returning the resolved scenario list.
    pub fn validate(&self) -> Result<ScenarioList, ConfigError> {
        let scenarios = self.scenarios()?;
        CostCutoff::new(self.analysis.cutoff)
            .map_err(|e| ConfigError::InvalidUserInput(format!("analysis.cutoff: {e}")))?;
        let line_filter = self.line_filter_cutoff()?;
        if line_filter.value() != self.analysis.cutoff {
            log::warn!(
                "line filter cutoff {} differs from solver cutoff {}; both are applied",
                line_filter.value(),
                self.analysis.cutoff
            );
        }
        let tolerance = self.analysis.search_tolerance_meters;
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err(ConfigError::InvalidUserInput(format!(
                "analysis.search_tolerance_meters must be non-negative, found {tolerance}"
            )));
        }
        if self.inputs.destinations.is_empty() {
            return Err(ConfigError::InvalidUserInput(String::from(
                "inputs.destinations must name at least one dataset",
            )));
        }
        if self.join.output_field.is_empty() {
            return Err(ConfigError::InvalidUserInput(String::from(
                "join.output_field cannot be empty",
            )));
        }
        if let Some(baseline) = &self.baseline_scenario {
            if scenarios.get(baseline).is_none() {
                return Err(ConfigError::UnknownScenario(baseline.clone()));
            }
        }
        Ok(scenarios)
    }

    /// resolves the scenario list from either the explicit `[[scenarios]]`
    /// pairs or the legacy parallel lists.
    pub fn scenarios(&self) -> Result<ScenarioList, ConfigError> {
        let has_pairs = !self.scenarios.is_empty();
        let has_lists = !self.scenario_names.is_empty() || !self.network_datasets.is_empty();
        match (has_pairs, has_lists) {
            (true, true) => Err(ConfigError::AmbiguousScenarios),
            (true, false) => ScenarioList::new(self.scenarios.clone()),
            (false, true) => {
                ScenarioList::from_parallel_lists(&self.scenario_names, &self.network_datasets)
            }
            (false, false) => Err(ConfigError::NoScenarios),
        }
    }

    /// the post-solve line filter. the solver already discards pairs beyond its
    /// cutoff, so a filter above the solver cutoff has no effect.
    pub fn line_filter_cutoff(&self) -> Result<CostCutoff, ConfigError> {
        let value = self.analysis.line_filter_cutoff.unwrap_or(self.analysis.cutoff);
        CostCutoff::new(value).map_err(|e| {
            ConfigError::InvalidUserInput(format!("analysis.line_filter_cutoff: {e}"))
        })
    }

    pub fn search_tolerance(&self) -> Length {
        Length::new::<uom::si::length::meter>(self.analysis.search_tolerance_meters)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            impedance_attribute: ImpedanceAttribute::default(),
            cutoff: default_cutoff(),
            line_filter_cutoff: None,
            search_tolerance_meters: default_search_tolerance_meters(),
            output_lines: OutputLines::default(),
        }
    }
}

impl Default for OutputNamingConfig {
    fn default() -> Self {
        Self {
            lines_suffix: default_lines_suffix(),
            origins_suffix: default_origins_suffix(),
            frequency_suffix: default_frequency_suffix(),
            accessibility_suffix: default_accessibility_suffix(),
            write_summary: default_write_summary(),
        }
    }
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            merge_rule: MergeRule::default(),
            output_field: default_output_field(),
        }
    }
}

fn default_overwrite_output() -> bool {
    true
}

fn default_extension() -> String {
    String::from("Network")
}

fn default_cutoff() -> f64 {
    2.0
}

fn default_search_tolerance_meters() -> f64 {
    1000.0
}

fn default_lines_suffix() -> String {
    String::from("lines_lt2mi")
}

fn default_origins_suffix() -> String {
    String::from("origins")
}

fn default_frequency_suffix() -> String {
    String::from("lt2mi_FREQUENCY")
}

fn default_accessibility_suffix() -> String {
    String::from("Accessibility")
}

fn default_write_summary() -> bool {
    true
}

fn default_output_field() -> String {
    String::from("FREQUENCY")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: &str = r#"
workspace = "data"

[inputs]
origins = "Parcel_Points"
destinations = ["Business", "RideOn", "WMATA", "Schools"]
parcels = "Parcels"

[[scenarios]]
name = "Full_Road_"
network_dataset = "Full/Full_ND"

[[scenarios]]
name = "Tier_0_"
network_dataset = "Tier_0/Tier_0_ND"
"#;

    #[test]
    fn test_defaults() {
        let conf = AccessConfig::from_toml_str(PAIRS).unwrap();
        assert!(conf.overwrite_output);
        assert_eq!(conf.extension, "Network");
        assert_eq!(conf.analysis.cutoff, 2.0);
        assert_eq!(conf.analysis.impedance_attribute, ImpedanceAttribute::Miles);
        assert_eq!(conf.analysis.output_lines, OutputLines::NoLines);
        assert_eq!(conf.outputs.lines_suffix, "lines_lt2mi");
        assert_eq!(conf.join.merge_rule, MergeRule::First);
        assert_eq!(conf.line_filter_cutoff().unwrap().value(), 2.0);
        let scenarios = conf.validate().unwrap();
        assert_eq!(scenarios.len(), 2);
    }

    #[test]
    fn test_legacy_lists_length_mismatch_fails_validation() {
        let toml = r#"
workspace = "data"
scenario_names = ["Full_Road_", "Tier_0_", "Tier_1_"]
network_datasets = ["Full", "Tier_0"]

[inputs]
origins = "Parcel_Points"
destinations = ["Business"]
parcels = "Parcels"
"#;
        let conf = AccessConfig::from_toml_str(toml).unwrap();
        assert!(matches!(
            conf.validate(),
            Err(ConfigError::ScenarioLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_both_scenario_forms_is_ambiguous() {
        let toml = format!("scenario_names = [\"X_\"]\nnetwork_datasets = [\"X\"]\n{PAIRS}");
        let conf = AccessConfig::from_toml_str(&toml).unwrap();
        assert!(matches!(
            conf.validate(),
            Err(ConfigError::AmbiguousScenarios)
        ));
    }

    #[test]
    fn test_baseline_may_be_any_configured_scenario() {
        let toml = format!("baseline_scenario = \"Tier_0_\"\n{PAIRS}");
        let conf = AccessConfig::from_toml_str(&toml).unwrap();
        assert!(conf.validate().is_ok());
        let toml = format!("baseline_scenario = \"Tier_9_\"\n{PAIRS}");
        let conf = AccessConfig::from_toml_str(&toml).unwrap();
        assert!(matches!(
            conf.validate(),
            Err(ConfigError::UnknownScenario(name)) if name == "Tier_9_"
        ));
    }

    #[test]
    fn test_line_filter_cutoff_defaults_to_solver_cutoff() {
        let mut conf = AccessConfig::from_toml_str(PAIRS).unwrap();
        assert_eq!(conf.line_filter_cutoff().unwrap().value(), 2.0);
        conf.analysis.line_filter_cutoff = Some(1.5);
        assert_eq!(conf.line_filter_cutoff().unwrap().value(), 1.5);
        assert!(conf.validate().is_ok());
        conf.analysis.line_filter_cutoff = Some(-1.0);
        assert!(matches!(
            conf.validate(),
            Err(ConfigError::InvalidUserInput(_))
        ));
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let mut conf = AccessConfig::from_toml_str(PAIRS).unwrap();
        conf.analysis.search_tolerance_meters = -5.0;
        assert!(matches!(
            conf.validate(),
            Err(ConfigError::InvalidUserInput(_))
        ));
    }

    #[test]
    fn test_bundled_configurations_agree() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../configuration");
        let pairs = AccessConfig::from_file(&dir.join("montgomery_county.toml")).unwrap();
        let legacy =
            AccessConfig::from_file(&dir.join("montgomery_county_legacy.toml")).unwrap();
        let pairs = pairs.validate().unwrap();
        let legacy = legacy.validate().unwrap();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs, legacy);
        assert_eq!(
            pairs.get("Inequality_Tier_2_").map(|s| s.network_dataset.as_str()),
            Some("Tier_2_LTS/Tier_2_LTS_ND")
        );
    }
}
