use std::{path::Path, time::Instant};

use clap::{Parser, Subcommand};
use parcel_access_core::util::duration_ops::format_duration;
use serde::{Deserialize, Serialize};

use super::{run_scenarios, AccessError, ScenarioInputs};
use crate::{config::AccessConfig, engine::compass::CompassEngine, workspace::Workspace};

/// Command line tool computing parcel-level accessibility to destinations
/// over a set of road network scenarios
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct AccessApp {
    #[command(subcommand)]
    pub op: AccessOperation,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum AccessOperation {
    /// solve an OD cost matrix per scenario and join destination counts onto parcels
    Run {
        /// configuration file naming the workspace, input datasets and scenarios
        #[arg(short, long)]
        configuration_file: String,

        /// workspace directory, overriding the configured one
        #[arg(short, long)]
        workspace: Option<String>,

        /// run only the named scenarios. may be repeated. runs every
        /// configured scenario when omitted.
        #[arg(short, long)]
        scenario: Vec<String>,

        /// stop at the first failing scenario
        #[arg(long)]
        fail_fast: bool,
    },
    /// check a configuration file and print the resolved scenarios without running
    Validate {
        #[arg(short, long)]
        configuration_file: String,
    },
}

impl AccessOperation {
    pub fn run(&self) -> Result<(), AccessError> {
        match self {
            AccessOperation::Run {
                configuration_file,
                workspace,
                scenario,
                fail_fast,
            } => {
                let start = Instant::now();
                let result = run_configured(
                    configuration_file,
                    workspace.as_deref(),
                    scenario,
                    *fail_fast,
                );
                println!("{}", format_duration(start.elapsed().as_secs_f64()));
                result
            }
            AccessOperation::Validate { configuration_file } => {
                let config = AccessConfig::from_file(Path::new(configuration_file))?;
                let scenarios = config.validate()?;
                let workspace =
                    Workspace::new(Path::new(&config.workspace), config.overwrite_output);
                println!("workspace: {}", workspace.root.display());
                for (idx, s) in scenarios.iter().enumerate() {
                    let baseline = match config.baseline_scenario.as_deref() {
                        Some(b) if b == s.name => " (baseline)",
                        _ => "",
                    };
                    println!(
                        "{}. {}{baseline}\n   layer: {}\n   network dataset: {}",
                        idx + 1,
                        s.name,
                        s.layer_name(),
                        workspace.network_dataset_path(&s.network_dataset).display()
                    );
                }
                Ok(())
            }
        }
    }
}

fn run_configured(
    configuration_file: &str,
    workspace_override: Option<&str>,
    scenario_names: &[String],
    fail_fast: bool,
) -> Result<(), AccessError> {
    let config = load_configuration(configuration_file, workspace_override)?;
    let scenarios = config.validate()?.select(scenario_names)?;
    let fail_fast = fail_fast || config.fail_fast;
    let workspace = Workspace::new(Path::new(&config.workspace), config.overwrite_output);
    log::info!(
        "running {} scenarios in workspace {}",
        scenarios.len(),
        workspace.root.display()
    );

    let inputs = ScenarioInputs::read(&workspace, &config.inputs)?;
    let mut engine = CompassEngine::new();
    let report = run_scenarios(
        &mut engine,
        &config,
        &workspace,
        &inputs,
        &scenarios,
        fail_fast,
    )?;
    print!("{report}");

    let failed = report.failed().len() + report.skipped.len();
    if failed > 0 {
        return Err(AccessError::ScenariosFailed {
            failed,
            total: scenarios.len(),
        });
    }
    Ok(())
}

/// reads a configuration file, replacing its workspace when one is given on
/// the command line.
fn load_configuration(
    configuration_file: &str,
    workspace_override: Option<&str>,
) -> Result<AccessConfig, AccessError> {
    let mut config = AccessConfig::from_file(Path::new(configuration_file))?;
    if let Some(ws) = workspace_override {
        config.workspace = ws.to_string();
    }
    Ok(config)
}
