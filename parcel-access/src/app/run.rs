use std::{collections::HashMap, path::PathBuf, time::Instant};

use parcel_access_core::model::{
    join_field,
    spatial_join::{join_baseline, spatial_join, AccessibilityRecord, PolygonFeature},
    CostCutoff, FrequencyTable, ModelError, NaClass, OdCostMatrixSettings, PointLayer,
};

use super::{
    output_features, AccessError, PipelineStep, RunReport, ScenarioOutcome, ScenarioOutputs,
    ScenarioSummary,
};
use crate::{
    config::{AccessConfig, InputsConfig, ScenarioConfig, ScenarioList},
    engine::{AnalysisEngine, EngineError, EngineSession},
    workspace::{Workspace, WorkspaceError},
};

/// the point and polygon datasets every scenario analyzes. read once per run.
#[derive(Clone, Debug)]
pub struct ScenarioInputs {
    pub origins: PointLayer,
    /// loaded onto the Destinations sublayer in this order
    pub destinations: Vec<PointLayer>,
    pub parcels: Vec<PolygonFeature>,
}

impl ScenarioInputs {
    pub fn read(workspace: &Workspace, inputs: &InputsConfig) -> Result<Self, WorkspaceError> {
        let origins = workspace.read_point_layer(&inputs.origins)?;
        let destinations = inputs
            .destinations
            .iter()
            .map(|name| workspace.read_point_layer(name))
            .collect::<Result<Vec<_>, _>>()?;
        let parcels = workspace.read_polygon_layer(&inputs.parcels)?;
        log::info!(
            "read {} origins, {} destinations from {} datasets and {} parcels",
            origins.len(),
            destinations.iter().map(|d| d.len()).sum::<usize>(),
            destinations.len(),
            parcels.len()
        );
        Ok(Self {
            origins,
            destinations,
            parcels,
        })
    }
}

struct CompletedScenario {
    outputs: ScenarioOutputs,
    summary: ScenarioSummary,
    records: Vec<AccessibilityRecord>,
}

/// runs every scenario against one engine session. each scenario is isolated:
/// a failure is recorded in the report and the next scenario starts, unless
/// `fail_fast` is set, in which case the remaining scenarios are skipped.
/// once all scenarios have run, the baseline scenario's per-parcel value is
/// joined onto every other completed accessibility layer.
///
/// # Arguments
///
/// * `engine`    - analysis engine; its extension is held for the whole run
/// * `config`    - validated run configuration
/// * `workspace` - where outputs are written
/// * `inputs`    - datasets shared by every scenario
/// * `scenarios` - scenarios to run, in order
/// * `fail_fast` - stop at the first failing scenario
///
/// # Returns
///
/// the outcome of each scenario, or an error if the run could not start
pub fn run_scenarios<E: AnalysisEngine + ?Sized>(
    engine: &mut E,
    config: &AccessConfig,
    workspace: &Workspace,
    inputs: &ScenarioInputs,
    scenarios: &ScenarioList,
    fail_fast: bool,
) -> Result<RunReport, AccessError> {
    let line_filter = config.line_filter_cutoff()?;
    if let Some(baseline) = missing_baseline(config, scenarios) {
        log::warn!("baseline scenario '{baseline}' is not selected; {baseline}dest is omitted");
    }
    let mut session =
        EngineSession::open(engine, &config.extension).map_err(AccessError::Session)?;

    let mut report = RunReport::default();
    let mut records: HashMap<String, Vec<AccessibilityRecord>> = HashMap::new();
    let mut remaining = scenarios.iter();
    for scenario in remaining.by_ref() {
        log::info!(
            "running scenario '{}' on network dataset {}",
            scenario.name,
            scenario.network_dataset
        );
        let result = run_scenario(
            &mut *session,
            config,
            workspace,
            inputs,
            scenario,
            &line_filter,
        );
        match result {
            Ok(completed) => {
                progress(&format!("{} Network Analysis complete.", scenario.name));
                records.insert(scenario.name.clone(), completed.records);
                report.outcomes.push(ScenarioOutcome::Completed {
                    scenario: scenario.name.clone(),
                    outputs: completed.outputs,
                    summary: Box::new(completed.summary),
                });
            }
            Err(error) => {
                println!("{error}");
                log::error!("{error}");
                report.outcomes.push(ScenarioOutcome::Failed {
                    scenario: scenario.name.clone(),
                    error,
                });
                if fail_fast {
                    break;
                }
            }
        }
    }
    report.skipped = remaining.map(|s| s.name.clone()).collect();
    if !report.skipped.is_empty() {
        log::warn!(
            "fail-fast set, skipping {} remaining scenarios",
            report.skipped.len()
        );
    }
    drop(session);

    if let Some(baseline) = config.baseline_scenario.as_deref() {
        join_baseline_outputs(config, workspace, &mut report, records, baseline);
    }
    Ok(report)
}

/// the configured baseline scenario when the scenarios selected for a run
/// leave it out.
pub fn missing_baseline<'a>(
    config: &'a AccessConfig,
    scenarios: &ScenarioList,
) -> Option<&'a str> {
    config
        .baseline_scenario
        .as_deref()
        .filter(|baseline| scenarios.get(baseline).is_none())
}

/// joins the baseline's per-parcel value onto the accessibility layer of every
/// other completed scenario and rewrites that layer and its summary. a scenario
/// whose rewrite fails is reported as failed.
fn join_baseline_outputs(
    config: &AccessConfig,
    workspace: &Workspace,
    report: &mut RunReport,
    mut records: HashMap<String, Vec<AccessibilityRecord>>,
    baseline: &str,
) {
    let field_name = format!("{baseline}dest");
    let Some(baseline_records) = records.remove(baseline) else {
        if report.get(baseline).is_some() {
            log::warn!("baseline scenario '{baseline}' failed; no {field_name} field is joined");
        }
        return;
    };
    for outcome in report.outcomes.iter_mut() {
        let failure = match outcome {
            ScenarioOutcome::Completed {
                scenario,
                outputs,
                summary,
            } => match records.get_mut(scenario.as_str()) {
                Some(scenario_records) => {
                    join_baseline(scenario_records, &baseline_records, &field_name);
                    summary.baseline_field = Some(field_name.clone());
                    rewrite_with_baseline(
                        config,
                        workspace,
                        scenario,
                        outputs,
                        &**summary,
                        scenario_records,
                    )
                    .err()
                    .map(|error| (scenario.clone(), error))
                }
                None => None,
            },
            ScenarioOutcome::Failed { .. } => None,
        };
        if let Some((scenario, error)) = failure {
            println!("{error}");
            log::error!("{error}");
            *outcome = ScenarioOutcome::Failed { scenario, error };
        }
    }
    progress(&format!("Baseline {field_name} joined."));
}

fn rewrite_with_baseline(
    config: &AccessConfig,
    workspace: &Workspace,
    scenario: &str,
    outputs: &ScenarioOutputs,
    summary: &ScenarioSummary,
    records: &[AccessibilityRecord],
) -> Result<(), AccessError> {
    let rewrite_error = move |step: PipelineStep| {
        move |source: WorkspaceError| AccessError::Output {
            scenario: scenario.to_string(),
            step,
            source,
        }
    };
    workspace
        .rewrite_feature_class(
            &outputs.accessibility,
            output_features::accessibility_features(records, &config.join.output_field),
        )
        .map_err(rewrite_error(PipelineStep::WriteAccessibility))?;
    if let Some(path) = &outputs.summary {
        workspace
            .rewrite_summary(path, summary)
            .map_err(rewrite_error(PipelineStep::WriteSummary))?;
    }
    Ok(())
}

fn run_scenario<E: AnalysisEngine + ?Sized>(
    engine: &mut E,
    config: &AccessConfig,
    workspace: &Workspace,
    inputs: &ScenarioInputs,
    scenario: &ScenarioConfig,
    line_filter: &CostCutoff,
) -> Result<CompletedScenario, AccessError> {
    let start = Instant::now();
    let impedance = config.analysis.impedance_attribute;
    let naming = &config.outputs;
    let tolerance = config.search_tolerance();

    let settings = OdCostMatrixSettings {
        layer_name: scenario.layer_name(),
        network_dataset: workspace.network_dataset_path(&scenario.network_dataset),
        cutoff: config.analysis.cutoff,
        impedance,
        output_lines: config.analysis.output_lines,
    };
    let network_dataset = settings.network_dataset.clone();
    let mut layer = engine
        .make_od_cost_matrix_layer(settings)
        .map_err(engine_error(scenario, PipelineStep::MakeLayer))?;
    progress(&format!("OD Cost Matrix Layer created: {}.", layer.name()));

    let origins = engine
        .add_locations(&mut layer, NaClass::Origins, &inputs.origins, tolerance)
        .map_err(engine_error(scenario, PipelineStep::AddOrigins))?;
    if origins.located == 0 {
        return Err(AccessError::EmptyResult {
            scenario: scenario.name.clone(),
            step: PipelineStep::AddOrigins,
            message: format!(
                "none of the {} features of '{}' were located on the network",
                origins.added, origins.source_name
            ),
        });
    }
    progress("Origins added.");

    let mut destinations = Vec::with_capacity(inputs.destinations.len());
    for points in inputs.destinations.iter() {
        let summary = engine
            .add_locations(&mut layer, NaClass::Destinations, points, tolerance)
            .map_err(engine_error(scenario, PipelineStep::AddDestinations))?;
        destinations.push(summary);
    }
    if destinations.iter().all(|d| d.located == 0) {
        return Err(AccessError::EmptyResult {
            scenario: scenario.name.clone(),
            step: PipelineStep::AddDestinations,
            message: String::from("no destination features were located on the network"),
        });
    }
    progress("Destinations added.");

    let solve = engine
        .solve(&mut layer)
        .map_err(engine_error(scenario, PipelineStep::Solve))?;
    progress("OD Cost Matrix solved.");

    let solved = layer
        .lines()
        .map_err(model_error(scenario, PipelineStep::FilterLines))?;
    let lines = line_filter.select(solved);
    log::info!(
        "{} of {} lines within cutoff {line_filter} {impedance}",
        lines.len(),
        solved.len()
    );
    let lines_path = workspace
        .write_feature_class(
            &scenario.output_name(&naming.lines_suffix),
            output_features::line_features(&lines, &impedance),
        )
        .map_err(output_error(scenario, PipelineStep::WriteLines))?;

    let table = FrequencyTable::from_lines(lines.iter());
    if table.is_empty() {
        log::warn!(
            "no origin of '{}' reaches a destination within the cutoff",
            scenario.name
        );
    }
    let frequency_path = workspace
        .write_table(&scenario.output_name(&naming.frequency_suffix), &table.rows())
        .map_err(output_error(scenario, PipelineStep::WriteFrequencyTable))?;
    progress("Frequency table calculated.");

    let annotated = join_field(layer.origins(), &table);
    let origins_path = workspace
        .write_feature_class(
            &scenario.output_name(&naming.origins_suffix),
            output_features::origin_features(layer.origins(), &annotated),
        )
        .map_err(output_error(scenario, PipelineStep::WriteOrigins))?;

    let records = spatial_join(&inputs.parcels, &annotated, config.join.merge_rule)
        .map_err(model_error(scenario, PipelineStep::SpatialJoin))?;
    progress("Spatial Join complete.");

    let accessibility_path = workspace
        .write_feature_class(
            &scenario.output_name(&naming.accessibility_suffix),
            output_features::accessibility_features(&records, &config.join.output_field),
        )
        .map_err(output_error(scenario, PipelineStep::WriteAccessibility))?;

    let summary = ScenarioSummary {
        scenario: scenario.name.clone(),
        network_dataset,
        layer_name: layer.name().to_string(),
        impedance,
        cutoff: config.analysis.cutoff,
        line_filter_cutoff: line_filter.value(),
        origins,
        destinations,
        solve,
        lines_within_cutoff: lines.len(),
        origins_with_access: table.len(),
        parcels: records.len(),
        parcels_joined: records.iter().filter(|r| r.join_count > 0).count(),
        baseline_field: None,
        elapsed_seconds: start.elapsed().as_secs_f64(),
        completed_at: chrono::Local::now(),
    };
    let summary_path: Option<PathBuf> = if naming.write_summary {
        let path = workspace
            .write_summary(&scenario.output_name("summary"), &summary)
            .map_err(output_error(scenario, PipelineStep::WriteSummary))?;
        Some(path)
    } else {
        None
    };

    Ok(CompletedScenario {
        outputs: ScenarioOutputs {
            lines: lines_path,
            frequency_table: frequency_path,
            origins: origins_path,
            accessibility: accessibility_path,
            summary: summary_path,
        },
        summary,
        records,
    })
}

/// progress is echoed to the console and the log
fn progress(message: &str) {
    println!("{message}");
    log::info!("{message}");
}

fn engine_error(
    scenario: &ScenarioConfig,
    step: PipelineStep,
) -> impl FnOnce(EngineError) -> AccessError {
    let scenario = scenario.name.clone();
    move |source| AccessError::EngineCall {
        scenario,
        step,
        source,
    }
}

fn output_error(
    scenario: &ScenarioConfig,
    step: PipelineStep,
) -> impl FnOnce(WorkspaceError) -> AccessError {
    let scenario = scenario.name.clone();
    move |source| AccessError::Output {
        scenario,
        step,
        source,
    }
}

fn model_error(
    scenario: &ScenarioConfig,
    step: PipelineStep,
) -> impl FnOnce(ModelError) -> AccessError {
    let scenario = scenario.name.clone();
    move |source| AccessError::Model {
        scenario,
        step,
        source,
    }
}
