//! an in-memory engine that records every call and solves from scripted costs.

use std::collections::{HashMap, HashSet};

use parcel_access_core::model::{
    assemble_lines, NaClass, NaLocation, NetworkLocation, OdCostMatrixLayer, OdCostMatrixSettings,
    OdPair, PointLayer,
};
use uom::si::f64::Length;

use super::{AnalysisEngine, EngineError, LocationSummary, SolveSummary};

#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    CheckOut(String),
    CheckIn(String),
    MakeLayer(String),
    AddLocations {
        layer: String,
        class: NaClass,
        source_name: String,
    },
    Solve(String),
}

/// costs are scripted per (origin name, destination name). pairs without a
/// scripted cost are unreachable.
#[derive(Default)]
pub struct RecordingEngine {
    calls: Vec<EngineCall>,
    checked_out: Option<String>,
    costs: HashMap<(String, String), f64>,
    unlocated: HashSet<String>,
    failing_networks: HashSet<String>,
}

impl RecordingEngine {
    pub fn with_cost(mut self, origin: &str, destination: &str, cost: f64) -> Self {
        self.costs
            .insert((origin.to_string(), destination.to_string()), cost);
        self
    }

    /// features with this name are never located on the network
    pub fn with_unlocated(mut self, name: &str) -> Self {
        self.unlocated.insert(name.to_string());
        self
    }

    /// solving any layer bound to a network dataset ending with this path fails
    pub fn with_failing_network(mut self, network_dataset: &str) -> Self {
        self.failing_networks.insert(network_dataset.to_string());
        self
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn checked_out(&self) -> Option<&str> {
        self.checked_out.as_deref()
    }

    fn require_extension(&self) -> Result<(), EngineError> {
        match self.checked_out {
            Some(_) => Ok(()),
            None => Err(EngineError::ExtensionNotCheckedOut(String::from("Network"))),
        }
    }
}

impl AnalysisEngine for RecordingEngine {
    fn check_out_extension(&mut self, name: &str) -> Result<(), EngineError> {
        self.calls.push(EngineCall::CheckOut(name.to_string()));
        if name != "Network" {
            return Err(EngineError::ExtensionUnavailable(name.to_string()));
        }
        self.checked_out = Some(name.to_string());
        Ok(())
    }

    fn check_in_extension(&mut self, name: &str) -> Result<(), EngineError> {
        self.calls.push(EngineCall::CheckIn(name.to_string()));
        match self.checked_out.take() {
            Some(_) => Ok(()),
            None => Err(EngineError::ExtensionNotCheckedOut(name.to_string())),
        }
    }

    fn make_od_cost_matrix_layer(
        &mut self,
        settings: OdCostMatrixSettings,
    ) -> Result<OdCostMatrixLayer, EngineError> {
        self.calls
            .push(EngineCall::MakeLayer(settings.layer_name.clone()));
        self.require_extension()?;
        Ok(OdCostMatrixLayer::new(settings))
    }

    fn add_locations(
        &mut self,
        layer: &mut OdCostMatrixLayer,
        class: NaClass,
        points: &PointLayer,
        _search_tolerance: Length,
    ) -> Result<LocationSummary, EngineError> {
        self.calls.push(EngineCall::AddLocations {
            layer: layer.name().to_string(),
            class,
            source_name: points.name.clone(),
        });
        self.require_extension()?;
        let locations = points
            .features
            .iter()
            .map(|f| {
                let snapped = match self.unlocated.contains(&f.name()) {
                    true => None,
                    false => Some(NetworkLocation {
                        edge_index: 0,
                        fraction: 0.0,
                        snap_distance_meters: 0.0,
                    }),
                };
                NaLocation::new(f, &points.name, snapped)
            })
            .collect::<Vec<_>>();
        let located = locations.iter().filter(|l| l.is_located()).count();
        let added = layer.append_locations(class, locations)?;
        Ok(LocationSummary {
            class,
            source_name: points.name.clone(),
            added,
            located,
        })
    }

    fn solve(&mut self, layer: &mut OdCostMatrixLayer) -> Result<SolveSummary, EngineError> {
        self.calls.push(EngineCall::Solve(layer.name().to_string()));
        self.require_extension()?;
        let network = layer.settings.network_dataset.to_string_lossy().to_string();
        if self.failing_networks.iter().any(|n| network.ends_with(n)) {
            return Err(EngineError::Solve {
                layer: layer.name().to_string(),
                message: format!("network dataset '{network}' is not valid"),
            });
        }
        let cutoff = layer.settings.cutoff;
        let mut pairs = vec![];
        for (o_idx, o) in layer.origins().iter().enumerate() {
            for (d_idx, d) in layer.destinations().iter().enumerate() {
                if !(o.is_located() && d.is_located()) {
                    continue;
                }
                if let Some(cost) = self.costs.get(&(o.name.clone(), d.name.clone())) {
                    if *cost <= cutoff {
                        pairs.push(OdPair {
                            origin: o_idx,
                            destination: d_idx,
                            cost: *cost,
                        });
                    }
                }
            }
        }
        let lines = assemble_lines(
            layer.origins(),
            layer.destinations(),
            pairs,
            layer.settings.output_lines,
        );
        let summary = SolveSummary {
            layer_name: layer.name().to_string(),
            origins_located: layer.origins().iter().filter(|l| l.is_located()).count(),
            destinations_located: layer
                .destinations()
                .iter()
                .filter(|l| l.is_located())
                .count(),
            lines: lines.len(),
        };
        layer.set_lines(lines);
        Ok(summary)
    }
}
