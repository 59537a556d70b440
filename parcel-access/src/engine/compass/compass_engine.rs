use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use kdam::{tqdm, Bar, BarExt};
use parcel_access_core::model::{
    assemble_lines, NaClass, NaLocation, OdCostMatrixLayer, OdCostMatrixSettings, PointLayer,
};
use rayon::prelude::*;
use uom::si::f64::Length;

use super::{
    od_solver::{solve_origin, DestinationAccess},
    snap_to_network, CompassNetwork,
};
use crate::engine::{AnalysisEngine, EngineError, LocationSummary, SolveSummary};

/// the only extension this engine provides
pub const NETWORK_EXTENSION: &str = "Network";

/// an analysis engine solving over compass network datasets. networks are
/// loaded once and shared by every layer bound to the same dataset.
#[derive(Default)]
pub struct CompassEngine {
    checked_out: HashSet<String>,
    networks: HashMap<PathBuf, Arc<CompassNetwork>>,
}

impl CompassEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn require_extension(&self) -> Result<(), EngineError> {
        if self.checked_out.contains(NETWORK_EXTENSION) {
            Ok(())
        } else {
            Err(EngineError::ExtensionNotCheckedOut(String::from(
                NETWORK_EXTENSION,
            )))
        }
    }

    fn load_network(&mut self, path: &Path) -> Result<Arc<CompassNetwork>, EngineError> {
        if let Some(network) = self.networks.get(path) {
            return Ok(network.clone());
        }
        log::info!("loading network dataset {}", path.display());
        let network = Arc::new(CompassNetwork::from_directory(path)?);
        log::info!(
            "network dataset {} has {} vertices and {} edges",
            path.display(),
            network.n_vertices(),
            network.n_edges()
        );
        self.networks.insert(path.to_path_buf(), network.clone());
        Ok(network)
    }

    fn bound_network(&self, layer: &OdCostMatrixLayer) -> Result<Arc<CompassNetwork>, EngineError> {
        self.networks
            .get(&layer.settings.network_dataset)
            .cloned()
            .ok_or_else(|| EngineError::LayerNotBound(layer.name().to_string()))
    }
}

impl AnalysisEngine for CompassEngine {
    fn check_out_extension(&mut self, name: &str) -> Result<(), EngineError> {
        if name != NETWORK_EXTENSION {
            return Err(EngineError::ExtensionUnavailable(name.to_string()));
        }
        self.checked_out.insert(name.to_string());
        Ok(())
    }

    fn check_in_extension(&mut self, name: &str) -> Result<(), EngineError> {
        if self.checked_out.remove(name) {
            Ok(())
        } else {
            Err(EngineError::ExtensionNotCheckedOut(name.to_string()))
        }
    }

    fn make_od_cost_matrix_layer(
        &mut self,
        settings: OdCostMatrixSettings,
    ) -> Result<OdCostMatrixLayer, EngineError> {
        self.require_extension()?;
        self.load_network(&settings.network_dataset)?;
        Ok(OdCostMatrixLayer::new(settings))
    }

    fn add_locations(
        &mut self,
        layer: &mut OdCostMatrixLayer,
        class: NaClass,
        points: &PointLayer,
        search_tolerance: Length,
    ) -> Result<LocationSummary, EngineError> {
        self.require_extension()?;
        let network = self.bound_network(layer)?;
        let desc = format!("locate {} as {}", points.name, class);
        let locations = tqdm!(points.features.iter(), total = points.len(), desc = desc)
            .map(|feature| {
                let snapped = snap_to_network(&network, &feature.geometry, search_tolerance);
                NaLocation::new(feature, &points.name, snapped)
            })
            .collect::<Vec<_>>();
        eprintln!();
        let located = locations.iter().filter(|l| l.is_located()).count();
        let added = layer.append_locations(class, locations)?;
        let summary = LocationSummary {
            class,
            source_name: points.name.clone(),
            added,
            located,
        };
        if summary.not_located() > 0 {
            log::warn!(
                "{} of {} features of '{}' are farther than {:.0}m from the network",
                summary.not_located(),
                summary.added,
                summary.source_name,
                search_tolerance.get::<uom::si::length::meter>()
            );
        }
        Ok(summary)
    }

    fn solve(&mut self, layer: &mut OdCostMatrixLayer) -> Result<SolveSummary, EngineError> {
        self.require_extension()?;
        let network = self.bound_network(layer)?;
        let impedance = layer.settings.impedance;
        let cutoff = layer.settings.cutoff;
        let cutoff_meters = impedance
            .to_length(cutoff)
            .get::<uom::si::length::meter>();

        let access = DestinationAccess::new(&network, layer.destinations());
        let bar = Arc::new(Mutex::new(
            Bar::builder()
                .desc(format!("solve {}", layer.name()))
                .total(layer.origins().len())
                .build()
                .map_err(EngineError::InternalError)?,
        ));
        let pairs = layer
            .origins()
            .par_iter()
            .enumerate()
            .flat_map_iter(|(o_idx, origin)| {
                if let Ok(mut bar) = bar.clone().lock() {
                    let _ = bar.update(1);
                }
                solve_origin(&network, &access, o_idx, origin, cutoff_meters)
            })
            .map(|mut pair| {
                pair.cost = impedance.from_length(Length::new::<uom::si::length::meter>(pair.cost));
                pair
            })
            .filter(|pair| pair.cost <= cutoff)
            .collect::<Vec<_>>();
        eprintln!();

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
        if summary.lines == 0 {
            log::warn!("solving '{}' produced no lines within the cutoff", layer.name());
        }
        layer.set_lines(lines);
        Ok(summary)
    }
}
