use parcel_access_core::model::{NaClass, OdCostMatrixLayer, OdCostMatrixSettings, PointLayer};
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use super::EngineError;

/// a network analysis engine able to build and solve OD cost matrix layers.
/// the engine must have its extension checked out before layers are built,
/// see [`super::EngineSession`].
pub trait AnalysisEngine {
    fn check_out_extension(&mut self, name: &str) -> Result<(), EngineError>;

    fn check_in_extension(&mut self, name: &str) -> Result<(), EngineError>;

    /// creates an empty OD cost matrix layer bound to the settings' network dataset.
    fn make_od_cost_matrix_layer(
        &mut self,
        settings: OdCostMatrixSettings,
    ) -> Result<OdCostMatrixLayer, EngineError>;

    /// locates every feature of a point layer on the layer's network and appends
    /// it to the Origins or Destinations sublayer.
    ///
    /// # Arguments
    ///
    /// * `layer`            - analysis layer receiving the locations
    /// * `class`            - sublayer to append to
    /// * `points`           - features to locate
    /// * `search_tolerance` - features farther than this from the network are not located
    ///
    /// # Returns
    ///
    /// counts of the features appended and located
    fn add_locations(
        &mut self,
        layer: &mut OdCostMatrixLayer,
        class: NaClass,
        points: &PointLayer,
        search_tolerance: Length,
    ) -> Result<LocationSummary, EngineError>;

    /// solves the layer, populating its Lines sublayer.
    fn solve(&mut self, layer: &mut OdCostMatrixLayer) -> Result<SolveSummary, EngineError>;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LocationSummary {
    pub class: NaClass,
    pub source_name: String,
    pub added: usize,
    pub located: usize,
}

impl LocationSummary {
    pub fn not_located(&self) -> usize {
        self.added - self.located
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SolveSummary {
    pub layer_name: String,
    pub origins_located: usize,
    pub destinations_located: usize,
    pub lines: usize,
}
