use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::{ImpedanceAttribute, ModelError, NaClass, NaLocation, OdLine};

/// shape of the solved lines. costs are reported either way.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputLines {
    #[default]
    NoLines,
    StraightLines,
}

/// everything needed to build an OD cost matrix analysis layer.
#[derive(Clone, Debug)]
pub struct OdCostMatrixSettings {
    pub layer_name: String,
    pub network_dataset: PathBuf,
    /// destinations costing more than this (in impedance units) are not solved
    pub cutoff: f64,
    pub impedance: ImpedanceAttribute,
    pub output_lines: OutputLines,
}

/// an ephemeral OD cost matrix analysis layer. lives for one scenario, holding
/// the Origins, Destinations and Lines sublayers.
#[derive(Clone, Debug)]
pub struct OdCostMatrixLayer {
    pub settings: OdCostMatrixSettings,
    origins: Vec<NaLocation>,
    destinations: Vec<NaLocation>,
    lines: Vec<OdLine>,
    solved: bool,
}

impl OdCostMatrixLayer {
    pub fn new(settings: OdCostMatrixSettings) -> Self {
        Self {
            settings,
            origins: vec![],
            destinations: vec![],
            lines: vec![],
            solved: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.settings.layer_name
    }

    /// appends locations to a sublayer, renumbering their object ids so they
    /// continue the sequence of previously loaded locations. loading new
    /// locations invalidates any previous solve.
    ///
    /// # Returns
    ///
    /// the number of locations appended
    pub fn append_locations(
        &mut self,
        class: NaClass,
        locations: Vec<NaLocation>,
    ) -> Result<usize, ModelError> {
        let sublayer = match class {
            NaClass::Origins => &mut self.origins,
            NaClass::Destinations => &mut self.destinations,
            NaClass::OdLines => return Err(ModelError::NotALocationClass(class)),
        };
        let n = locations.len();
        let offset = sublayer.len();
        for (idx, mut location) in locations.into_iter().enumerate() {
            location.object_id = offset + idx + 1;
            sublayer.push(location);
        }
        self.solved = false;
        self.lines.clear();
        Ok(n)
    }

    pub fn origins(&self) -> &[NaLocation] {
        &self.origins
    }

    pub fn destinations(&self) -> &[NaLocation] {
        &self.destinations
    }

    /// stores the result of a solve.
    pub fn set_lines(&mut self, lines: Vec<OdLine>) {
        self.lines = lines;
        self.solved = true;
    }

    pub fn lines(&self) -> Result<&[OdLine], ModelError> {
        if self.solved {
            Ok(&self.lines)
        } else {
            Err(ModelError::NotSolved(self.name().to_string()))
        }
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }
}
