mod error;
mod impedance;
mod layer;
mod location;
mod na_class;
mod od_line;

pub mod cost_filter;
pub mod frequency;
pub mod spatial_join;

pub use cost_filter::CostCutoff;
pub use error::ModelError;
pub use frequency::{join_field, AnnotatedOrigin, FrequencyRow, FrequencyTable};
pub use impedance::ImpedanceAttribute;
pub use layer::{OdCostMatrixLayer, OdCostMatrixSettings, OutputLines};
pub use location::{LocationStatus, NaLocation, NetworkLocation, PointFeature, PointLayer};
pub use na_class::NaClass;
pub use od_line::{assemble_lines, OdLine, OdPair};
