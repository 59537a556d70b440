use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

/// the network cost attribute an OD cost matrix is optimized on. network
/// datasets store edge distances in meters; the impedance attribute decides
/// the unit that cutoffs are expressed in and that solved costs are reported in.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImpedanceAttribute {
    Meters,
    Kilometers,
    #[default]
    Miles,
    Feet,
}

impl ImpedanceAttribute {
    /// attribute name as it appears in output field names
    pub fn field_name(&self) -> &'static str {
        match self {
            ImpedanceAttribute::Meters => "Meters",
            ImpedanceAttribute::Kilometers => "Kilometers",
            ImpedanceAttribute::Miles => "Miles",
            ImpedanceAttribute::Feet => "Feet",
        }
    }

    /// name of the accumulated cost field on solved lines, such as `Total_Miles`
    pub fn total_field_name(&self) -> String {
        format!("Total_{}", self.field_name())
    }

    /// express a length as a value in this impedance unit
    pub fn from_length(&self, length: Length) -> f64 {
        use uom::si::length;
        match self {
            ImpedanceAttribute::Meters => length.get::<length::meter>(),
            ImpedanceAttribute::Kilometers => length.get::<length::kilometer>(),
            ImpedanceAttribute::Miles => length.get::<length::mile>(),
            ImpedanceAttribute::Feet => length.get::<length::foot>(),
        }
    }

    /// interpret a value in this impedance unit as a length
    pub fn to_length(&self, value: f64) -> Length {
        use uom::si::length;
        match self {
            ImpedanceAttribute::Meters => Length::new::<length::meter>(value),
            ImpedanceAttribute::Kilometers => Length::new::<length::kilometer>(value),
            ImpedanceAttribute::Miles => Length::new::<length::mile>(value),
            ImpedanceAttribute::Feet => Length::new::<length::foot>(value),
        }
    }
}

impl std::fmt::Display for ImpedanceAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.field_name())
    }
}
