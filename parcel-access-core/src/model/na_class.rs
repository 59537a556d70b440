use serde::{Deserialize, Serialize};

/// the named sublayers of an OD cost matrix analysis layer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NaClass {
    Origins,
    Destinations,
    #[serde(rename = "ODLines")]
    OdLines,
}

impl NaClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            NaClass::Origins => "Origins",
            NaClass::Destinations => "Destinations",
            NaClass::OdLines => "ODLines",
        }
    }
}

impl std::fmt::Display for NaClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
