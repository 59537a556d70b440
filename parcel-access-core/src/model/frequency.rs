//! per-origin destination counts and the attribute join that attaches them
//! back onto the origin points.

use std::collections::{BTreeMap, HashSet};

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::model::{LocationStatus, NaLocation, OdLine};

/// one row of a frequency table written to the workspace.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FrequencyRow {
    #[serde(rename = "OBJECTID")]
    pub object_id: usize,
    #[serde(rename = "FREQUENCY")]
    pub frequency: u64,
    #[serde(rename = "OriginID")]
    pub origin_id: usize,
}

/// count of distinct destinations reached by each origin. origins with no
/// lines do not appear.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrequencyTable(BTreeMap<usize, u64>);

impl FrequencyTable {
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a OdLine>,
    {
        let mut reached: BTreeMap<usize, HashSet<usize>> = BTreeMap::new();
        for line in lines {
            reached
                .entry(line.origin_id)
                .or_default()
                .insert(line.destination_id);
        }
        let counts = reached
            .into_iter()
            .map(|(origin_id, destinations)| (origin_id, destinations.len() as u64))
            .collect();
        Self(counts)
    }

    pub fn get(&self, origin_id: usize) -> Option<u64> {
        self.0.get(&origin_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// table rows ordered by origin id
    pub fn rows(&self) -> Vec<FrequencyRow> {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, (origin_id, frequency))| FrequencyRow {
                object_id: idx + 1,
                frequency: *frequency,
                origin_id: *origin_id,
            })
            .collect()
    }
}

/// an origin point carrying its joined destination count. the count is
/// None when the origin has no row in the frequency table.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedOrigin {
    pub object_id: usize,
    pub name: String,
    pub status: LocationStatus,
    pub geometry: Point<f64>,
    pub frequency: Option<u64>,
}

/// joins the frequency field onto the origins, matching the origin object id
/// against the table's origin id. every origin is kept.
pub fn join_field(origins: &[NaLocation], table: &FrequencyTable) -> Vec<AnnotatedOrigin> {
    origins
        .iter()
        .map(|o| AnnotatedOrigin {
            object_id: o.object_id,
            name: o.name.clone(),
            status: o.status(),
            geometry: o.geometry,
            frequency: table.get(o.object_id),
        })
        .collect()
}
