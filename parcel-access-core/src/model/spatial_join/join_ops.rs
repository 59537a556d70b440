use std::collections::HashMap;

use geo::{BoundingRect, Intersects};
use itertools::Itertools;
use rstar::{
    primitives::{GeomWithData, Rectangle},
    RTree,
};

use super::{AccessibilityRecord, JoinValue, MergeRule, PolygonFeature};
use crate::model::{AnnotatedOrigin, ModelError};

/// number of join features matched to a target feature
pub const JOIN_COUNT_FIELD: &str = "Join_Count";
/// object id of the target feature
pub const TARGET_FID_FIELD: &str = "TARGET_FID";

type ParcelEnvelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// one-to-one, keep-all spatial join of annotated origin points onto parcels.
///
/// every parcel yields exactly one record, in parcel order. origins intersecting
/// a parcel (boundary included) are merged with the merge rule, taken in origin
/// object id order. an origin without a frequency value still exists in the
/// parcel and contributes 0; a parcel with no origins gets a null value.
///
/// # Arguments
///
/// * `parcels`    - target polygons
/// * `origins`    - join points carrying a destination count
/// * `merge_rule` - how to combine the counts of several origins in one parcel
///
/// # Returns
///
/// one accessibility record per parcel, or an error if a parcel has no extent
pub fn spatial_join(
    parcels: &[PolygonFeature],
    origins: &[AnnotatedOrigin],
    merge_rule: MergeRule,
) -> Result<Vec<AccessibilityRecord>, ModelError> {
    let rtree = build_parcel_index(parcels)?;

    let mut joined: Vec<Vec<u64>> = vec![vec![]; parcels.len()];
    for origin in origins.iter().sorted_by_key(|o| o.object_id) {
        let query = [origin.geometry.x(), origin.geometry.y()];
        for candidate in rtree.locate_all_at_point(&query) {
            let parcel_idx = candidate.data;
            if parcels[parcel_idx].geometry.intersects(&origin.geometry) {
                joined[parcel_idx].push(origin.frequency.unwrap_or_default());
            }
        }
    }

    let records = parcels
        .iter()
        .zip(joined)
        .map(|(parcel, values)| AccessibilityRecord {
            target_fid: parcel.object_id,
            join_count: values.len(),
            value: merge_rule.merge(&values),
            geometry: parcel.geometry.clone(),
            properties: parcel.properties.clone(),
            extra_fields: Default::default(),
        })
        .collect_vec();

    let n_joined = records.iter().filter(|r| r.join_count > 0).count();
    log::debug!(
        "spatial join matched origins to {n_joined} of {} parcels using merge rule '{merge_rule}'",
        records.len()
    );
    Ok(records)
}

/// attaches the value of a baseline join result to each record as an extra
/// field, matching records by parcel object id. records with no baseline
/// counterpart receive a null value.
pub fn join_baseline(
    records: &mut [AccessibilityRecord],
    baseline: &[AccessibilityRecord],
    field_name: &str,
) {
    let lookup: HashMap<usize, Option<JoinValue>> = baseline
        .iter()
        .map(|r| (r.target_fid, r.value))
        .collect();
    for record in records.iter_mut() {
        let value = lookup.get(&record.target_fid).copied().flatten();
        record.extra_fields.insert(field_name.to_string(), value);
    }
}

fn build_parcel_index(parcels: &[PolygonFeature]) -> Result<RTree<ParcelEnvelope>, ModelError> {
    let envelopes = parcels
        .iter()
        .enumerate()
        .map(|(idx, parcel)| {
            let rect = parcel.geometry.bounding_rect().ok_or_else(|| {
                ModelError::InvalidGeometry(format!(
                    "parcel {} has no extent",
                    parcel.object_id
                ))
            })?;
            let envelope = Rectangle::from_corners(
                [rect.min().x, rect.min().y],
                [rect.max().x, rect.max().y],
            );
            Ok(GeomWithData::new(envelope, idx))
        })
        .collect::<Result<Vec<_>, ModelError>>()?;
    Ok(RTree::bulk_load(envelopes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LocationStatus;
    use geo::{polygon, Geometry, Point};
    use serde_json::{json, Map};

    fn square(object_id: usize, x0: f64, y0: f64) -> PolygonFeature {
        let mut properties = Map::new();
        properties.insert(String::from("ACCT"), json!(format!("parcel-{object_id}")));
        PolygonFeature {
            object_id,
            geometry: Geometry::Polygon(polygon![
                (x: x0, y: y0),
                (x: x0 + 1.0, y: y0),
                (x: x0 + 1.0, y: y0 + 1.0),
                (x: x0, y: y0 + 1.0),
                (x: x0, y: y0),
            ]),
            properties,
        }
    }

    fn origin(object_id: usize, x: f64, y: f64, frequency: Option<u64>) -> AnnotatedOrigin {
        AnnotatedOrigin {
            object_id,
            name: format!("Location {object_id}"),
            status: LocationStatus::Ok,
            geometry: Point::new(x, y),
            frequency,
        }
    }

    #[test]
    fn test_keep_all_one_record_per_parcel() {
        let parcels = vec![square(1, 0.0, 0.0), square(2, 5.0, 5.0)];
        let origins = vec![origin(1, 0.5, 0.5, Some(4))];
        let records = spatial_join(&parcels, &origins, MergeRule::First).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].target_fid, 1);
        assert_eq!(records[0].join_count, 1);
        assert_eq!(records[0].value, Some(JoinValue::Count(4)));
        assert_eq!(records[1].join_count, 0);
        assert_eq!(records[1].value, None);
    }

    #[test]
    fn test_origin_without_frequency_counts_as_zero() {
        let parcels = vec![square(1, 0.0, 0.0)];
        let origins = vec![origin(1, 0.5, 0.5, None)];
        let records = spatial_join(&parcels, &origins, MergeRule::First).unwrap();
        assert_eq!(records[0].join_count, 1);
        assert_eq!(records[0].value, Some(JoinValue::Count(0)));
    }

    #[test]
    fn test_first_follows_origin_object_id_order() {
        let parcels = vec![square(1, 0.0, 0.0)];
        let origins = vec![
            origin(3, 0.2, 0.2, Some(9)),
            origin(1, 0.5, 0.5, Some(2)),
            origin(2, 0.7, 0.7, Some(4)),
        ];
        let first = spatial_join(&parcels, &origins, MergeRule::First).unwrap();
        assert_eq!(first[0].value, Some(JoinValue::Count(2)));
        let mean = spatial_join(&parcels, &origins, MergeRule::Mean).unwrap();
        assert_eq!(mean[0].value, Some(JoinValue::Mean(5.0)));
        assert_eq!(mean[0].join_count, 3);
    }

    #[test]
    fn test_boundary_point_intersects() {
        let parcels = vec![square(1, 0.0, 0.0)];
        let origins = vec![origin(1, 1.0, 0.5, Some(1))];
        let records = spatial_join(&parcels, &origins, MergeRule::Sum).unwrap();
        assert_eq!(records[0].join_count, 1);
    }

    #[test]
    fn test_attributes_carry_parcel_fields() {
        let parcels = vec![square(1, 0.0, 0.0)];
        let origins = vec![origin(1, 0.5, 0.5, Some(3))];
        let records = spatial_join(&parcels, &origins, MergeRule::First).unwrap();
        let attrs = records[0].attributes("NUM_DEST");
        assert_eq!(attrs.get("ACCT"), Some(&json!("parcel-1")));
        assert_eq!(attrs.get("NUM_DEST"), Some(&json!(3)));
        assert_eq!(attrs.get(JOIN_COUNT_FIELD), Some(&json!(1)));
        assert_eq!(attrs.get(TARGET_FID_FIELD), Some(&json!(1)));
    }

    #[test]
    fn test_join_baseline_by_target_fid() {
        let parcels = vec![square(1, 0.0, 0.0), square(2, 5.0, 5.0)];
        let baseline_origins = vec![origin(1, 0.5, 0.5, Some(8)), origin(2, 5.5, 5.5, Some(6))];
        let tier_origins = vec![origin(1, 0.5, 0.5, Some(3))];
        let baseline = spatial_join(&parcels, &baseline_origins, MergeRule::First).unwrap();
        let mut tier = spatial_join(&parcels, &tier_origins, MergeRule::First).unwrap();
        join_baseline(&mut tier, &baseline, "Full_Road_dest");
        assert_eq!(tier[0].extra_fields.get("Full_Road_dest"), Some(&Some(JoinValue::Count(8))));
        assert_eq!(tier[1].extra_fields.get("Full_Road_dest"), Some(&Some(JoinValue::Count(6))));
        assert_eq!(tier[1].value, None);
    }
}
