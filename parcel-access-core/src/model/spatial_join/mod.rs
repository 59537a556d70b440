mod accessibility_record;
mod join_ops;
mod merge_rule;
mod polygon_feature;

pub use accessibility_record::AccessibilityRecord;
pub use join_ops::{join_baseline, spatial_join, JOIN_COUNT_FIELD, TARGET_FID_FIELD};
pub use merge_rule::{JoinValue, MergeRule};
pub use polygon_feature::PolygonFeature;
