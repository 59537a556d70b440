use serde::{Deserialize, Serialize};

/// how the values of several join features falling in one target feature are
/// combined into the single output value of a one-to-one spatial join.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MergeRule {
    /// value of the first join feature, in join feature object id order
    #[default]
    First,
    Sum,
    Mean,
    Min,
    Max,
}

/// a merged destination count. every rule but `mean` keeps an integer count.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(untagged)]
pub enum JoinValue {
    Count(u64),
    Mean(f64),
}

impl MergeRule {
    /// merge a group of counts. an empty group has no value.
    pub fn merge(&self, values: &[u64]) -> Option<JoinValue> {
        let first = *values.first()?;
        let result = match self {
            MergeRule::First => JoinValue::Count(first),
            MergeRule::Sum => JoinValue::Count(values.iter().sum()),
            MergeRule::Mean => {
                JoinValue::Mean(values.iter().sum::<u64>() as f64 / values.len() as f64)
            }
            MergeRule::Min => JoinValue::Count(values.iter().copied().min().unwrap_or(first)),
            MergeRule::Max => JoinValue::Count(values.iter().copied().max().unwrap_or(first)),
        };
        Some(result)
    }
}

impl std::fmt::Display for MergeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MergeRule::First => "first",
            MergeRule::Sum => "sum",
            MergeRule::Mean => "mean",
            MergeRule::Min => "min",
            MergeRule::Max => "max",
        };
        write!(f, "{s}")
    }
}
