use std::path::{Path, PathBuf};

use parcel_access_core::model::{spatial_join::PolygonFeature, PointLayer};
use serde::Serialize;

use super::{geojson_ops, WorkspaceError};

/// the directory holding a run's input datasets and receiving its outputs.
/// datasets are addressed by name: feature classes are `<name>.geojson`,
/// tables `<name>.csv` and summaries `<name>.json`.
#[derive(Clone, Debug)]
pub struct Workspace {
    pub root: PathBuf,
    pub overwrite_output: bool,
}

impl Workspace {
    pub fn new(root: &Path, overwrite_output: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            overwrite_output,
        }
    }

    /// path of an input feature class. a name already ending in `.geojson`
    /// or `.json` is used as given.
    pub fn dataset_path(&self, name: &str) -> PathBuf {
        let extension = Path::new(name).extension().and_then(|e| e.to_str());
        match extension {
            Some("geojson") | Some("json") => self.root.join(name),
            _ => self.output_path(name, "geojson"),
        }
    }

    /// path of an output feature class. the extension is always appended, so
    /// names containing a dot keep their full text.
    pub fn output_dataset_path(&self, name: &str) -> PathBuf {
        self.output_path(name, "geojson")
    }

    pub fn table_path(&self, name: &str) -> PathBuf {
        self.output_path(name, "csv")
    }

    pub fn summary_path(&self, name: &str) -> PathBuf {
        self.output_path(name, "json")
    }

    /// directory of a network dataset, relative to the workspace root unless absolute
    pub fn network_dataset_path(&self, network_dataset: &str) -> PathBuf {
        self.root.join(network_dataset)
    }

    pub fn read_point_layer(&self, name: &str) -> Result<PointLayer, WorkspaceError> {
        let path = self.dataset_path(name);
        let collection = geojson_ops::read_feature_collection(&path)?;
        let features = geojson_ops::point_features(&path, collection)?;
        log::debug!("read {} point features from {}", features.len(), path.display());
        Ok(PointLayer::new(name, features))
    }

    pub fn read_polygon_layer(&self, name: &str) -> Result<Vec<PolygonFeature>, WorkspaceError> {
        let path = self.dataset_path(name);
        let collection = geojson_ops::read_feature_collection(&path)?;
        let features = geojson_ops::polygon_features(&path, collection)?;
        log::debug!("read {} polygon features from {}", features.len(), path.display());
        Ok(features)
    }

    /// writes a feature class, returning the path written.
    pub fn write_feature_class(
        &self,
        name: &str,
        features: Vec<geojson::Feature>,
    ) -> Result<PathBuf, WorkspaceError> {
        let path = self.output_dataset_path(name);
        self.prepare_output(&path)?;
        geojson_ops::write_feature_collection(&path, features)?;
        Ok(path)
    }

    /// replaces a feature class this run already wrote.
    pub fn rewrite_feature_class(
        &self,
        path: &Path,
        features: Vec<geojson::Feature>,
    ) -> Result<(), WorkspaceError> {
        log::debug!("rewriting {}", path.display());
        geojson_ops::write_feature_collection(path, features)
    }

    /// writes rows as a CSV table with a header, returning the path written.
    pub fn write_table<T: Serialize>(
        &self,
        name: &str,
        rows: &[T],
    ) -> Result<PathBuf, WorkspaceError> {
        let path = self.table_path(name);
        self.prepare_output(&path)?;
        let write_error = |message: String| WorkspaceError::WriteError {
            path: path.clone(),
            message,
        };
        let mut writer = csv::Writer::from_path(&path).map_err(|e| write_error(e.to_string()))?;
        for row in rows.iter() {
            writer
                .serialize(row)
                .map_err(|e| write_error(format!("failed to write row: {e}")))?;
        }
        writer.flush().map_err(|e| write_error(e.to_string()))?;
        Ok(path)
    }

    pub fn write_summary<T: Serialize>(
        &self,
        name: &str,
        summary: &T,
    ) -> Result<PathBuf, WorkspaceError> {
        let path = self.summary_path(name);
        self.prepare_output(&path)?;
        self.rewrite_summary(&path, summary)?;
        Ok(path)
    }

    /// replaces a summary this run already wrote.
    pub fn rewrite_summary<T: Serialize>(
        &self,
        path: &Path,
        summary: &T,
    ) -> Result<(), WorkspaceError> {
        let write_error = |message: String| WorkspaceError::WriteError {
            path: path.to_path_buf(),
            message,
        };
        let contents =
            serde_json::to_string_pretty(summary).map_err(|e| write_error(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| write_error(e.to_string()))
    }

    /// creates the parent directory if missing and refuses to replace an
    /// existing output unless overwriting is enabled.
    fn prepare_output(&self, path: &Path) -> Result<(), WorkspaceError> {
        if path.exists() {
            if !self.overwrite_output {
                return Err(WorkspaceError::OutputExists(path.to_path_buf()));
            }
            log::debug!("overwriting {}", path.display());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WorkspaceError::WriteError {
                path: parent.to_path_buf(),
                message: format!("failed to create directory: {e}"),
            })?;
        }
        Ok(())
    }

    fn output_path(&self, name: &str, extension: &str) -> PathBuf {
        self.root.join(format!("{name}.{extension}"))
    }
}
