//! Model access layer: artifact resolution, caching and inference.

mod pipeline;
mod predict;
mod repository;
mod store;

pub use pipeline::{
    DecisionTree, FeatureFrame, OneHotColumn, Pipeline, RandomForest, StandardScaler, TreeNode,
};
pub use predict::{predict, select_features, PredictionResult};
pub use repository::{artifact_file_name, ModelRepository, PACKAGE_VERSION};
pub use store::ArtifactStore;

#[cfg(test)]
pub(crate) use pipeline::tests::sample_pipeline;
