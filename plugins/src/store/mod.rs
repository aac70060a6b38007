//! Remote sources for the pipeline artifact.

pub mod http_blob;
pub mod local_dir;

pub use http_blob::{BlobHttpError, BlobHttpErrorKind, HttpBlobStore};
pub use local_dir::LocalDirStore;
