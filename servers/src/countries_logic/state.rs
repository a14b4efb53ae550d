use lib_countries::{QueryEngine, SyncEngine};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared handler state. Cloned per request; every clone points at the same
/// engines and store.
#[derive(Clone)]
pub struct AppState {
    pub sync: SyncEngine,
    pub query: QueryEngine,
    pub artifact_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(sync: SyncEngine, query: QueryEngine, artifact_path: PathBuf) -> Self {
        Self {
            sync,
            query,
            artifact_path: Arc::new(artifact_path),
        }
    }
}
