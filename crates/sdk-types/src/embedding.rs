use serde::{Deserialize, Serialize};

/// Embeddings request in the generic abstraction.
///
/// Chat adapters never handle this; it exists so a dispatch layer can route
/// it elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsRequest {
    #[serde(default)]
    pub values: Vec<String>,
}

impl EmbeddingsRequest {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }
}
