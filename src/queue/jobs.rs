use serde::{Deserialize, Serialize};

/// Payload carried through the queue for one uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisJob {
    pub job_id: String,
    pub query: String,
    pub file_path: String,
    pub filename: String,
}
