use serde::{Deserialize, Serialize};

/// The participant a canonical message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Ai,
    Human,
    System,
    Tool,
}
