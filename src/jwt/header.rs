use serde::{Deserialize, Serialize};

pub const TOKEN_TYPE: &str = "JWT";

/// JOSE header generated by the codec.
///
/// Field order matters: it serializes as `{"alg":"<id>","typ":"JWT"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl Header {
    pub fn new(alg: &str) -> Self {
        Self {
            alg: alg.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
        }
    }
}
