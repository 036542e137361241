use crate::story::UserId;
use serde::{Deserialize, Serialize};

/// The signed-in viewer, passed explicitly to whatever needs it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthContext {
    pub viewer_id: UserId,
}

impl AuthContext {
    pub fn new(viewer_id: impl Into<UserId>) -> Self {
        Self {
            viewer_id: viewer_id.into(),
        }
    }

    pub fn is_viewer(&self, user_id: &str) -> bool {
        self.viewer_id == user_id
    }
}
