//! Shared domain enumerations.

use serde::{Deserialize, Serialize};

/// Actions written to the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    NewPost,
    DeletePost,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::NewPost => "new_post",
            ActivityAction::DeletePost => "delete_post",
        }
    }
}
