//! 核心响应处理模块

use serde::{Deserialize, Serialize};

/// 确认类响应：`{"message": ...}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
