//! # user-records
//!
//! 用户记录 CRUD 服务：从外部接口拉取用户、持久化存储，
//! 并通过 HTTP 提供增删改查与 CSV 导出。

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{build_app, cors_layer, create_routes, AppState};
pub use config::Config;
pub use crate::core::error::{ApiError, Error, Result};
