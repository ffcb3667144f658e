//! 应用装配：状态、路由与中间件

pub mod users;

use axum::{
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::HttpConfig;
use crate::core::error::{Error, Result};
use crate::core::middleware::request_logging_middleware;
use users::{handler, UserService};

/// 路由共享状态；存储句柄在 `main` 中构造后注入
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
}

impl AppState {
    pub fn new(user_service: UserService) -> Self {
        Self { user_service }
    }
}

/// 创建路由
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handler::health_check))
        .route("/api/fetch-users", get(handler::fetch_users))
        .route(
            "/api/users",
            get(handler::list_users).post(handler::create_user),
        )
        .route(
            "/api/users/:id",
            get(handler::get_user)
                .put(handler::update_user)
                .delete(handler::delete_user),
        )
        .route("/api/export-users", get(handler::export_users))
}

/// 默认允许任意来源（配置的来源自然也在其中）；
/// 关闭 `cors_permissive` 后只允许 `cors_origins`
pub fn cors_layer(config: &HttpConfig) -> Result<CorsLayer> {
    let origins = config
        .cors_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).map_err(|_| Error::Config(format!("invalid CORS origin: {o}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let origin = if config.cors_permissive || origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// 带中间件的完整应用
pub fn build_app(state: AppState, cors: CorsLayer) -> Router {
    create_routes()
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_rejects_malformed_origin() {
        for cors_permissive in [true, false] {
            let config = HttpConfig {
                cors_origins: vec!["bad\norigin".to_string()],
                cors_permissive,
                ..HttpConfig::default()
            };
            assert!(cors_layer(&config).is_err());
        }
    }

    #[test]
    fn cors_accepts_configured_origins() {
        let config = HttpConfig {
            cors_origins: vec!["https://frontend.example".to_string()],
            ..HttpConfig::default()
        };
        assert!(cors_layer(&config).is_ok());
        assert!(cors_layer(&HttpConfig::default()).is_ok());
    }
}
