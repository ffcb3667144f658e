//! 核心中间件模块

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, Instrument};
use uuid::Uuid;

/// 请求日志中间件，每个请求分配一个 request_id
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let span = tracing::info_span!("request", %request_id);
    let response = next.run(req).instrument(span.clone()).await;
    let status = response.status();

    span.in_scope(|| {
        info!(
            "{} {} - {} - {}ms",
            method,
            path,
            status.as_u16(),
            start.elapsed().as_millis()
        );
    });

    response
}
