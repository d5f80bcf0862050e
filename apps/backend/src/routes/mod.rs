use actix_web::web;

pub mod courses;
pub mod health;

/// Register every application route.
///
/// Middleware is attached by the caller (`main.rs` or the test app builder),
/// so the same table serves both.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Course resource: /api/v1/courses/**
    cfg.service(web::scope("/api/v1/courses").configure(courses::configure_routes));
}
