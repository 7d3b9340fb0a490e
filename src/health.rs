// Health Endpoint - optional HTTP liveness probe next to the stdio server
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "notion-mcp",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Serves `GET /health` until the process exits.
pub async fn serve(port: u16) -> std::io::Result<()> {
    tracing::info!("🚀 Starting health check server on port {}", port);
    // `HttpServer` is !Send, so only the `Server` handle may live across the await
    let server = HttpServer::new(|| {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health", web::get().to(health))
    })
    .workers(1)
    .disable_signals()
    .bind(("0.0.0.0", port))?
    .run();
    server.await
}
