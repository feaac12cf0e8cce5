// Define data modules
mod analytics; // Aggregation over subjects and tasks
mod error; // PlanError and its HTTP mapping
mod logic; // Core plan generation and scoring logic
mod models; // Data structures (Subject, StudyTask, Db, etc.)
mod routes_analytics; // HTTP handler for the analytics summary
mod routes_plan; // HTTP handlers for plan generation APIs
mod routes_subjects; // HTTP handlers for subject CRUD
mod routes_tasks; // HTTP handlers for task APIs
mod store; // Persistent storage (load/save db.json)

// Import axum routing utilities and Router
use axum::{
    Router,
    routing::{get, post, put},
};
use std::net::SocketAddr;
use tower_http::services::ServeDir; // Used to serve static files (HTML/CSS/JS)
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let api = Router::new()
        // plan
        .route("/plan/generate", post(routes_plan::generate_plan))
        .route("/plan/today", get(routes_plan::get_today_plan))
        // subjects
        .route(
            "/subjects",
            get(routes_subjects::get_subjects).post(routes_subjects::create_subject),
        )
        .route(
            "/subjects/:id",
            put(routes_subjects::update_subject).delete(routes_subjects::delete_subject),
        )
        // tasks
        .route("/tasks", get(routes_tasks::get_tasks))
        .route("/tasks/:id/toggle", post(routes_tasks::toggle_task))
        // analytics
        .route("/analytics", get(routes_analytics::get_analytics));

    let app = Router::new()
        .nest("/api", api)
        .nest_service("/", ServeDir::new("static"));

    let addr: SocketAddr = "127.0.0.1:3000".parse().unwrap();

    info!("server running at http://{addr}");
    info!("API base: http://{addr}/api");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind failed");

    axum::serve(listener, app).await.expect("server error");
}
