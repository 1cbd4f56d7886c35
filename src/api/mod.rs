//! HTTP API: members, committee budgets, funding requests, liveness and metrics.

pub mod extract;
pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
