pub mod broadcast_routes;
pub mod dashboard_routes;
pub mod service_routes;
pub mod token_routes;
