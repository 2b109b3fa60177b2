// Application layer - Session state and dashboard use cases
pub mod dashboard_service;
pub mod session;
pub mod session_service;
