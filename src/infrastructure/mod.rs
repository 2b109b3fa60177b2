// Infrastructure layer - Configuration, rendering and HTTP adapters
pub mod config;
pub mod html;
pub mod http_response;
