pub mod api_server;
pub mod auth;
pub mod registry_service;
