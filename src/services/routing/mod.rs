pub mod providers;
pub mod routing_service;
pub mod types;
