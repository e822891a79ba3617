pub mod app_config;
pub mod app_state;
pub mod category;
pub mod coordinate;
pub mod suggestion;
