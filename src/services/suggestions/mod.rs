pub mod suggestion_service;
