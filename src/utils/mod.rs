pub mod app_error;
pub mod html;
pub mod http_client;
pub mod validated_json;
pub mod validated_query;
pub mod validators;
