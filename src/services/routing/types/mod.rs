pub mod ors_directions_response;
pub mod route_response;
