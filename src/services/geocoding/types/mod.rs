pub mod geojson_feature_collection;
pub mod nominatim_search_response;
