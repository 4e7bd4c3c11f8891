mod http;

pub mod geocoding;
pub mod loop_generator;
pub mod navigation;
pub mod routing;
