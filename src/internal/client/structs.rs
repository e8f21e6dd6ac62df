pub mod client_config;
pub mod dav_client;
