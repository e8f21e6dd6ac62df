pub mod reqwest_transport;
pub mod sync_body;
