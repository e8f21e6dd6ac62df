pub mod auth;
pub mod client;
pub mod error;
pub mod resource;
pub mod transfer;
pub mod transport;
pub mod urn;
pub mod webdav;
