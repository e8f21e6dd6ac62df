pub mod urn;
