pub mod dav_property;
pub mod resource_info;
