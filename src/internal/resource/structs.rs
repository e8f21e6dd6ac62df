pub mod resource_handle;
