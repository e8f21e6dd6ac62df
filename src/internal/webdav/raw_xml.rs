pub mod multi_status;
pub mod xml_tree;
