pub mod file_size;
pub mod link_name;
