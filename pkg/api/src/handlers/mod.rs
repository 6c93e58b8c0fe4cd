pub mod namespaces;
pub mod organizations;
