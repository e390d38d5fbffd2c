pub mod fetcher;
pub mod grouper;
pub mod node;
pub mod render;
pub mod sorter;
pub mod store;
pub mod tree;
