//! StateStore adapters

mod json_file;
mod memory;

pub use json_file::JsonStateStore;
pub use memory::MemoryStateStore;
