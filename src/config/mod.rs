//! Configuration module for viewtree
//!
//! Configuration hierarchy:
//! 1. Environment variables (VIEWTREE_*)
//! 2. Project config (.viewtree/config.toml)
//! 3. User config (<config dir>/viewtree/config.toml)
//! 4. Built-in defaults

mod loader;
#[cfg(test)]
mod tests;
mod types;

pub use loader::ConfigWarning;
pub use types::{
    BranchesConfig, BranchesLayout, CommitsConfig, FilesConfig, FilesLayout, ViewsConfig,
};
