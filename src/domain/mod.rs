//! Domain Layer
//!
//! Entities, value objects, ports and pure services. Nothing in here
//! knows about nodes, views or the host UI.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
