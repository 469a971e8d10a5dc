//! Scene data structures: models, textures and instances.
//!
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `texture` contains GPU texture wrapper and creation utilities
//! - `mesh_group` is a model plus the instance transforms it is drawn with
//! - `instance` holds per-instance transformation data

pub mod instance;
pub mod mesh_group;
pub mod model;
pub mod texture;
