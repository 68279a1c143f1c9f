//! Loading, perturbation and export of OFF meshes and point clouds, used to
//! prepare inputs for geometric learning experiments.
pub mod error;
pub mod geometry;
pub mod io;
pub mod params;
pub mod perturb;
pub mod pipeline;
pub mod viz;


pub use error::PrepError;
pub use geometry::Geometry;
