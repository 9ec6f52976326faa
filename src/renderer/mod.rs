//! Render-side view of the simulation
//!
//! Never mutates the scene. A host copies a [`RenderSnapshot`] each frame and
//! uploads its instance arrays however it draws.

pub mod shapes;
pub mod snapshot;
pub mod vertex;

pub use snapshot::{Hud, RenderSnapshot, as_bytes};
pub use vertex::{CircleInstance, LineInstance, RectInstance, Vertex, colors};
