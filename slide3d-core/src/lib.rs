/// Slide3D Core Library - Ellipsoid collide-and-slide against static triangle meshes
///
/// A mover's per-tick displacement and gravity are swept through a [`World`]
/// of triangles in ellipsoid space, sliding along every surface they hit.
/// Mesh sources, STL loading and world transforms feed the World; the
/// [`PhysicsPlayer`] drives the core once per tick.

pub mod collide;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod player;
pub mod slide;
pub mod stl;
pub mod sweep;
pub mod transform;
pub mod world;

// Re-export commonly used types
pub use collide::{SlideResult, Slider};
pub use config::CollisionConfig;
pub use error::{ConfigError, StlError, WorldError};
pub use geometry::{Plane, Triangle};
pub use mesh::{Face, Mesh};
pub use player::{PhysicsPlayer, PlayerInput};
pub use slide::collide_with_world;
pub use sweep::{lowest_root, scene_intersection, SweepHit};
pub use transform::{RotationState, Transform};
pub use world::World;
