//! # morphtree
//!
//! A particle tree that morphs between a scattered cloud and an assembled
//! cone.
//!
//! Every element of the scene is sampled twice at startup: once inside a
//! large sphere (the chaos position) and once on or inside the tree
//! silhouette (the target position). A single [`TreeState`] decides which of
//! the two everything heads toward. Each frame the elements step a little
//! closer, each at its own speed, and the renderer interpolates between the
//! two positions.
//!
//! ## Quick Start
//!
//! ```ignore
//! use morphtree::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     Experience::new()
//!         .with_seed(42)
//!         .run()
//! }
//! ```
//!
//! ## Without a window
//!
//! [`TreeScene`] is independent of the GPU and can be driven directly:
//!
//! ```ignore
//! let mut scene = TreeScene::new(TreeConfig::default(), TreeState::Chaos);
//! for frame in 0..120 {
//!     scene.tick(TreeState::Formed, 1.0 / 60.0, frame as f32 / 60.0);
//! }
//! assert!(scene.is_settled(TreeState::Formed));
//! ```
//!
//! ## Components
//!
//! - [`sampler`]: chaos sphere, cone volume, cone surface and base disk
//! - [`dataset`]: foliage arrays and ornament records
//! - [`animator`]: clamped per-record progress
//! - [`scene`]: per-frame advance and ornament transforms
//! - [`shaders`]: WGSL for the point and mesh pipelines

pub mod animator;
pub mod config;
pub mod dataset;
pub mod easing;
pub mod error;
pub mod experience;
pub mod foliage;
mod gpu;
pub mod input;
pub mod palette;
pub mod sampler;
pub mod scene;
pub mod shaders;
pub mod state;
pub mod time;

pub use config::TreeConfig;
pub use error::{AppError, ConfigError, GpuError};
pub use experience::Experience;
pub use scene::TreeScene;
pub use state::TreeState;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use morphtree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animator::Progress;
    pub use crate::config::TreeConfig;
    pub use crate::dataset::{FoliageData, Ornament, Role};
    pub use crate::error::AppError;
    pub use crate::experience::Experience;
    pub use crate::palette::{Color, Palette};
    pub use crate::sampler::{Cone, Sampler};
    pub use crate::scene::TreeScene;
    pub use crate::state::TreeState;
    pub use glam::Vec3;
}
