//! Scene rendering against an abstract drawing surface

pub mod assets;
pub mod loader;
pub mod renderer;
pub mod surface;

pub use assets::{AssetKey, AssetRequest, ImageResource};
pub use loader::{AssetLoaded, AssetLoader};
pub use renderer::{FrameStats, Renderer};
pub use surface::{DrawSurface, HeadlessSurface};
