pub mod bounds;
pub mod camera;
pub mod error;
pub mod export;
pub mod geometry;
pub mod perspective;
pub mod scale;
pub mod units;
pub mod viewport;

pub use camera::{Camera, Projection, SceneCamera};
pub use error::{ErrorKind, Result, ScaledPerspectiveError};
pub use perspective::PerspectiveModel;
pub use scale::Scale;
pub use viewport::{Corner, Viewport};
