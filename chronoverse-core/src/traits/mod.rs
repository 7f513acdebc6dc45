//! Collaborator traits
//!
//! These traits define the narrow interfaces between the refresh engine
//! and the board: monotonic time, the network link, the wall-clock time
//! source, the content store and the display surface.

pub mod clock;
pub mod link;
pub mod store;
pub mod surface;
pub mod time_source;

pub use clock::Clock;
pub use link::{LinkError, NetworkLink};
pub use store::{ContentStore, StoreError};
pub use surface::{DisplaySurface, SurfaceError};
pub use time_source::{TimeError, TimeSource};
