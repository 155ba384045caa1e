pub mod pipeline;
pub mod quantizer;
pub mod session;
pub mod session_store;

pub use pipeline::{run_blocking, PixelArtPipeline, RenderOutput};
pub use session::{apply_overrides, Session, SessionId};
pub use session_store::{InMemorySessionStore, SessionStore};
