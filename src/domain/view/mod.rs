mod state;

pub use state::{ErrorSurface, InvalidIntent, ViewKind, ViewSession, ViewState};
