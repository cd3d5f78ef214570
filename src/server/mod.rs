mod router;
mod state;

pub use router::build_router;
pub use state::{ServeHealth, ServeState};
