mod middleware;
mod public;

pub use public::{HttpState, NAVIGATE_PATH, build_router};
