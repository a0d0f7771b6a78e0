//! Albums server — HTTP boundary over the album store.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
