//! REST surface: contact intake, listing, health and the static landing page

mod extract;
pub mod handlers;
mod router;
mod state;

pub use extract::{client_address, collapse_slashes, normalize_path, ClientAddress};
pub use router::create_router;
pub use state::AppState;
