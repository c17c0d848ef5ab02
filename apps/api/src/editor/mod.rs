// Form editor host: editing sessions and the mutation/preview endpoints.

pub mod handlers;
pub mod session;

pub use session::{Session, SessionStore};
