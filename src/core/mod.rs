pub mod crypto;
pub mod reduction;
pub mod registry;
pub mod session;
pub mod steps;

pub use registry::{Availability, Registry, Scheme, Unsupported};
pub use session::Session;
