pub mod trip;
pub mod user;

pub use trip::Trip;
pub use user::{LoginResponse, UserProfile, UserRecord};
