// Persistent entities and their request/response shapes

pub mod car;
pub mod rate;
pub mod reservation;
pub mod user;

pub use car::*;
pub use rate::*;
pub use reservation::*;
pub use user::*;
