// Business logic services, one per entity

pub mod car_service;
pub mod rate_service;
pub mod reservation_service;
pub mod user_service;

pub use car_service::CarService;
pub use rate_service::RateService;
pub use reservation_service::ReservationService;
pub use user_service::UserService;
