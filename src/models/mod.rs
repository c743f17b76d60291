pub mod reservation;
pub mod seat;
pub mod user;

pub use reservation::Reservation;
pub use seat::Seat;
pub use user::User;
