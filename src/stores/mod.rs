pub mod seats;
pub mod users;

pub use seats::SeatStore;
pub use users::UserStore;
