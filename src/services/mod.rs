pub mod reservations;

pub use reservations::ReservationEngine;
