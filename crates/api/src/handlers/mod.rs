pub mod bookings;
pub mod lessons;
