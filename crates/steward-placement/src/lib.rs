//! steward-placement — builtin implementations of the scheduler oracles.
//!
//! The decision loop in `steward-sched` only knows the two oracle
//! traits; this crate supplies the manager's stock answers:
//!
//! - [`FirstFitSelector`] — would the job start now, and on which nodes
//!   (lowest available indices first)
//! - [`ReservationLedger`] — what capacity remains once advance
//!   reservations are honored

pub mod resv;
pub mod select;

pub use resv::{Reservation, ReservationLedger};
pub use select::FirstFitSelector;
