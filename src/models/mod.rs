//! Data models for Libris

pub mod book;
pub mod enums;
pub mod fine;
pub mod loan;
pub mod reservation;
pub mod review;
pub mod stats;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookShort};
pub use enums::{LoanStatus, Role};
pub use fine::{Fine, FineDetails};
pub use loan::{Loan, LoanDetails};
pub use reservation::{Reservation, ReservationDetails};
pub use review::{Review, ReviewDetails};
pub use user::{User, UserShort};
