//! Resilient client for the facility-booking vendor's web API.
//!
//! A [`Client`] owns one authenticated [`Session`] and a cookie-carrying
//! [`Transport`]. Every vendor call runs through a single retry executor that
//! backs off on network failures and silently logs in again when the vendor
//! rejects a lapsed session.
//!
//! Each operation comes in two forms: a `try_*` method returning
//! [`Result`], and a sentinel method (`login -> bool`, `get_schedule -> Vec<Slot>`,
//! `book_court -> BookingOutcome`) that logs the error and returns an empty value.
//!
//! # Example
//!
//! ```ignore
//! use courtside::{Client, ClientConfig};
//!
//! let mut client = Client::new(ClientConfig::default())?;
//! if client.login("me@example.com", "secret").await {
//!     for slot in client.get_schedule(None, 7).await {
//!         println!("{} {}", slot.start_time, slot.duration);
//!     }
//! }
//! ```

mod auth;
pub mod booking;
pub mod client;
pub mod config;
pub mod error;
pub mod link;
pub mod retry;
pub mod schedule;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use courtside_protocol as protocol;
pub use booking::{BookingConfirmation, BookingOutcome, BookingRequest, DEFAULT_BOOKING_MINUTES};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use retry::{RetryOutcome, RetryPolicy};
pub use schedule::{DEFAULT_DAYS, ScheduleQuery, Slot, duration_minutes, flatten_calendar};
pub use session::{Identity, Session};
pub use transport::{HttpTransport, Method, Transport, TransportError, VendorRequest, VendorResponse};
