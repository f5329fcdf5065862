//! Wire types for the facility-booking vendor's web client API.
//!
//! Field names follow the vendor's JSON spelling exactly (a mix of PascalCase and
//! camelCase), so every struct carries explicit serde renames. Nothing here
//! performs I/O; the `courtside` crate owns transport and session handling.
//!
//! # Main Types
//!
//! - [`LoginRequest`] / [`LoginResponse`] - session endpoint exchange
//! - [`WeeklyScheduleRequest`] / [`CalendarSlot`] - availability grid
//! - [`SetBookingDetailsRequest`] / [`ChooseBookingRuleRequest`] - booking wizard steps
//! - [`IntentReply`] / [`ChatTurn`] - natural-language intent contract

pub mod calendar;
pub mod endpoints;
pub mod intent;
pub mod login;
pub mod wizard;

pub use calendar::{BOOKABLE_STATUS, CalendarSlot, WeeklyScheduleRequest};
pub use endpoints::SESSION_COOKIE;
pub use intent::{ChatRole, ChatTurn, Intent, IntentReply};
pub use login::{LoginRequest, LoginResponse, Member, UserEnvelope};
pub use wizard::{
	BookingDetailsData, BookingDetailsResponse, BookingUser, CancelBookingRequest, ChooseBookingRuleRequest, ChooseBookingRuleResponse,
	ConfirmedBooking, ConfirmedBookingData, MyBookingsQuery, SetBookingDetailsRequest, WizardStartQuery,
};
