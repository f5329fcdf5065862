//! Booking wizard and booking management.
//!
//! The wizard is three dependent calls on one cookie jar: start, set details
//! (yields a rule id), confirm under that rule. Steps run strictly in order and a
//! failure at any step abandons the wizard; the vendor expires it on its own.

use chrono::NaiveDateTime;
use courtside_protocol::{
	BookingDetailsResponse, CancelBookingRequest, ChooseBookingRuleRequest, ChooseBookingRuleResponse, MyBookingsQuery,
	SetBookingDetailsRequest, WizardStartQuery, endpoints,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::schedule::TIMESTAMP_FORMAT;
use crate::transport::{Transport, VendorRequest, VendorResponse};

/// Default booking length in minutes.
pub const DEFAULT_BOOKING_MINUTES: u32 = 30;

const CONFIRMED_MESSAGE: &str = "Booking confirmed! Check your email for payment instructions.";

/// What to book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
	/// Specific court.
	pub zone_id: u32,
	/// Vendor-local start.
	pub start_time: NaiveDateTime,
	pub duration_minutes: u32,
}

impl BookingRequest {
	pub fn new(zone_id: u32, start_time: NaiveDateTime) -> Self {
		Self {
			zone_id,
			start_time,
			duration_minutes: DEFAULT_BOOKING_MINUTES,
		}
	}

	pub fn with_duration(mut self, minutes: u32) -> Self {
		self.duration_minutes = minutes;
		self
	}

	fn start_stamp(&self) -> String {
		self.start_time.format(TIMESTAMP_FORMAT).to_string()
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
	pub start_time: Option<String>,
	pub duration: Option<Value>,
	pub user: String,
	pub message: String,
}

/// `{success, ...}` record returned by [`Client::book_court`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingOutcome {
	pub success: bool,
	#[serde(flatten)]
	pub confirmation: Option<BookingConfirmation>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl BookingOutcome {
	pub fn confirmed(confirmation: BookingConfirmation) -> Self {
		Self {
			success: true,
			confirmation: Some(confirmation),
			error: None,
		}
	}

	pub fn failed(error: impl Into<String>) -> Self {
		Self {
			success: false,
			confirmation: None,
			error: Some(error.into()),
		}
	}
}

impl<T: Transport> Client<T> {
	/// Runs the booking wizard. Never fails; errors are reported in the outcome.
	pub async fn book_court(&mut self, request: &BookingRequest) -> BookingOutcome {
		match self.try_book_court(request).await {
			Ok(confirmation) => BookingOutcome::confirmed(confirmation),
			Err(err) => {
				warn!(target = "courtside", zone_id = request.zone_id, error = %err, "booking failed");
				BookingOutcome::failed(err.to_string())
			}
		}
	}

	pub async fn try_book_court(&mut self, request: &BookingRequest) -> Result<BookingConfirmation> {
		let start = request.start_stamp();
		info!(target = "courtside", zone_id = request.zone_id, start = %start, minutes = request.duration_minutes, "starting booking wizard");

		self.ensure_session().await?;
		let query = WizardStartQuery {
			club_id: self.config.club_id,
			start_date: start.clone(),
			zone_type_id: self.config.zone_type_id,
			redirect_url: self.config.endpoint(endpoints::PORTAL_HOME),
		};
		let step = VendorRequest::get(self.config.endpoint(endpoints::WIZARD_START)).query(query.to_pairs());
		self.expect_ok(step, "start booking").await?;
		self.pace().await;

		self.ensure_session().await?;
		let user_id = self.session.identity().map(|i| i.user_id).ok_or(Error::NotLoggedIn)?;
		let details = SetBookingDetailsRequest {
			user_id,
			zone_id: request.zone_id,
			start_time: start,
			duration: request.duration_minutes,
			required_number_of_slots: None,
		};
		let step = VendorRequest::post(self.config.endpoint(endpoints::WIZARD_DETAILS)).json(&details)?;
		let response = self.expect_ok(step, "set booking details").await?;
		let details: BookingDetailsResponse = response
			.json()
			.map_err(|e| Error::unexpected("set booking details", format!("body is not JSON: {e}")))?;
		let rule_id = details
			.rule_id()
			.cloned()
			.ok_or_else(|| Error::unexpected("set booking details", "no booking rule found"))?;
		debug!(target = "courtside", %rule_id, "booking rule selected");
		self.pace().await;

		self.ensure_session().await?;
		let step = VendorRequest::post(self.config.endpoint(endpoints::WIZARD_CONFIRM)).json(&ChooseBookingRuleRequest::new(rule_id))?;
		let response = self.expect_ok(step, "confirm booking").await?;
		let confirmed: ChooseBookingRuleResponse = response
			.json()
			.map_err(|e| Error::unexpected("confirm booking", format!("body is not JSON: {e}")))?;
		let booking = confirmed
			.booking()
			.ok_or_else(|| Error::unexpected("confirm booking", "booking confirmation data missing"))?;

		let confirmation = BookingConfirmation {
			start_time: booking.start_date.clone(),
			duration: booking.duration.clone(),
			user: booking.user.as_ref().map(|u| u.full_name()).unwrap_or_default(),
			message: CONFIRMED_MESSAGE.to_string(),
		};
		info!(target = "courtside", start = ?confirmation.start_time, "booking confirmed");
		Ok(confirmation)
	}

	/// Executes `request`, accepting only HTTP 200.
	async fn expect_ok(&mut self, request: VendorRequest, operation: &'static str) -> Result<VendorResponse> {
		let response = self.execute(request).await.into_result(operation)?;
		if response.status != 200 {
			return Err(Error::Status {
				operation,
				status: response.status,
				body: response.body,
			});
		}
		Ok(response)
	}

	/// The member's bookings as returned by the vendor, or empty on failure.
	pub async fn my_bookings(&mut self) -> Vec<Value> {
		match self.try_my_bookings().await {
			Ok(bookings) => bookings,
			Err(err) => {
				warn!(target = "courtside", error = %err, "fetching bookings failed");
				Vec::new()
			}
		}
	}

	pub async fn try_my_bookings(&mut self) -> Result<Vec<Value>> {
		self.ensure_session().await?;
		let user_id = self.session.identity().map(|i| i.user_id).ok_or(Error::NotLoggedIn)?;
		let query = MyBookingsQuery {
			club_id: self.config.club_id,
			user_id,
		};
		let request = VendorRequest::get(self.config.endpoint(endpoints::MY_BOOKINGS)).query(query.to_pairs());
		let response = self.expect_ok(request, "my bookings").await?;
		let body: Value = response
			.json()
			.map_err(|e| Error::unexpected("my bookings", format!("body is not JSON: {e}")))?;

		Ok(match body {
			Value::Array(items) => items,
			Value::Null => Vec::new(),
			other => vec![other],
		})
	}

	/// Cancels a booking. True when the vendor answers 200 or 204.
	pub async fn cancel_booking(&mut self, booking_id: &str) -> bool {
		match self.try_cancel_booking(booking_id).await {
			Ok(()) => true,
			Err(err) => {
				warn!(target = "courtside", booking_id, error = %err, "cancellation failed");
				false
			}
		}
	}

	pub async fn try_cancel_booking(&mut self, booking_id: &str) -> Result<()> {
		self.ensure_session().await?;
		let body = CancelBookingRequest {
			booking_id: booking_id.to_string(),
			club_id: self.config.club_id,
		};
		let request = VendorRequest::post(self.config.endpoint(endpoints::CANCEL_BOOKING)).json(&body)?;
		let response = self.execute(request).await.into_result("cancel booking")?;
		match response.status {
			200 | 204 => {
				info!(target = "courtside", booking_id, "booking cancelled");
				Ok(())
			}
			status => Err(Error::Status {
				operation: "cancel booking",
				status,
				body: response.body,
			}),
		}
	}
}
