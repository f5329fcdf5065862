//! Booking wizard steps and booking management payloads.
//!
//! The wizard is a server-side session: `Start` (GET) establishes it through
//! cookies, `SetFacilityBookingDetailsWizardStep/Next` returns a rule id, and
//! `ChooseBookingRuleStep/Next` confirms the booking under that rule.

use serde::{Deserialize, Serialize};

/// Query string for [`WIZARD_START`](crate::endpoints::WIZARD_START).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardStartQuery {
	#[serde(rename = "clubId")]
	pub club_id: u32,
	/// `YYYY-MM-DDTHH:MM:SS`, vendor-local.
	#[serde(rename = "startDate")]
	pub start_date: String,
	#[serde(rename = "zoneTypeId")]
	pub zone_type_id: u32,
	#[serde(rename = "RedirectUrl")]
	pub redirect_url: String,
}

impl WizardStartQuery {
	/// Flattens into ordered key/value pairs for a query string.
	pub fn to_pairs(&self) -> Vec<(String, String)> {
		vec![
			("clubId".into(), self.club_id.to_string()),
			("startDate".into(), self.start_date.clone()),
			("zoneTypeId".into(), self.zone_type_id.to_string()),
			("RedirectUrl".into(), self.redirect_url.clone()),
		]
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBookingDetailsRequest {
	#[serde(rename = "UserId")]
	pub user_id: i64,
	#[serde(rename = "ZoneId")]
	pub zone_id: u32,
	#[serde(rename = "StartTime")]
	pub start_time: String,
	/// Minutes.
	#[serde(rename = "Duration")]
	pub duration: u32,
	#[serde(rename = "RequiredNumberOfSlots")]
	pub required_number_of_slots: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingDetailsResponse {
	#[serde(rename = "Data", default, skip_serializing_if = "Option::is_none")]
	pub data: Option<BookingDetailsData>,
}

impl BookingDetailsResponse {
	pub fn rule_id(&self) -> Option<&serde_json::Value> {
		self.data.as_ref()?.rule_id.as_ref().filter(|id| !id.is_null())
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingDetailsData {
	#[serde(rename = "RuleId", default, skip_serializing_if = "Option::is_none")]
	pub rule_id: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChooseBookingRuleRequest {
	#[serde(rename = "ruleId")]
	pub rule_id: serde_json::Value,
	#[serde(rename = "OtherCalendarEventBookedAtRequestedTime")]
	pub other_calendar_event_booked_at_requested_time: bool,
	#[serde(rename = "HasUserRequiredProducts")]
	pub has_user_required_products: bool,
	#[serde(rename = "ShouldBuyRequiredProductOnDebit")]
	pub should_buy_required_product_on_debit: bool,
}

impl ChooseBookingRuleRequest {
	/// Confirmation request with the flags the web client always sends.
	pub fn new(rule_id: serde_json::Value) -> Self {
		Self {
			rule_id,
			other_calendar_event_booked_at_requested_time: false,
			has_user_required_products: false,
			should_buy_required_product_on_debit: true,
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChooseBookingRuleResponse {
	#[serde(rename = "Data", default, skip_serializing_if = "Option::is_none")]
	pub data: Option<ConfirmedBookingData>,
}

impl ChooseBookingRuleResponse {
	pub fn booking(&self) -> Option<&ConfirmedBooking> {
		self.data.as_ref()?.facility_booking.as_ref()
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfirmedBookingData {
	#[serde(rename = "FacilityBooking", default, skip_serializing_if = "Option::is_none")]
	pub facility_booking: Option<ConfirmedBooking>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfirmedBooking {
	#[serde(rename = "StartDate", default)]
	pub start_date: Option<String>,
	#[serde(rename = "Duration", default)]
	pub duration: Option<serde_json::Value>,
	#[serde(rename = "User", default)]
	pub user: Option<BookingUser>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingUser {
	#[serde(rename = "FirstName", default)]
	pub first_name: String,
	#[serde(rename = "LastName", default)]
	pub last_name: String,
}

impl BookingUser {
	pub fn full_name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name)
	}
}

/// Query string for [`MY_BOOKINGS`](crate::endpoints::MY_BOOKINGS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyBookingsQuery {
	pub club_id: u32,
	pub user_id: i64,
}

impl MyBookingsQuery {
	pub fn to_pairs(&self) -> Vec<(String, String)> {
		vec![("clubId".into(), self.club_id.to_string()), ("userId".into(), self.user_id.to_string())]
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
	pub booking_id: String,
	pub club_id: u32,
}
