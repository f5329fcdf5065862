//! Weekly availability grid.
//!
//! The schedule endpoint answers with
//! `{"CalendarData": [{"ClassesPerDay": [[slot, ...], ...]}, ...]}`: an outer list of
//! hour blocks, each holding one list of slots per day. Only individual slots are
//! typed here; walking the grid is left to the caller so a malformed entry can be
//! skipped without rejecting the whole response.

use serde::{Deserialize, Serialize};

/// Status value marking a slot as available for booking.
pub const BOOKABLE_STATUS: &str = "Bookable";

/// Key of the outer hour-block list.
pub const CALENDAR_DATA_KEY: &str = "CalendarData";

/// Key of the per-day slot lists inside an hour block.
pub const CLASSES_PER_DAY_KEY: &str = "ClassesPerDay";

/// Body posted to [`WEEKLY_SCHEDULE`](crate::endpoints::WEEKLY_SCHEDULE).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyScheduleRequest {
	pub club_id: u32,
	/// Sent as a string; the vendor rejects a bare number here.
	pub zone_type_id: String,
	/// Always `null`: the grid covers every zone of the type.
	pub zone_id: Option<u32>,
	/// Number of days starting at the vendor's current day.
	pub days_in_week: u32,
}

impl WeeklyScheduleRequest {
	pub fn new(club_id: u32, zone_type_id: u32, days_in_week: u32) -> Self {
		Self {
			club_id,
			zone_type_id: zone_type_id.to_string(),
			zone_id: None,
			days_in_week,
		}
	}
}

/// One cell of the availability grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarSlot {
	#[serde(rename = "Status")]
	pub status: String,
	/// Vendor-local ISO 8601 timestamp without offset.
	#[serde(rename = "StartTime")]
	pub start_time: String,
	#[serde(rename = "EndTime")]
	pub end_time: String,
	/// ISO 8601 duration token such as `PT30M`.
	#[serde(rename = "BookingDuration")]
	pub booking_duration: String,
	#[serde(rename = "Id", default)]
	pub id: serde_json::Value,
	#[serde(rename = "Durations", default)]
	pub durations: Vec<serde_json::Value>,
}

impl CalendarSlot {
	pub fn is_bookable(&self) -> bool {
		self.status == BOOKABLE_STATUS
	}
}
