//! Availability lookup.
//!
//! The vendor only serves a grid anchored at its current day, so a lookup for a
//! later date asks for enough days to reach past the target and then windows the
//! flattened result locally.

use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use courtside_protocol::calendar::{CALENDAR_DATA_KEY, CLASSES_PER_DAY_KEY};
use courtside_protocol::{CalendarSlot, WeeklyScheduleRequest, endpoints};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::transport::{Transport, VendorRequest};

/// Default lookup window in days.
pub const DEFAULT_DAYS: u32 = 7;

/// Vendor-local timestamp layout used in slot and wizard payloads.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A bookable interval on one court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
	pub start_time: String,
	pub end_time: String,
	/// ISO 8601 duration token, e.g. `PT30M`.
	pub duration: String,
	pub status: String,
	pub id: Value,
	pub available_durations: Vec<Value>,
}

impl From<CalendarSlot> for Slot {
	fn from(slot: CalendarSlot) -> Self {
		Self {
			start_time: slot.start_time,
			end_time: slot.end_time,
			duration: slot.booking_duration,
			status: slot.status,
			id: slot.id,
			available_durations: slot.durations,
		}
	}
}

impl Slot {
	/// Date component of the start time.
	pub fn date(&self) -> Option<NaiveDate> {
		NaiveDate::parse_from_str(self.start_time.get(..10)?, "%Y-%m-%d").ok()
	}

	/// `HH:MM` of the start time.
	pub fn time_of_day(&self) -> Option<&str> {
		self.start_time.get(11..16)
	}

	pub fn start(&self) -> Option<NaiveDateTime> {
		NaiveDateTime::parse_from_str(&self.start_time, TIMESTAMP_FORMAT).ok()
	}

	pub fn end(&self) -> Option<NaiveDateTime> {
		NaiveDateTime::parse_from_str(&self.end_time, TIMESTAMP_FORMAT).ok()
	}

	pub fn booking_minutes(&self) -> Option<u32> {
		duration_minutes(&self.duration)
	}
}

/// Parses an ISO 8601 time duration (`PT1H30M`, `PT45M`, `PT2H`) into minutes.
///
/// Seconds are accepted and truncated. Date components are not.
pub fn duration_minutes(token: &str) -> Option<u32> {
	let rest = token.strip_prefix("PT")?;
	if rest.is_empty() {
		return None;
	}

	let mut total = 0u32;
	let mut digits = String::new();
	for c in rest.chars() {
		if c.is_ascii_digit() {
			digits.push(c);
			continue;
		}
		let value: u32 = digits.parse().ok()?;
		digits.clear();
		total = match c {
			'H' => total.checked_add(value.checked_mul(60)?)?,
			'M' => total.checked_add(value)?,
			'S' => total.checked_add(value / 60)?,
			_ => return None,
		};
	}

	digits.is_empty().then_some(total)
}

/// Which days a lookup covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleQuery {
	pub target_date: Option<NaiveDate>,
	pub days: u32,
}

impl Default for ScheduleQuery {
	fn default() -> Self {
		Self {
			target_date: None,
			days: DEFAULT_DAYS,
		}
	}
}

impl ScheduleQuery {
	/// The next `days` days from the vendor's current day.
	pub fn upcoming(days: u32) -> Self {
		Self { target_date: None, days }
	}

	/// `days` days starting at `target_date`.
	pub fn starting(target_date: NaiveDate, days: u32) -> Self {
		Self {
			target_date: Some(target_date),
			days,
		}
	}

	/// Day count to request from the vendor when its current day is `today`.
	pub fn requested_days(&self, today: NaiveDate) -> u32 {
		match self.target_date {
			Some(target) if target > today => {
				let ahead = u32::try_from((target - today).num_days()).unwrap_or(u32::MAX);
				ahead.saturating_add(self.days)
			}
			_ => self.days,
		}
	}

	/// Whether `date` falls in `[target, target + days)`. Always true without a target.
	pub fn contains(&self, date: NaiveDate) -> bool {
		let Some(target) = self.target_date else {
			return true;
		};
		let end = target.checked_add_days(Days::new(u64::from(self.days)));
		date >= target && end.is_none_or(|end| date < end)
	}

	/// Keeps slots inside the window. Slots with an unreadable date are dropped.
	pub fn window(&self, mut slots: Vec<Slot>) -> Vec<Slot> {
		if self.target_date.is_some() {
			slots.retain(|slot| slot.date().is_some_and(|date| self.contains(date)));
		}
		slots
	}
}

/// Flattens a weekly schedule body into bookable slots sorted by start time.
///
/// Walks hour block, then day, then slot. A record that does not match the
/// expected shape is skipped; only a missing top-level grid yields nothing.
pub fn flatten_calendar(body: &Value) -> Vec<Slot> {
	let Some(blocks) = body.get(CALENDAR_DATA_KEY).and_then(Value::as_array) else {
		warn!(target = "courtside", "schedule response has no {CALENDAR_DATA_KEY} list");
		return Vec::new();
	};

	let mut slots = Vec::new();
	let mut skipped = 0usize;
	for block in blocks {
		let Some(days) = block.get(CLASSES_PER_DAY_KEY).and_then(Value::as_array) else {
			skipped += 1;
			continue;
		};
		for day in days {
			let Some(entries) = day.as_array() else {
				skipped += 1;
				continue;
			};
			for entry in entries {
				match CalendarSlot::deserialize(entry) {
					Ok(slot) if slot.is_bookable() => slots.push(Slot::from(slot)),
					Ok(_) => {}
					Err(_) => skipped += 1,
				}
			}
		}
	}

	slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));
	if skipped > 0 {
		warn!(target = "courtside", skipped, "skipped malformed schedule records");
	}
	debug!(target = "courtside", bookable = slots.len(), "flattened schedule");
	slots
}

impl<T: Transport> Client<T> {
	/// Bookable slots for the window, or an empty list on any failure.
	pub async fn get_schedule(&mut self, target_date: Option<NaiveDate>, days: u32) -> Vec<Slot> {
		let query = ScheduleQuery { target_date, days };
		match self.fetch_schedule(query).await {
			Ok(slots) => slots,
			Err(err) => {
				warn!(target = "courtside", error = %err, "schedule lookup failed");
				Vec::new()
			}
		}
	}

	pub async fn fetch_schedule(&mut self, query: ScheduleQuery) -> Result<Vec<Slot>> {
		self.fetch_schedule_as_of(query, Local::now().date_naive()).await
	}

	/// Same as [`fetch_schedule`](Self::fetch_schedule) with an explicit vendor day.
	pub async fn fetch_schedule_as_of(&mut self, query: ScheduleQuery, today: NaiveDate) -> Result<Vec<Slot>> {
		self.ensure_session().await?;

		let days_in_week = query.requested_days(today);
		debug!(target = "courtside", ?query.target_date, query.days, days_in_week, "requesting schedule");
		let body = WeeklyScheduleRequest::new(self.config.club_id, self.config.zone_type_id, days_in_week);
		let request = VendorRequest::post(self.config.endpoint(endpoints::WEEKLY_SCHEDULE)).json(&body)?;

		let response = self.execute(request).await.into_result("schedule")?;
		if response.status != 200 {
			return Err(Error::Status {
				operation: "schedule",
				status: response.status,
				body: response.body,
			});
		}
		let grid: Value = response
			.json()
			.map_err(|e| Error::unexpected("schedule", format!("body is not JSON: {e}")))?;

		Ok(query.window(flatten_calendar(&grid)))
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::testing::{client, json as reply, login_ok, status};

	fn date(s: &str) -> NaiveDate {
		NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
	}

	fn cell(status: &str, start: &str) -> Value {
		json!({
			"Status": status,
			"StartTime": start,
			"EndTime": start,
			"BookingDuration": "PT30M",
			"Id": start,
			"Durations": ["PT30M", "PT1H"]
		})
	}

	fn grid() -> Value {
		json!({
			"CalendarData": [
				{ "ClassesPerDay": [
					[cell("Bookable", "2025-10-06T08:00:00")],
					[cell("Bookable", "2025-10-07T08:00:00"), cell("Booked", "2025-10-07T08:30:00")]
				] },
				{ "ClassesPerDay": [
					[cell("Bookable", "2025-10-06T06:00:00"), { "Status": "Bookable" }],
					"not a day",
					[cell("Unavailable", "2025-10-08T06:00:00")]
				] },
				{ "NoDays": true }
			]
		})
	}

	#[test]
	fn flatten_keeps_only_bookable_slots_in_order() {
		let slots = flatten_calendar(&grid());
		let starts: Vec<_> = slots.iter().map(|s| s.start_time.as_str()).collect();
		assert_eq!(starts, ["2025-10-06T06:00:00", "2025-10-06T08:00:00", "2025-10-07T08:00:00"]);
		assert!(slots.iter().all(|s| s.status == "Bookable"));
		assert_eq!(slots[0].available_durations.len(), 2);
	}

	#[test]
	fn flatten_without_grid_is_empty() {
		assert!(flatten_calendar(&json!({ "Errors": [] })).is_empty());
		assert!(flatten_calendar(&json!({ "CalendarData": "nope" })).is_empty());
	}

	#[test]
	fn future_target_widens_request() {
		let today = date("2025-10-06");
		assert_eq!(ScheduleQuery::starting(date("2025-10-09"), 7).requested_days(today), 10);
		assert_eq!(ScheduleQuery::starting(today, 7).requested_days(today), 7);
		assert_eq!(ScheduleQuery::starting(date("2025-10-01"), 7).requested_days(today), 7);
		assert_eq!(ScheduleQuery::upcoming(5).requested_days(today), 5);
	}

	#[test]
	fn window_is_closed_open() {
		let query = ScheduleQuery::starting(date("2025-10-07"), 1);
		assert!(!query.contains(date("2025-10-06")));
		assert!(query.contains(date("2025-10-07")));
		assert!(!query.contains(date("2025-10-08")));

		let kept = query.window(flatten_calendar(&grid()));
		assert_eq!(kept.len(), 1);
		assert_eq!(kept[0].start_time, "2025-10-07T08:00:00");
	}

	#[test]
	fn slot_accessors() {
		let slot = Slot::from(CalendarSlot::deserialize(&cell("Bookable", "2025-10-06T18:30:00")).unwrap());
		assert_eq!(slot.date(), Some(date("2025-10-06")));
		assert_eq!(slot.time_of_day(), Some("18:30"));
		assert_eq!(slot.booking_minutes(), Some(30));
		assert!(slot.start().is_some());
	}

	#[test]
	fn duration_tokens() {
		assert_eq!(duration_minutes("PT30M"), Some(30));
		assert_eq!(duration_minutes("PT1H30M"), Some(90));
		assert_eq!(duration_minutes("PT2H"), Some(120));
		assert_eq!(duration_minutes("PT90S"), Some(1));
		assert_eq!(duration_minutes("PT"), None);
		assert_eq!(duration_minutes("P1D"), None);
		assert_eq!(duration_minutes("PT5"), None);
		assert_eq!(duration_minutes("30 minutes"), None);
	}

	#[tokio::test]
	async fn schedule_requires_login() {
		let mut client = client([]);
		assert!(client.get_schedule(None, 7).await.is_empty());
		let err = client.fetch_schedule(ScheduleQuery::default()).await.unwrap_err();
		assert!(matches!(err, Error::NotLoggedIn));
		assert!(client.transport().sent().is_empty());
	}

	#[tokio::test]
	async fn schedule_posts_widened_request_and_windows_result() {
		let mut client = client([login_ok("tok-1"), reply(200, grid())]);
		assert!(client.login("ada@example.com", "pw").await);

		let query = ScheduleQuery::starting(date("2025-10-07"), 7);
		let slots = client.fetch_schedule_as_of(query, date("2025-10-05")).await.unwrap();
		assert_eq!(slots.len(), 1);

		let sent = client.transport().sent();
		let body = sent[1].body.as_ref().unwrap();
		assert_eq!(body["daysInWeek"], 9);
		assert_eq!(body["zoneTypeId"], "28");
		assert_eq!(body["zoneId"], Value::Null);
		assert_eq!(sent[1].bearer.as_deref(), Some("tok-1"));
	}

	#[tokio::test]
	async fn vendor_failure_yields_empty_schedule() {
		let mut client = client([login_ok("tok-1"), status(500)]);
		assert!(client.login("ada@example.com", "pw").await);
		assert!(client.get_schedule(None, 7).await.is_empty());
	}

	#[tokio::test]
	async fn non_json_body_yields_empty_schedule() {
		let mut client = client([login_ok("tok-1"), Ok(crate::transport::VendorResponse::new(200, "<html>"))]);
		assert!(client.login("ada@example.com", "pw").await);
		let err = client.fetch_schedule(ScheduleQuery::default()).await.unwrap_err();
		assert!(matches!(err, Error::UnexpectedResponse { .. }));
	}
}
