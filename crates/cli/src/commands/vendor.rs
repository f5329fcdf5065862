//! Commands that talk to the vendor.

use chrono::{NaiveDate, NaiveDateTime};
use courtside::link::{booking_url, my_bookings_url};
use courtside::{BookingRequest, ScheduleQuery};
use serde_json::{Value, json};

use crate::assistant::format_schedule;
use crate::context::AppContext;
use crate::error::{CliError, Result};
use crate::output::OutputFormat;

const MAX_DAYS: u32 = 31;

pub async fn login(ctx: &AppContext) -> Result<Value> {
	let client = ctx.logged_in_client().await?;
	let identity = client
		.session()
		.identity()
		.ok_or(CliError::Vendor(courtside::Error::NotLoggedIn))?;
	Ok(json!({
		"user": ctx.user(),
		"member": identity,
		"name": identity.display_name(),
	}))
}

/// Text output lists slots under one heading per day.
pub async fn schedule(ctx: &AppContext, date: Option<NaiveDate>, days: u32, format: OutputFormat) -> Result<Value> {
	if days == 0 || days > MAX_DAYS {
		return Err(CliError::InvalidInput(format!("--days must be between 1 and {MAX_DAYS}")));
	}
	let query = match date {
		Some(date) => ScheduleQuery::starting(date, days),
		None => ScheduleQuery::upcoming(days),
	};

	let mut client = ctx.logged_in_client().await?;
	let slots = client.fetch_schedule(query).await?;
	let url = client.booking_url(None, None);
	let mut data = json!({
		"from": date.map(|d| d.to_string()),
		"days": days,
		"count": slots.len(),
		"bookingUrl": url,
	});
	if format == OutputFormat::Text {
		data["text"] = json!(format!("{}\n\nBook at {url}", format_schedule(&slots)));
	}
	data["slots"] = json!(slots);
	Ok(data)
}

/// Needs no login: the link is built from configuration alone.
pub fn link(ctx: &AppContext, start: Option<&str>, zone: Option<u32>) -> Value {
	let config = ctx.config.client_config();
	json!({
		"url": booking_url(&config),
		"myBookingsUrl": my_bookings_url(&config),
		"start": start,
		"zone": zone,
	})
}

pub async fn book(ctx: &AppContext, zone: u32, start: NaiveDateTime, minutes: u32) -> Result<Value> {
	if minutes == 0 {
		return Err(CliError::InvalidInput("--duration must be positive".into()));
	}
	let mut client = ctx.logged_in_client().await?;
	let request = BookingRequest::new(zone, start).with_duration(minutes);
	let confirmation = client.try_book_court(&request).await?;
	Ok(json!({
		"success": true,
		"zone": zone,
		"startTime": confirmation.start_time,
		"duration": confirmation.duration,
		"user": confirmation.user,
		"message": confirmation.message,
		"myBookingsUrl": client.my_bookings_url(),
	}))
}

pub async fn bookings(ctx: &AppContext) -> Result<Value> {
	let mut client = ctx.logged_in_client().await?;
	let bookings = client.try_my_bookings().await?;
	Ok(json!({ "count": bookings.len(), "bookings": bookings }))
}

pub async fn cancel(ctx: &AppContext, id: &str) -> Result<Value> {
	if id.trim().is_empty() {
		return Err(CliError::InvalidInput("booking id must not be empty".into()));
	}
	let mut client = ctx.logged_in_client().await?;
	client.try_cancel_booking(id).await?;
	Ok(json!({ "bookingId": id, "cancelled": true }))
}
