//! In-process stand-in for the vendor portal.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Days, NaiveDate};
use courtside::protocol::{SESSION_COOKIE, endpoints};
use serde_json::{Value, json};

pub const PASSWORD: &str = "correct-horse";
pub const RULE_ID: i64 = 77;
const WIZARD_COOKIE: &str = "WizardId=w-1";
const HOURS: [u32; 3] = [6, 7, 20];

#[derive(Debug, Default)]
pub struct VendorState {
	pub anchor: Option<NaiveDate>,
	pub logins: u32,
	pub token: Option<String>,
	pub requested_days: Vec<u64>,
	pub schedule_calls: u32,
	pub cancelled: Vec<String>,
}

#[derive(Clone)]
pub struct MockVendor {
	state: Arc<Mutex<VendorState>>,
	pub base_url: String,
}

impl MockVendor {
	/// Serves a calendar whose first day is `anchor`.
	pub async fn start(anchor: NaiveDate) -> Self {
		let _ = tracing_subscriber::fmt().with_test_writer().try_init();

		let state = Arc::new(Mutex::new(VendorState {
			anchor: Some(anchor),
			..VendorState::default()
		}));
		let app = Router::new()
			.route(endpoints::LOGIN, post(login))
			.route(endpoints::LOGOUT, post(logout))
			.route(endpoints::WEEKLY_SCHEDULE, post(schedule))
			.route(endpoints::WIZARD_START, get(wizard_start))
			.route(endpoints::WIZARD_DETAILS, post(wizard_details))
			.route(endpoints::WIZARD_CONFIRM, post(wizard_confirm))
			.route(endpoints::MY_BOOKINGS, get(my_bookings))
			.route(endpoints::CANCEL_BOOKING, post(cancel))
			.with_state(state.clone());

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		tokio::spawn(async move {
			axum::serve(listener, app).await.unwrap();
		});

		Self {
			state,
			base_url: format!("http://{addr}"),
		}
	}

	pub fn state(&self) -> MutexGuard<'_, VendorState> {
		self.state.lock().unwrap()
	}

	/// Invalidates the current token server-side.
	pub fn revoke_token(&self) {
		self.state().token = None;
	}
}

type Shared = State<Arc<Mutex<VendorState>>>;

fn authorized(headers: &HeaderMap, state: &VendorState) -> bool {
	let Some(token) = &state.token else {
		return false;
	};
	headers
		.get(header::AUTHORIZATION)
		.and_then(|v| v.to_str().ok())
		.is_some_and(|v| v == format!("Bearer {token}"))
}

fn has_cookie(headers: &HeaderMap, pair: &str) -> bool {
	headers
		.get_all(header::COOKIE)
		.iter()
		.filter_map(|v| v.to_str().ok())
		.any(|v| v.split(';').any(|c| c.trim() == pair))
}

async fn login(State(state): Shared, Json(body): Json<Value>) -> Response {
	let mut state = state.lock().unwrap();
	if body["Password"] != PASSWORD {
		return Json(json!({ "Errors": ["Invalid login or password"] })).into_response();
	}

	state.logins += 1;
	let token = format!("tok-{}", state.logins);
	state.token = Some(token.clone());
	let member = json!({ "User": { "Member": {
		"Id": 4242,
		"Email": body["Login"],
		"FirstName": "Ada",
		"LastName": "Lovelace"
	} } });
	([(header::SET_COOKIE, format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly"))], Json(member)).into_response()
}

async fn logout(State(state): Shared) -> StatusCode {
	state.lock().unwrap().token = None;
	StatusCode::OK
}

fn cell(status: &str, start: String) -> Value {
	json!({
		"Status": status,
		"StartTime": start,
		"EndTime": start,
		"BookingDuration": "PT30M",
		"Id": start,
		"Durations": ["PT30M", "PT1H"]
	})
}

async fn schedule(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
	let mut state = state.lock().unwrap();
	state.schedule_calls += 1;
	if !authorized(&headers, &state) {
		return StatusCode::UNAUTHORIZED.into_response();
	}

	let days = body["daysInWeek"].as_u64().unwrap_or(0);
	state.requested_days.push(days);
	let anchor = state.anchor.unwrap();

	let blocks: Vec<Value> = HOURS
		.iter()
		.enumerate()
		.map(|(block, hour)| {
			let per_day: Vec<Value> = (0..days)
				.map(|offset| {
					let date = anchor.checked_add_days(Days::new(offset)).unwrap();
					let mut cells = vec![
						cell("Bookable", format!("{date}T{hour:02}:00:00")),
						cell("Booked", format!("{date}T{hour:02}:30:00")),
					];
					if block == 0 && offset == 0 {
						cells.push(json!({ "Status": "Bookable", "EndTime": "broken" }));
					}
					Value::Array(cells)
				})
				.collect();
			json!({ "ClassesPerDay": per_day })
		})
		.collect();

	Json(json!({ "CalendarData": blocks })).into_response()
}

async fn wizard_start(State(state): Shared, headers: HeaderMap, Query(query): Query<Vec<(String, String)>>) -> Response {
	let state = state.lock().unwrap();
	if !authorized(&headers, &state) {
		return StatusCode::UNAUTHORIZED.into_response();
	}
	if !query.iter().any(|(k, _)| k == "startDate") {
		return StatusCode::BAD_REQUEST.into_response();
	}
	([(header::SET_COOKIE, format!("{WIZARD_COOKIE}; Path=/"))], "").into_response()
}

async fn wizard_details(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
	let state = state.lock().unwrap();
	if !authorized(&headers, &state) {
		return StatusCode::UNAUTHORIZED.into_response();
	}
	if !has_cookie(&headers, WIZARD_COOKIE) {
		return (StatusCode::BAD_REQUEST, "wizard not started").into_response();
	}
	if body["UserId"] != 4242 {
		return (StatusCode::BAD_REQUEST, "wrong user").into_response();
	}
	Json(json!({ "Data": { "RuleId": RULE_ID } })).into_response()
}

async fn wizard_confirm(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
	let state = state.lock().unwrap();
	if !authorized(&headers, &state) {
		return StatusCode::UNAUTHORIZED.into_response();
	}
	if body["ruleId"] != RULE_ID || body["ShouldBuyRequiredProductOnDebit"] != true {
		return StatusCode::BAD_REQUEST.into_response();
	}
	Json(json!({ "Data": { "FacilityBooking": {
		"StartDate": "2025-10-09T07:00:00",
		"Duration": "PT30M",
		"User": { "FirstName": "Ada", "LastName": "Lovelace" }
	} } }))
	.into_response()
}

async fn my_bookings(State(state): Shared, headers: HeaderMap, Query(query): Query<Vec<(String, String)>>) -> Response {
	let state = state.lock().unwrap();
	if !authorized(&headers, &state) {
		return StatusCode::UNAUTHORIZED.into_response();
	}
	let user = query.iter().find(|(k, _)| k == "userId").map(|(_, v)| v.clone()).unwrap_or_default();
	Json(json!([{ "Id": "b-1", "UserId": user }, { "Id": "b-2", "UserId": user }])).into_response()
}

async fn cancel(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
	let mut state = state.lock().unwrap();
	if !authorized(&headers, &state) {
		return StatusCode::UNAUTHORIZED.into_response();
	}
	let id = body["bookingId"].as_str().unwrap_or_default().to_string();
	state.cancelled.push(id);
	StatusCode::NO_CONTENT.into_response()
}
