//! Chat turn handling: parse, look up slots, compose the reply.

use chrono::NaiveDate;
use courtside::protocol::{ChatTurn, Intent};
use courtside::transport::{BoxFut, Transport};
use courtside::{Client, ScheduleQuery, Slot};
use serde::Serialize;
use tracing::{info, warn};

use super::IntentParser;
use super::format::{DEFAULT_MAX_SLOTS, format_slots};
use crate::error::CliError;
use crate::vault::VendorCredentials;

const MAX_HISTORY: usize = 20;

pub const DEFAULT_GREETING: &str = "Hello! 👋 How can I help you with badminton court bookings today?";

pub const HELP_TEXT: &str = "I can help you find and book badminton courts!\n\n\
	**Try asking:**\n\
	- 'What's available on Friday?'\n\
	- 'Show me courts tomorrow at 6pm'\n\
	- 'I want to book on Monday morning'\n\
	- 'Check availability for next Tuesday'";

pub const NEED_DATE: &str = "I couldn't determine which date you're asking about. Could you specify?\n\n\
	Examples: 'tomorrow', 'Friday', 'Monday', 'October 7th'";

pub const LOGIN_FAILED: &str = "❌ Failed to connect to PerfectGym. Please check your credentials with `courtside creds set`.";

pub const SESSION_EXPIRED: &str = "⌛ Your PerfectGym session has expired. Start a new chat to log in again.";

pub const FETCH_FAILED: &str = "❌ Couldn't load the schedule from PerfectGym right now. Please try again shortly.";

pub const FALLBACK: &str = "I'm not sure what you're asking. Try:\n\
	- 'What's available on Friday?'\n\
	- 'Show me courts for tomorrow'\n\
	- 'I want to book on Monday'";

/// Where the responder gets slots and booking links from.
pub trait SlotLookup: Send {
	/// Bookable slots starting on `date`.
	fn slots_on(&mut self, date: NaiveDate) -> BoxFut<'_, Result<Vec<Slot>, CliError>>;

	fn booking_url(&self) -> String;
}

/// [`SlotLookup`] backed by a vendor [`Client`], logging in on first use.
///
/// The stored credentials are released after the first successful login. A
/// refreshable client renews a lapsed session on its own; otherwise the lapse
/// surfaces as [`courtside::Error::SessionExpired`].
pub struct VendorLookup<T: Transport = courtside::HttpTransport> {
	client: Client<T>,
	credentials: Option<VendorCredentials>,
}

impl<T: Transport> VendorLookup<T> {
	pub fn new(client: Client<T>, credentials: Option<VendorCredentials>) -> Self {
		Self { client, credentials }
	}

	async fn login(&mut self) -> Result<(), CliError> {
		let creds = self
			.credentials
			.as_ref()
			.ok_or_else(|| CliError::LoginFailed("no vendor credentials stored".into()))?;
		self.client.try_login(&creds.email, &creds.password).await.map_err(|err| {
			if err.is_unreachable() {
				CliError::Vendor(err)
			} else {
				CliError::LoginFailed(err.to_string())
			}
		})?;
		self.credentials = None;
		Ok(())
	}

	async fn fetch(&mut self, date: NaiveDate) -> Result<Vec<Slot>, CliError> {
		if !self.client.session().is_established() {
			self.login().await?;
		}
		Ok(self.client.fetch_schedule(ScheduleQuery::starting(date, 1)).await?)
	}
}

impl<T: Transport> SlotLookup for VendorLookup<T> {
	fn slots_on(&mut self, date: NaiveDate) -> BoxFut<'_, Result<Vec<Slot>, CliError>> {
		Box::pin(self.fetch(date))
	}

	fn booking_url(&self) -> String {
		self.client.booking_url(None, None)
	}
}

/// One assistant answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
	pub text: String,
	pub intent: Intent,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub time: Option<String>,
	pub slot_count: usize,
}

/// Keeps the conversation and answers one message at a time.
pub struct ChatResponder<P, L> {
	parser: P,
	lookup: L,
	history: Vec<ChatTurn>,
}

impl<P: IntentParser, L: SlotLookup> ChatResponder<P, L> {
	pub fn new(parser: P, lookup: L) -> Self {
		Self {
			parser,
			lookup,
			history: Vec::new(),
		}
	}

	pub fn history(&self) -> &[ChatTurn] {
		&self.history
	}

	pub async fn respond(&mut self, message: &str) -> ChatReply {
		self.push(ChatTurn::user(message));
		let parsed = self.parser.parse(message, &self.history).await;
		info!(target = "courtside_cli", intent = %parsed.intent, date = ?parsed.date, time = ?parsed.time, "chat message");

		let friendly = parsed.message().map(str::to_string);
		let mut reply = ChatReply {
			text: String::new(),
			intent: parsed.intent,
			date: parsed.date.clone(),
			time: parsed.time.clone(),
			slot_count: 0,
		};

		reply.text = match parsed.intent {
			Intent::Greeting => friendly.unwrap_or_else(|| DEFAULT_GREETING.to_string()),
			Intent::Help => HELP_TEXT.to_string(),
			intent if intent.wants_schedule() => {
				let date = parsed.date.as_deref().and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
				match date {
					None => NEED_DATE.to_string(),
					Some(date) => {
						let (text, count) = self.availability(parsed.intent, date, parsed.time.as_deref(), friendly).await;
						reply.slot_count = count;
						text
					}
				}
			}
			_ => friendly.unwrap_or_else(|| FALLBACK.to_string()),
		};

		self.push(ChatTurn::assistant(reply.text.clone()));
		reply
	}

	async fn availability(&mut self, intent: Intent, date: NaiveDate, time: Option<&str>, friendly: Option<String>) -> (String, usize) {
		let slots = match self.lookup.slots_on(date).await {
			Ok(slots) => slots,
			Err(CliError::LoginFailed(reason)) => {
				warn!(target = "courtside_cli", reason = %reason, "vendor login failed during chat");
				return (LOGIN_FAILED.to_string(), 0);
			}
			Err(CliError::Vendor(courtside::Error::SessionExpired)) => {
				warn!(target = "courtside_cli", "vendor session expired during chat");
				return (SESSION_EXPIRED.to_string(), 0);
			}
			Err(err) => {
				warn!(target = "courtside_cli", error = %err, "schedule lookup failed during chat");
				return (FETCH_FAILED.to_string(), 0);
			}
		};

		let matching: Vec<Slot> = slots
			.into_iter()
			.filter(|s| s.date() == Some(date))
			.filter(|s| time.is_none_or(|t| s.time_of_day() == Some(t)))
			.collect();

		let day = date.format("%A, %B %d");
		if matching.is_empty() {
			let text = match time {
				Some(t) => format!("No slots available on {day} at {t}. Try a different time!"),
				None => format!("No slots available on {day}. Try another day!"),
			};
			return (text, 0);
		}

		let url = self.lookup.booking_url();
		let mut text = friendly.map(|f| format!("{f}\n\n")).unwrap_or_default();
		text.push_str(&format!("**Available on {day}:**\n\n{}\n\n", format_slots(&matching, DEFAULT_MAX_SLOTS)));
		if intent == Intent::Book {
			text.push_str(&format!("👉 [Click here to book]({url})"));
		} else {
			text.push_str(&format!("💡 Want to book? [Click here]({url})"));
		}
		(text, matching.len())
	}

	fn push(&mut self, turn: ChatTurn) {
		self.history.push(turn);
		if self.history.len() > MAX_HISTORY {
			let excess = self.history.len() - MAX_HISTORY;
			self.history.drain(..excess);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::{Arc, Mutex};
	use std::time::Duration;

	use chrono::Local;
	use courtside::ClientConfig;
	use courtside::protocol::{IntentReply, SESSION_COOKIE, endpoints};
	use courtside::transport::{TransportError, VendorRequest, VendorResponse};
	use serde_json::{Value, json};

	use super::*;

	struct FixedParser(IntentReply);

	impl IntentParser for FixedParser {
		fn parse<'a>(&'a self, _text: &'a str, _history: &'a [ChatTurn]) -> BoxFut<'a, IntentReply> {
			let reply = self.0.clone();
			Box::pin(async move { reply })
		}
	}

	#[derive(Clone, Default)]
	struct FakeLookup {
		slots: Vec<Slot>,
		fail_login: bool,
		expired: bool,
		asked: Arc<Mutex<Vec<NaiveDate>>>,
	}

	impl SlotLookup for FakeLookup {
		fn slots_on(&mut self, date: NaiveDate) -> BoxFut<'_, Result<Vec<Slot>, CliError>> {
			self.asked.lock().unwrap().push(date);
			let result = if self.fail_login {
				Err(CliError::LoginFailed("bad password".into()))
			} else if self.expired {
				Err(CliError::Vendor(courtside::Error::SessionExpired))
			} else {
				Ok(self.slots.clone())
			};
			Box::pin(async move { result })
		}

		fn booking_url(&self) -> String {
			"https://vendor.test/book".into()
		}
	}

	fn slot(start: &str) -> Slot {
		Slot {
			start_time: start.into(),
			end_time: start.replace(":00:00", ":30:00"),
			duration: "PT30M".into(),
			status: "Bookable".into(),
			id: Value::Null,
			available_durations: vec![],
		}
	}

	fn reply(intent: Intent, date: Option<&str>, time: Option<&str>, friendly: Option<&str>) -> IntentReply {
		IntentReply {
			intent,
			date: date.map(Into::into),
			time: time.map(Into::into),
			friendly_response: friendly.map(Into::into),
		}
	}

	fn friday_lookup() -> FakeLookup {
		FakeLookup {
			slots: vec![slot("2025-10-10T06:00:00"), slot("2025-10-10T18:00:00"), slot("2025-10-11T18:00:00")],
			..FakeLookup::default()
		}
	}

	#[tokio::test]
	async fn greeting_uses_model_text_or_default() {
		let mut chat = ChatResponder::new(FixedParser(reply(Intent::Greeting, None, None, Some("Hi there!"))), FakeLookup::default());
		assert_eq!(chat.respond("hey").await.text, "Hi there!");

		let mut chat = ChatResponder::new(FixedParser(reply(Intent::Greeting, None, None, None)), FakeLookup::default());
		assert_eq!(chat.respond("hey").await.text, DEFAULT_GREETING);
	}

	#[tokio::test]
	async fn help_is_fixed_text() {
		let mut chat = ChatResponder::new(FixedParser(reply(Intent::Help, None, None, Some("ignored"))), FakeLookup::default());
		assert_eq!(chat.respond("help").await.text, HELP_TEXT);
	}

	#[tokio::test]
	async fn availability_without_date_asks_for_one() {
		let lookup = FakeLookup::default();
		let asked = lookup.asked.clone();
		let mut chat = ChatResponder::new(FixedParser(reply(Intent::CheckAvailability, None, None, None)), lookup);

		assert_eq!(chat.respond("anything free?").await.text, NEED_DATE);
		assert!(asked.lock().unwrap().is_empty());
	}

	#[tokio::test]
	async fn availability_lists_slots_for_the_day_with_link() {
		let lookup = friday_lookup();
		let asked = lookup.asked.clone();
		let parsed = reply(Intent::CheckAvailability, Some("2025-10-10"), None, Some("Here you go!"));
		let mut chat = ChatResponder::new(FixedParser(parsed), lookup);

		let answer = chat.respond("what's free friday?").await;
		assert_eq!(answer.slot_count, 2);
		assert!(answer.text.starts_with("Here you go!\n\n**Available on Friday, October 10:**\n\n1. **06:00 AM**"));
		assert!(answer.text.ends_with("💡 Want to book? [Click here](https://vendor.test/book)"));
		assert_eq!(*asked.lock().unwrap(), vec![NaiveDate::from_ymd_opt(2025, 10, 10).unwrap()]);
	}

	#[tokio::test]
	async fn booking_filters_by_time() {
		let parsed = reply(Intent::Book, Some("2025-10-10"), Some("18:00"), None);
		let mut chat = ChatResponder::new(FixedParser(parsed), friday_lookup());

		let answer = chat.respond("book friday 6pm").await;
		assert_eq!(answer.slot_count, 1);
		assert!(answer.text.starts_with("**Available on Friday, October 10:**\n\n1. **06:00 PM** - 06:30 PM (30 min)"));
		assert!(answer.text.ends_with("👉 [Click here to book](https://vendor.test/book)"));
	}

	#[tokio::test]
	async fn no_matching_slots_suggests_alternatives() {
		let parsed = reply(Intent::Book, Some("2025-10-10"), Some("09:00"), None);
		let mut chat = ChatResponder::new(FixedParser(parsed), friday_lookup());
		assert_eq!(chat.respond("9am?").await.text, "No slots available on Friday, October 10 at 09:00. Try a different time!");

		let parsed = reply(Intent::CheckAvailability, Some("2025-10-12"), None, None);
		let mut chat = ChatResponder::new(FixedParser(parsed), friday_lookup());
		assert_eq!(chat.respond("sunday?").await.text, "No slots available on Sunday, October 12. Try another day!");
	}

	#[tokio::test]
	async fn login_failure_points_at_credentials() {
		let lookup = FakeLookup {
			fail_login: true,
			..FakeLookup::default()
		};
		let mut chat = ChatResponder::new(FixedParser(reply(Intent::Book, Some("2025-10-10"), None, None)), lookup);
		assert_eq!(chat.respond("book friday").await.text, LOGIN_FAILED);
	}

	#[tokio::test]
	async fn expired_session_gets_its_own_reply() {
		let lookup = FakeLookup {
			expired: true,
			..FakeLookup::default()
		};
		let mut chat = ChatResponder::new(FixedParser(reply(Intent::CheckAvailability, Some("2025-10-10"), None, None)), lookup);
		assert_eq!(chat.respond("friday?").await.text, SESSION_EXPIRED);
	}

	/// Answers logins with a session cookie and schedules with one slot on `day`.
	struct StubVendor {
		day: NaiveDate,
		logins: AtomicUsize,
	}

	impl StubVendor {
		fn new(day: NaiveDate) -> Self {
			Self {
				day,
				logins: AtomicUsize::new(0),
			}
		}
	}

	impl Transport for StubVendor {
		fn send<'a>(&'a self, request: &'a VendorRequest) -> BoxFut<'a, Result<VendorResponse, TransportError>> {
			Box::pin(async move {
				if request.url.ends_with(endpoints::LOGIN) {
					let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
					let body = json!({
						"User": { "Member": { "Id": 7, "Email": "ada@example.com", "FirstName": "Ada", "LastName": "L" } }
					});
					return Ok(VendorResponse::new(200, body.to_string()).with_cookie(SESSION_COOKIE, format!("tok-{n}")));
				}
				let cell = json!({
					"Status": "Bookable",
					"StartTime": format!("{}T18:00:00", self.day),
					"EndTime": format!("{}T18:30:00", self.day),
					"BookingDuration": "PT30M",
					"Id": 1,
					"Durations": ["PT30M"]
				});
				let grid = json!({ "CalendarData": [{ "ClassesPerDay": [[cell]] }] });
				Ok(VendorResponse::new(200, grid.to_string()))
			})
		}
	}

	fn vendor_lookup(refreshable: bool) -> (VendorLookup<StubVendor>, NaiveDate) {
		let today = Local::now().date_naive();
		let config = ClientConfig::default()
			.with_base_url("http://vendor.test")
			.with_session_timeout(Duration::from_millis(20))
			.with_refreshable(refreshable);
		let client = Client::with_transport(config, StubVendor::new(today));
		let creds = VendorCredentials {
			email: "ada@example.com".into(),
			password: "pw".into(),
		};
		(VendorLookup::new(client, Some(creds)), today)
	}

	#[tokio::test]
	async fn lookup_releases_credentials_after_login() {
		let (mut lookup, today) = vendor_lookup(false);
		assert!(lookup.credentials.is_some());

		assert_eq!(lookup.slots_on(today).await.unwrap().len(), 1);
		assert!(lookup.credentials.is_none());
	}

	#[tokio::test]
	async fn lapsed_fixed_session_reports_expiry() {
		let (mut lookup, today) = vendor_lookup(false);
		assert_eq!(lookup.slots_on(today).await.unwrap().len(), 1);

		tokio::time::sleep(Duration::from_millis(60)).await;
		let err = lookup.slots_on(today).await.unwrap_err();
		assert!(matches!(err, CliError::Vendor(courtside::Error::SessionExpired)), "{err:?}");
		assert!(lookup.credentials.is_none());
		assert_eq!(lookup.client.transport().logins.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn lapsed_refreshable_session_renews_itself() {
		let (mut lookup, today) = vendor_lookup(true);
		assert_eq!(lookup.slots_on(today).await.unwrap().len(), 1);

		tokio::time::sleep(Duration::from_millis(60)).await;
		assert_eq!(lookup.slots_on(today).await.unwrap().len(), 1);
		assert!(lookup.credentials.is_none());
		assert_eq!(lookup.client.transport().logins.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn unknown_falls_back_to_suggestions() {
		let mut chat = ChatResponder::new(FixedParser(IntentReply::unknown("")), FakeLookup::default());
		assert_eq!(chat.respond("purple?").await.text, FALLBACK);

		let mut chat = ChatResponder::new(FixedParser(IntentReply::unknown("Sorry, say again?")), FakeLookup::default());
		assert_eq!(chat.respond("purple?").await.text, "Sorry, say again?");
	}

	#[tokio::test]
	async fn history_records_both_sides_and_is_bounded() {
		let mut chat = ChatResponder::new(FixedParser(reply(Intent::Help, None, None, None)), FakeLookup::default());
		chat.respond("help").await;
		assert_eq!(chat.history().len(), 2);
		assert_eq!(chat.history()[0], ChatTurn::user("help"));

		for _ in 0..30 {
			chat.respond("help").await;
		}
		assert_eq!(chat.history().len(), MAX_HISTORY);
	}
}
