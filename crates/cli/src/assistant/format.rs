//! Markdown-ish rendering of slot lists for chat replies and text output.

use std::sync::LazyLock;

use courtside::Slot;
use regex_lite::Regex;

pub const DEFAULT_MAX_SLOTS: usize = 8;
pub const NO_SLOTS: &str = "No available slots found.";

static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)H").unwrap());
static MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)M").unwrap());

/// `PT1H30M` -> `1 hour 30 min`; tokens with neither part render as `Unknown`.
pub fn format_duration(token: &str) -> String {
	let capture = |re: &Regex| -> u32 {
		re.captures(token)
			.and_then(|c| c.get(1))
			.and_then(|m| m.as_str().parse().ok())
			.unwrap_or(0)
	};
	let hours = capture(&HOURS_RE);
	let minutes = capture(&MINUTES_RE);

	let mut parts = Vec::new();
	match hours {
		0 => {}
		1 => parts.push("1 hour".to_string()),
		h => parts.push(format!("{h} hours")),
	}
	if minutes > 0 {
		parts.push(format!("{minutes} min"));
	}
	if parts.is_empty() { "Unknown".to_string() } else { parts.join(" ") }
}

fn clock(slot_time: Option<chrono::NaiveDateTime>, raw: &str) -> String {
	match slot_time {
		Some(t) => t.format("%I:%M %p").to_string(),
		None => raw.to_string(),
	}
}

/// Numbered list of at most `max` slots, with a count of the rest.
pub fn format_slots(slots: &[Slot], max: usize) -> String {
	if slots.is_empty() {
		return NO_SLOTS.to_string();
	}

	let lines: Vec<String> = slots
		.iter()
		.take(max)
		.enumerate()
		.map(|(i, slot)| {
			format!(
				"{}. **{}** - {} ({})",
				i + 1,
				clock(slot.start(), &slot.start_time),
				clock(slot.end(), &slot.end_time),
				format_duration(&slot.duration)
			)
		})
		.collect();

	let mut text = lines.join("\n");
	if slots.len() > max {
		text.push_str(&format!("\n\n...and **{} more slots** available", slots.len() - max));
	}
	text
}

/// Every slot, grouped under one heading per day. Slots must be sorted by start.
pub fn format_schedule(slots: &[Slot]) -> String {
	if slots.is_empty() {
		return NO_SLOTS.to_string();
	}
	slots
		.chunk_by(|a, b| a.date() == b.date())
		.map(|day| {
			let heading = match day[0].date() {
				Some(date) => date.format("%A, %B %d").to_string(),
				None => "Unknown date".to_string(),
			};
			format!("**{heading}:**\n\n{}", format_slots(day, day.len()))
		})
		.collect::<Vec<_>>()
		.join("\n\n")
}
