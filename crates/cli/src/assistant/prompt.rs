//! Prompt text sent to the language model.

use std::fmt::Write as _;

use chrono::{Days, NaiveDate};
use courtside::protocol::{ChatRole, ChatTurn};

/// Turns of earlier conversation included as context.
pub const HISTORY_TURNS: usize = 6;

pub fn build_prompt(message: &str, history: &[ChatTurn], today: NaiveDate) -> String {
	let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);

	let mut context = String::new();
	if history.len() > 1 {
		context.push_str("\nEarlier in this conversation:\n");
		let start = history.len().saturating_sub(HISTORY_TURNS);
		for turn in &history[start..] {
			let speaker = match turn.role {
				ChatRole::User => "User",
				ChatRole::Assistant => "Assistant",
			};
			let _ = writeln!(context, "{speaker}: {}", turn.content);
		}
	}

	format!(
		r#"You help members of a sports centre find and book badminton courts. Today is {today_long}.
{context}
The member wrote: "{message}"

Work out what they want, pick out any date and time they mention (follow-ups such as "and the day after?" refer back to the conversation), and write a short, warm reply.

Dates:
- "today" means {today_iso}
- "tomorrow" means {tomorrow_iso}
- a weekday name means its next occurrence, "next Friday" means the coming Friday
- if they asked about one day and now say "what about Friday", they mean this Friday

Times:
- "6pm", "6 pm" and "18:00" all mean 18:00
- "morning" or "evening" without a clock time means null
- accept any reasonable time notation

Intents:
- "check_availability": they want to see free courts
- "book": they want to book a court
- "help": they need help using the assistant
- "greeting": they are saying hello
- "unknown": anything else

Answer with JSON only:
{{
  "intent": "check_availability" | "book" | "help" | "greeting" | "unknown",
  "date": "YYYY-MM-DD" or null,
  "time": "HH:MM" or null,
  "friendly_response": "a natural reply showing you understood the request"
}}"#,
		today_long = today.format("%A, %B %d, %Y"),
		today_iso = today.format("%Y-%m-%d"),
		tomorrow_iso = tomorrow.format("%Y-%m-%d"),
	)
}
