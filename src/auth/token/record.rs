//! Immutable ticket record cached between page loads.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Seconds a fetched ticket pair stays reusable.
pub const TICKET_TTL_SECS: i64 = 7200;

/// Freshness classification for an optional cached record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketStatus {
	/// No record was cached (or the payload could not be decoded).
	Absent,
	/// The record may be reused without contacting the platform.
	Fresh,
	/// The record outlived [`TICKET_TTL_SECS`] and must be replaced.
	Stale,
}

/// Access token + `jsapi_ticket` pair stamped with the instant it was obtained.
///
/// Records are superseded, never mutated: every remote fetch builds a new one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
	/// Access token used to obtain the ticket; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// `jsapi_ticket` signed into every config; callers must avoid logging it.
	pub ticket: TokenSecret,
	/// UTC epoch seconds at which the pair was fetched.
	pub obtained_at: i64,
}
impl TicketRecord {
	/// Builds a record from freshly fetched secrets.
	pub fn new(
		access_token: impl Into<String>,
		ticket: impl Into<String>,
		obtained_at: i64,
	) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			ticket: TokenSecret::new(ticket),
			obtained_at,
		}
	}

	/// Returns `true` while `now - obtained_at < TICKET_TTL_SECS`.
	pub fn is_fresh_at(&self, now: i64) -> bool {
		now < self.obtained_at.saturating_add(TICKET_TTL_SECS)
	}

	/// Classifies an optional record at the provided instant.
	pub fn status_at(record: Option<&Self>, now: i64) -> TicketStatus {
		match record {
			None => TicketStatus::Absent,
			Some(record) if record.is_fresh_at(now) => TicketStatus::Fresh,
			Some(_) => TicketStatus::Stale,
		}
	}
}
impl Debug for TicketRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TicketRecord")
			.field("access_token", &"<redacted>")
			.field("ticket", &"<redacted>")
			.field("obtained_at", &self.obtained_at)
			.finish()
	}
}

/// Current UTC instant as epoch seconds.
pub fn unix_now() -> i64 {
	OffsetDateTime::now_utc().unix_timestamp()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn freshness_boundary_is_exclusive() {
		let record = TicketRecord::new("token", "ticket", 1_000);

		assert!(record.is_fresh_at(1_000));
		assert!(record.is_fresh_at(1_000 + TICKET_TTL_SECS - 1));
		assert!(!record.is_fresh_at(1_000 + TICKET_TTL_SECS));
		assert!(!record.is_fresh_at(1_000 + TICKET_TTL_SECS + 1));
	}

	#[test]
	fn status_covers_absent_fresh_and_stale() {
		let record = TicketRecord::new("token", "ticket", 50);

		assert_eq!(TicketRecord::status_at(None, 50), TicketStatus::Absent);
		assert_eq!(TicketRecord::status_at(Some(&record), 60), TicketStatus::Fresh);
		assert_eq!(TicketRecord::status_at(Some(&record), 50 + TICKET_TTL_SECS), TicketStatus::Stale);
	}

	#[test]
	fn debug_output_redacts_secrets() {
		let record = TicketRecord::new("access-secret", "ticket-secret", 7);
		let rendered = format!("{record:?}");

		assert!(!rendered.contains("access-secret"));
		assert!(!rendered.contains("ticket-secret"));
		assert!(rendered.contains("obtained_at: 7"));
	}

	#[test]
	fn unix_now_is_after_2020() {
		assert!(unix_now() > 1_577_836_800);
	}
}
