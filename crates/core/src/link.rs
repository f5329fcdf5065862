//! Browser deep links into the vendor portal.
//!
//! The portal's calendar page accepts club and zone type, but no parameter that
//! selects a specific slot, so the user still picks the slot by hand.

use courtside_protocol::endpoints;

use crate::client::Client;
use crate::config::ClientConfig;
use crate::transport::Transport;

/// Calendar page pre-filtered to the configured club and zone type.
pub fn booking_url(config: &ClientConfig) -> String {
	format!(
		"{}?clubId={}&zoneTypeId={}",
		config.endpoint(endpoints::BROWSER_BOOKING_PAGE),
		config.club_id,
		config.zone_type_id
	)
}

/// The member's booking list.
pub fn my_bookings_url(config: &ClientConfig) -> String {
	config.endpoint(endpoints::BROWSER_MY_BOOKINGS_PAGE)
}

impl<T: Transport> Client<T> {
	/// Deep link for booking a slot. `start_time` and `zone_id` are accepted for
	/// call-site symmetry but are not encoded into the URL.
	pub fn booking_url(&self, _start_time: Option<&str>, _zone_id: Option<u32>) -> String {
		booking_url(&self.config)
	}

	pub fn my_bookings_url(&self) -> String {
		my_bookings_url(&self.config)
	}
}
