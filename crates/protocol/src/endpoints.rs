//! Vendor endpoint paths, relative to the portal base URL.

/// Default portal host.
pub const DEFAULT_BASE_URL: &str = "https://statesportcentres.perfectgym.com.au";

/// Cookie that carries the bearer token after a successful login.
pub const SESSION_COOKIE: &str = "CpAuthToken";

pub const LOGIN: &str = "/ClientPortal2/Auth/Login";
pub const WEEKLY_SCHEDULE: &str = "/ClientPortal2/FacilityBookings/FacilityCalendar/GetWeeklySchedule";
pub const WIZARD_START: &str = "/ClientPortal2/FacilityBookings/BookFacility/Start";
pub const WIZARD_DETAILS: &str = "/ClientPortal2/FacilityBookings/WizardSteps/SetFacilityBookingDetailsWizardStep/Next";
pub const WIZARD_CONFIRM: &str = "/ClientPortal2/FacilityBookings/WizardSteps/ChooseBookingRuleStep/Next";
pub const MY_BOOKINGS: &str = "/Api/FacilityBooking/MyBookings";
pub const CANCEL_BOOKING: &str = "/Api/FacilityBooking/Cancel";
pub const LOGOUT: &str = "/Api/Users/Logout";

/// Browser entry point of the client portal (used as wizard redirect target).
pub const PORTAL_HOME: &str = "/ClientPortal2/";

/// Browser page hosting the facility calendar.
pub const BROWSER_BOOKING_PAGE: &str = "/ClientPortal2/#/FacilityBooking";

/// Browser page listing the member's bookings.
pub const BROWSER_MY_BOOKINGS_PAGE: &str = "/ClientPortal2/#/MyBookings";
