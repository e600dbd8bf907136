/// Default trailing window for reports, in days
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Longest report window a client may request, in days
pub const MAX_WINDOW_DAYS: u32 = 365;

/// Upper bound on a single night's credited sleep, in hours
/// Durations beyond this are clamped to absorb bad input.
pub const MAX_SLEEP_HOURS: f64 = 24.0;

/// Maximum log writes per hour per user
pub const MAX_LOG_WRITES_PER_HOUR: u32 = 60;

/// Maximum log writes per day per user
pub const MAX_LOG_WRITES_PER_DAY: u32 = 500;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum accepted password length
pub const MAX_PASSWORD_LEN: usize = 128;

/// Maximum length of user-supplied names (display name, food, activity)
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of an email address (RFC 5321 limit)
pub const MAX_EMAIL_LEN: usize = 254;

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for an unparsable or out-of-range report window
pub const ERR_INVALID_WINDOW: &str = "days must be a positive integer";

/// Error message for invalid email format
pub const ERR_INVALID_EMAIL: &str = "Invalid email address";

/// Error message for a missing or empty display name
pub const ERR_INVALID_NAME: &str = "Name must not be empty";

/// Detailed error message for password length validation
pub const ERR_INVALID_PASSWORD: &str = "Password must be between 8 and 128 characters";

/// Error message for negative numeric log fields
pub const ERR_NEGATIVE_VALUE: &str = "Numeric values must be non-negative";

/// Error message for an unknown export kind
pub const ERR_INVALID_EXPORT_KIND: &str = "kind must be one of: food, exercise, sleep";
