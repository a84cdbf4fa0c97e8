/// Number of days ahead to sync when no range is given
pub const DEFAULT_SYNC_DAYS: i64 = 30;

/// Two times at most this many seconds apart are the same time
pub const TIME_MATCH_TOLERANCE_SECS: i64 = 60;

/// A start or end moving by more than this many seconds is a reschedule
pub const RESCHEDULE_THRESHOLD_SECS: i64 = 300;

/// Zone used to read naive times when none is configured
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
