/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// SLA window: an unresolved report becomes overdue this many hours after creation
pub const SLA_WINDOW_HOURS: i64 = 48;
