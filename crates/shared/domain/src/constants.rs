//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_USER: &str = "USER";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "ADMIN";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Lowest accepted place rating
pub const MIN_RATING: f64 = 0.0;

/// Highest accepted place rating
pub const MAX_RATING: f64 = 5.0;

/// Number of operating-hour rows every place carries (one per weekday)
pub const DAYS_PER_WEEK: usize = 7;

/// Weekday labels in display order
pub const WEEKDAYS: [&str; DAYS_PER_WEEK] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// =============================================================================
// Category defaults
// =============================================================================

/// Icon key used by the "Add category" template
pub const DEFAULT_CATEGORY_ICON: &str = "Coffee";

/// Color used by the "Add category" template
pub const DEFAULT_CATEGORY_COLOR: &str = "#6366F1";

/// Icon keys known to the front-end icon registry
pub const CATEGORY_ICONS: &[&str] = &[
    "Coffee",
    "Utensils",
    "Wine",
    "Music",
    "ShoppingBag",
    "Hotel",
    "Dumbbell",
    "Palette",
    "Trees",
    "Landmark",
    "Film",
    "Heart",
];

/// Default opening time for new operating-hour rows
pub const DEFAULT_OPEN_TIME: &str = "09:00";

/// Default closing time for new operating-hour rows
pub const DEFAULT_CLOSE_TIME: &str = "17:00";
