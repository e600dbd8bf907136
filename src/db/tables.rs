use redb::TableDefinition;

/// Users table: user_id (UUID v4) -> UserRecord (serialized)
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Email index: lowercased email -> user_id
/// Used for login and duplicate-registration checks
pub const USERS_BY_EMAIL: TableDefinition<&str, &str> = TableDefinition::new("users_by_email");

/// Food logs table: log_id -> FoodLog (serialized)
pub const FOOD_LOGS: TableDefinition<&str, &[u8]> = TableDefinition::new("food_logs");

/// Exercise logs table: log_id -> ExerciseLog (serialized)
pub const EXERCISE_LOGS: TableDefinition<&str, &[u8]> = TableDefinition::new("exercise_logs");

/// Sleep logs table: log_id -> SleepLog (serialized)
pub const SLEEP_LOGS: TableDefinition<&str, &[u8]> = TableDefinition::new("sleep_logs");

/// Per-user food log index: user_id -> Vec<log_id>
/// Used for listing and cascade delete when a user is removed
pub const USER_FOOD_LOGS: TableDefinition<&str, &[u8]> = TableDefinition::new("user_food_logs");

/// Per-user exercise log index: user_id -> Vec<log_id>
pub const USER_EXERCISE_LOGS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("user_exercise_logs");

/// Per-user sleep log index: user_id -> Vec<log_id>
pub const USER_SLEEP_LOGS: TableDefinition<&str, &[u8]> = TableDefinition::new("user_sleep_logs");

/// Profiles table: user_id -> ProfileRecord (serialized)
pub const PROFILES: TableDefinition<&str, &[u8]> = TableDefinition::new("profiles");

/// Rate limits table: user_id -> RateLimitRecord (serialized)
pub const RATE_LIMITS: TableDefinition<&str, &[u8]> = TableDefinition::new("rate_limits");
