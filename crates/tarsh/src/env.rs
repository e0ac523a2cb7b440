//! Host environment lookups.

/// Variables consulted for the session user, in order.
const USER_VARS: [&str; 3] = ["USER", "LOGNAME", "USERNAME"];

/// Fallback when the environment does not name a user.
pub const DEFAULT_USER: &str = "user";

/// Name of the user owning this process, as reported by the environment.
pub fn current_user() -> String {
    user_from(|key| std::env::var(key).ok())
}

fn user_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    USER_VARS
        .iter()
        .filter_map(|key| lookup(key))
        .find(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER.to_string())
}
