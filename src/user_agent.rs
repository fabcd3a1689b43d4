//! User-Agent string sent with every Wikipedia / Wikimedia request.
//!
//! The Wikimedia API etiquette requires a client name plus a way to contact
//! the operator. The contact part comes from the environment so that it never
//! has to be committed.

/// Environment variable holding the operator contact (email or URL).
pub const CONTACT_ENV_VAR: &str = "ONTHISDAY_USER_AGENT_CONTACT";

/// Contact used when [`CONTACT_ENV_VAR`] is unset or blank.
const FALLBACK_CONTACT: &str = "contact not configured";

/// Reads the operator contact from the environment, ignoring blank values.
#[must_use]
pub fn contact_from_env() -> Option<String> {
    std::env::var(CONTACT_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Builds the User-Agent for a given contact string.
#[must_use]
pub fn user_agent_with_contact(contact: Option<&str>) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let contact = contact
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(FALLBACK_CONTACT);
    format!("onthisday/{version} (geo-events-research-tool; {contact})")
}

/// Default User-Agent built from [`CONTACT_ENV_VAR`].
#[must_use]
pub fn default_user_agent() -> String {
    user_agent_with_contact(contact_from_env().as_deref())
}
