use validator::ValidationErrors;

use crate::domain::identity::Identity;

pub(crate) mod auth;
pub(crate) mod pages;
pub(crate) mod posts;

/// Viewer fields every page carries so the front end can render the
/// login/logout chrome.
pub(crate) fn viewer(identity: &Identity) -> (bool, Option<i64>) {
    (identity.is_authenticated(), identity.user_id())
}

/// Flattens form validation errors into one flash-sized line.
pub(crate) fn validation_flash_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();

    if messages.is_empty() {
        "invalid input".to_string()
    } else {
        messages.join("; ")
    }
}
