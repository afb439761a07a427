//! Invocation parameter parsing.
//!
//! A host passes the bootstrap a single option string of the form
//! `descriptor-path;key_1=value_1;key_2=value_2`. The first token is the
//! descriptor path; every later token is an external key/value parameter
//! consulted during placeholder resolution.

use std::collections::HashMap;

use tracing::warn;

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;

/// Key under which the descriptor path is stored in the parameter map.
pub const DESCRIPTOR_PATH_KEY: &str = "agent-configuration-path";

/// Parses the invocation string into the parameter map.
///
/// A token that is not a `key=value` pair (after the leading path token)
/// is logged and skipped; a malformed parameter never aborts the boot.
pub fn parse_invocation(invocation: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let mut first = true;
    for token in invocation.split(';').filter(|token| !token.is_empty()) {
        if first {
            params.insert(DESCRIPTOR_PATH_KEY.to_string(), token.to_string());
            first = false;
            continue;
        }
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                params.insert(key.to_string(), value.to_string());
            }
            _ => {
                warn!("Invalid invocation parameter \"{}\": it must be a key=value pair", token);
            }
        }
    }
    params
}
