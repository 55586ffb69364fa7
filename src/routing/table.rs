//! The fixed dispatch table.
//!
//! # Design Decisions
//! - The route set is data, not control flow: an ordered table of
//!   (path, action) pairs that can be tested without the HTTP transport
//! - Paths are normalized to lowercase before matching
//! - First match wins; no match means a 404 error page

use crate::http::facts::fields;

/// What to do with a matched path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Write a single fact field as plain text.
    Field(&'static str),
    /// Render the index page with the full fact set.
    Index,
}

/// One entry in the dispatch table.
#[derive(Debug)]
pub struct Route {
    pub path: &'static str,
    pub action: Action,
}

/// The fixed route table. Order matters only for readability; paths are
/// exact and disjoint.
pub const TABLE: &[Route] = &[
    Route {
        path: "/ip",
        action: Action::Field(fields::IP),
    },
    Route {
        path: "/user-agent",
        action: Action::Field(fields::USER_AGENT),
    },
    Route {
        path: "/host",
        action: Action::Field(fields::HOST),
    },
    Route {
        path: "/proto",
        action: Action::Field(fields::PROTO),
    },
    Route {
        path: "/accept",
        action: Action::Field(fields::ACCEPT),
    },
    Route {
        path: "/accept-encoding",
        action: Action::Field(fields::ACCEPT_ENCODING),
    },
    Route {
        path: "/",
        action: Action::Index,
    },
];

/// Look up a request path in the table.
///
/// The path is lowercased first, so `/IP` and `/ip` dispatch identically.
pub fn lookup(path: &str) -> Option<Action> {
    let normalized = path.to_ascii_lowercase();
    TABLE
        .iter()
        .find(|route| route.path == normalized)
        .map(|route| route.action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_path_dispatches() {
        assert_eq!(lookup("/ip"), Some(Action::Field(fields::IP)));
        assert_eq!(
            lookup("/user-agent"),
            Some(Action::Field(fields::USER_AGENT))
        );
        assert_eq!(lookup("/host"), Some(Action::Field(fields::HOST)));
        assert_eq!(lookup("/proto"), Some(Action::Field(fields::PROTO)));
        assert_eq!(lookup("/accept"), Some(Action::Field(fields::ACCEPT)));
        assert_eq!(
            lookup("/accept-encoding"),
            Some(Action::Field(fields::ACCEPT_ENCODING))
        );
    }

    #[test]
    fn test_root_renders_index() {
        assert_eq!(lookup("/"), Some(Action::Index));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("/IP"), Some(Action::Field(fields::IP)));
        assert_eq!(
            lookup("/User-Agent"),
            Some(Action::Field(fields::USER_AGENT))
        );
    }

    #[test]
    fn test_unknown_path_has_no_route() {
        assert_eq!(lookup("/nope"), None);
        assert_eq!(lookup("/ip/extra"), None);
        assert_eq!(lookup(""), None);
    }
}
