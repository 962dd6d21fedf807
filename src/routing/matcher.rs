//! Page route matching module
//!
//! Implements the anchored path pattern `/(view|edit|save)/<title>` where
//! the title is one or more ASCII alphanumerics. Everything else is a miss.

/// The three supported page operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Save,
}

impl Action {
    /// Parse the first path segment into an action
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "save" => Some(Self::Save),
            _ => None,
        }
    }
}

/// A matched page route: the action and the title it applies to.
///
/// Borrows the title from the request path; per-request only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub action: Action,
    pub title: &'a str,
}

/// Match a request path against the page route pattern
///
/// The match is anchored at both ends: the path must be exactly
/// `/<action>/<title>` with no trailing segments. Restricting titles to
/// ASCII alphanumerics excludes `.` and `/`, so crafted paths like
/// `/view/../../etc/passwd` can never reach the page store.
pub fn match_path(path: &str) -> Option<RouteMatch<'_>> {
    let rest = path.strip_prefix('/')?;
    let (segment, title) = rest.split_once('/')?;
    let action = Action::from_segment(segment)?;

    if title.is_empty() || !title.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }

    Some(RouteMatch { action, title })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_view() {
        let m = match_path("/view/TestPage").unwrap();
        assert_eq!(m.action, Action::View);
        assert_eq!(m.title, "TestPage");
    }

    #[test]
    fn test_match_edit_and_save() {
        assert_eq!(match_path("/edit/abc123").unwrap().action, Action::Edit);
        assert_eq!(match_path("/save/ABC").unwrap().action, Action::Save);
    }

    #[test]
    fn test_reject_unknown_action() {
        assert!(match_path("/delete/TestPage").is_none());
        assert!(match_path("/views/TestPage").is_none());
    }

    #[test]
    fn test_reject_empty_title() {
        assert!(match_path("/view/").is_none());
        assert!(match_path("/view").is_none());
        assert!(match_path("/").is_none());
        assert!(match_path("").is_none());
    }

    #[test]
    fn test_reject_traversal() {
        assert!(match_path("/view/../../etc/passwd").is_none());
        assert!(match_path("/nonexistent/../../etc/passwd").is_none());
        assert!(match_path("/save/..").is_none());
        assert!(match_path("/edit/a.txt").is_none());
    }

    #[test]
    fn test_reject_extra_segments() {
        assert!(match_path("/view/Test/Page").is_none());
        assert!(match_path("/view/Test/").is_none());
    }

    #[test]
    fn test_reject_non_alphanumeric_title() {
        assert!(match_path("/view/hello-world").is_none());
        assert!(match_path("/view/hello world").is_none());
        assert!(match_path("/view/h%2e").is_none());
        // Title class is ASCII only
        assert!(match_path("/view/日記").is_none());
    }

    #[test]
    fn test_reject_unanchored() {
        assert!(match_path("view/TestPage").is_none());
        assert!(match_path("//view/TestPage").is_none());
    }
}
