//! Capability tags checked by the role guards.

use serde::{Deserialize, Serialize};

/// Roles understood by the API.
///
/// Users store roles as free-form string tags; a role is granted only by an
/// exact tag match. Unknown tags are kept but grant nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May create and delete currencies and edit rates.
    Editor,
    /// May list currencies and convert amounts.
    Viewer,
}

impl Role {
    /// Role assigned to newly registered users.
    pub const DEFAULT: Self = Self::Viewer;

    /// Returns the tag stored on users and in token claims.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }

    /// Returns the capitalized name used in access-denied messages.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Editor => "Editor",
            Self::Viewer => "Viewer",
        }
    }

    /// Parses an exact role tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "editor" => Some(Self::Editor),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Returns true if `tags` contains this role's tag exactly.
    #[must_use]
    pub fn is_granted_to(self, tags: &[String]) -> bool {
        tags.iter().any(|t| t == self.tag())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[rstest]
    #[case(Role::Editor, &["editor"], true)]
    #[case(Role::Editor, &["viewer", "editor"], true)]
    #[case(Role::Editor, &["viewer"], false)]
    #[case(Role::Editor, &[], false)]
    #[case(Role::Editor, &["Editor"], false)]
    #[case(Role::Viewer, &["viewer"], true)]
    #[case(Role::Viewer, &["editor"], false)]
    #[case(Role::Viewer, &["viewers"], false)]
    fn test_role_membership(#[case] role: Role, #[case] held: &[&str], #[case] expected: bool) {
        assert_eq!(role.is_granted_to(&tags(held)), expected);
    }

    #[test]
    fn test_role_tags() {
        assert_eq!(Role::Editor.to_string(), "editor");
        assert_eq!(Role::DEFAULT.tag(), "viewer");
        assert_eq!(Role::Viewer.title(), "Viewer");
        assert_eq!(Role::from_tag("editor"), Some(Role::Editor));
        assert_eq!(Role::from_tag("Editor"), None);
    }
}
