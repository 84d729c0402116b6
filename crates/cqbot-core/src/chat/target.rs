//! Chat targets - the addressee of an outbound message
//!
//! IDs are the provider's numeric identifiers, carried as strings.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Error when a chat target carries a malformed identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("invalid chat target id: {0:?}")]
    InvalidId(String),
}

fn parse_numeric_id(id: &str) -> Result<i64, ChatError> {
    id.parse::<i64>()
        .map_err(|_| ChatError::InvalidId(id.to_string()))
}

/// A user (direct chat or message sender)
///
/// Identity is the ID alone; the display name does not participate in equality.
#[derive(Debug, Clone)]
pub struct User {
    id: String,
    display_name: String,
}

impl User {
    /// Create a new user
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// Get the user ID
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the display name
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Parse the ID as the provider's numeric identifier
    pub fn numeric_id(&self) -> Result<i64, ChatError> {
        parse_numeric_id(&self.id)
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A group chat
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Group {
    id: String,
}

impl Group {
    /// Create a new group
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Get the group ID
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Parse the ID as the provider's numeric identifier
    pub fn numeric_id(&self) -> Result<i64, ChatError> {
        parse_numeric_id(&self.id)
    }
}

/// Where a message comes from or goes to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChatTarget {
    User(User),
    Group(Group),
}

impl ChatTarget {
    /// Create a user target
    pub fn user(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::User(User::new(id, display_name))
    }

    /// Create a group target
    pub fn group(id: impl Into<String>) -> Self {
        Self::Group(Group::new(id))
    }

    /// Get the target ID
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::User(user) => user.id(),
            Self::Group(group) => group.id(),
        }
    }

    /// Parse the target ID as the provider's numeric identifier
    pub fn numeric_id(&self) -> Result<i64, ChatError> {
        parse_numeric_id(self.id())
    }

    /// Check if this is a group target
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

impl From<User> for ChatTarget {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}

impl From<Group> for ChatTarget {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(user) => write!(f, "user:{}", user.id),
            Self::Group(group) => write!(f, "group:{}", group.id),
        }
    }
}
