//! Actor id to display name lookup

use std::borrow::Cow;
use std::collections::HashMap;

use crate::models::UserRecord;

/// Maps user ids to usernames for log rendering, filtering and export
///
/// Built once per load; a later duplicate id overwrites the earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinIndex {
    names: HashMap<i64, String>,
}

impl JoinIndex {
    pub fn build(users: &[UserRecord]) -> Self {
        let names = users
            .iter()
            .map(|user| (user.id, user.username.clone()))
            .collect();
        Self { names }
    }

    /// Username for an id, if the directory knows it
    pub fn resolve(&self, user_id: i64) -> Option<&str> {
        self.names.get(&user_id).map(String::as_str)
    }

    /// Username for an id, or `user#<id>` when the actor is unknown
    pub fn display_name(&self, user_id: i64) -> Cow<'_, str> {
        match self.resolve(user_id) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("user#{}", user_id)),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
