//! HEAD state representation.

use crate::objects::Oid;

/// The state of HEAD.
///
/// History is linear and there is a single branch, so HEAD is either a
/// branch that has no commits yet or a branch pointing at a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// The branch exists in name only; nothing has been committed.
    Unborn {
        /// The branch name (without `refs/heads/` prefix).
        name: String,
    },
    /// The branch points at a commit.
    Branch {
        /// The branch name (without `refs/heads/` prefix).
        name: String,
        /// The commit the branch points to.
        oid: Oid,
    },
}

impl Head {
    /// Creates a Head for a branch with no commits.
    pub fn unborn(name: impl Into<String>) -> Self {
        Head::Unborn { name: name.into() }
    }

    /// Creates a Head pointing at a commit.
    pub fn branch(name: impl Into<String>, oid: Oid) -> Self {
        Head::Branch {
            name: name.into(),
            oid,
        }
    }

    /// Returns the commit HEAD points to, or `None` before the first commit.
    pub fn oid(&self) -> Option<&Oid> {
        match self {
            Head::Unborn { .. } => None,
            Head::Branch { oid, .. } => Some(oid),
        }
    }

    /// Returns the branch name.
    pub fn branch_name(&self) -> &str {
        match self {
            Head::Unborn { name } | Head::Branch { name, .. } => name,
        }
    }

    /// Returns `true` if nothing has been committed yet.
    pub fn is_unborn(&self) -> bool {
        matches!(self, Head::Unborn { .. })
    }

    /// Returns the full reference name, e.g. `refs/heads/master`.
    pub fn reference_name(&self) -> String {
        format!("refs/heads/{}", self.branch_name())
    }
}
