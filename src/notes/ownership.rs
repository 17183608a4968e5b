use crate::identity::AuthorIdentity;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    MissingActor,
    NotOwner,
}

/// Decides whether `actor` may run a mutating `operation` against a note
/// owned by `owner`. Update and delete share one rule today; the operation
/// kind stays in the signature because it is part of the contract.
///
/// Identity equality is the whole check. Anyone who can put the owner's
/// identity string in a header passes it; the original behaved the same.
pub fn authorize(owner: &AuthorIdentity, actor: Option<&AuthorIdentity>, operation: Operation) -> Decision {
    let Some(actor) = actor else {
        return Decision::Deny(DenyReason::MissingActor);
    };

    if owner.matches(actor) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::NotOwner)
    }
}

impl From<DenyReason> for Error {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::MissingActor => Error::MissingActor,
            DenyReason::NotOwner => Error::Forbidden,
        }
    }
}
