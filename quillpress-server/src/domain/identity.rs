use super::user::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Identity {
    Anonymous,
    Authenticated(AuthenticatedUser),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AuthenticatedUser {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) role: Role,
}

impl Identity {
    pub(crate) fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    pub(crate) fn user_id(&self) -> Option<i64> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(user) => Some(user.id),
        }
    }
}
