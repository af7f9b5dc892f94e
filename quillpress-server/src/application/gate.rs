use crate::domain::error::DomainError;
use crate::domain::identity::{AuthenticatedUser, Identity};
use crate::domain::user::Role;

pub(crate) fn require_authenticated(
    identity: &Identity,
) -> Result<&AuthenticatedUser, DomainError> {
    match identity {
        Identity::Authenticated(user) => Ok(user),
        Identity::Anonymous => Err(DomainError::Unauthenticated),
    }
}

pub(crate) fn require_admin(identity: &Identity) -> Result<&AuthenticatedUser, DomainError> {
    let user = require_authenticated(identity)?;
    if user.role != Role::Admin {
        return Err(DomainError::Forbidden);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::{require_admin, require_authenticated};
    use crate::domain::error::DomainError;
    use crate::domain::identity::{AuthenticatedUser, Identity};
    use crate::domain::user::Role;

    fn signed_in(role: Role) -> Identity {
        Identity::Authenticated(AuthenticatedUser {
            id: 7,
            name: "Ada".to_string(),
            role,
        })
    }

    #[test]
    fn anonymous_is_unauthenticated_everywhere() {
        let identity = Identity::Anonymous;
        assert!(matches!(
            require_authenticated(&identity),
            Err(DomainError::Unauthenticated)
        ));
        assert!(matches!(
            require_admin(&identity),
            Err(DomainError::Unauthenticated)
        ));
    }

    #[test]
    fn regular_user_passes_authentication_but_not_admin_gate() {
        let identity = signed_in(Role::User);
        assert!(require_authenticated(&identity).is_ok());
        assert!(matches!(
            require_admin(&identity),
            Err(DomainError::Forbidden)
        ));
    }

    #[test]
    fn admin_passes_both_gates() {
        let identity = signed_in(Role::Admin);
        assert!(require_authenticated(&identity).is_ok());
        assert_eq!(require_admin(&identity).expect("admin").id, 7);
    }
}
