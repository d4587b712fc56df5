use uuid::Uuid;

/// Resolved caller identity for a single request.
///
/// Produced once per request by the gateway (trusted identity header ->
/// directory lookup) and passed explicitly into every operation. The core
/// never consults ambient/global state for "who is calling".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    /// Internal user id the subject resolved to.
    pub user_id: Uuid,
    /// Opaque subject string from the external identity provider.
    pub subject: String,
}

impl CallerContext {
    pub fn new(user_id: Uuid, subject: impl Into<String>) -> Self {
        Self {
            user_id,
            subject: subject.into(),
        }
    }
}

/// Request-extension wrapper around the (possibly absent) caller identity.
///
/// Always present in extensions once the identity middleware ran, so handlers
/// can extract it infallibly and decide fail-closed vs. degrade-to-empty per
/// operation.
#[derive(Debug, Clone, Default)]
pub struct CallerIdentity(pub Option<CallerContext>);

impl CallerIdentity {
    pub fn authenticated(ctx: CallerContext) -> Self {
        Self(Some(ctx))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|c| c.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_exposes_user_id_only_when_authenticated() {
        let id = Uuid::new_v4();
        let auth = CallerIdentity::authenticated(CallerContext::new(id, "user_2abc"));
        assert_eq!(auth.user_id(), Some(id));

        let anon = CallerIdentity::anonymous();
        assert_eq!(anon.user_id(), None);
    }

    #[test]
    fn default_is_anonymous() {
        assert!(CallerIdentity::default().0.is_none());
    }
}
