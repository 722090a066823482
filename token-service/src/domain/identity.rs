use std::fmt;

/// A resolved subject. The token engine only ever sees `id`; the rest belongs
/// to the identity store and the login flow.
#[derive(Clone, PartialEq)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
}

impl Identity {
    pub fn new(id: impl Into<String>, username: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password_hash,
            is_active: true,
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("is_active", &self.is_active)
            .finish()
    }
}
