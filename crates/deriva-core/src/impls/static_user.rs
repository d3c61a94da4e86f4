use crate::domain::UserId;
use crate::ports::CurrentUser;

/// A fixed user, for batch runs that act on behalf of one account.
#[derive(Debug, Clone)]
pub struct StaticUser(UserId);

impl StaticUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self(UserId::new(id))
    }
}

impl Default for StaticUser {
    fn default() -> Self {
        Self(UserId::anonymous())
    }
}

impl CurrentUser for StaticUser {
    fn id(&self) -> UserId {
        self.0.clone()
    }
}
