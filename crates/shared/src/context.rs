//! Authenticated actor context.
//!
//! Authentication and tenant-access checks happen outside this system; every
//! engine call receives the already-verified pair of user and business below.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The pre-verified `(user, business)` pair an engine call acts on behalf of.
///
/// All persistence is scoped by `business_id`; `user_id` is recorded as the
/// author of journal entries and documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// The acting user.
    pub user_id: Uuid,
    /// The tenant every touched row must belong to.
    pub business_id: Uuid,
}

impl ActorContext {
    /// Creates a context from an already-verified user/business pair.
    #[must_use]
    pub const fn new(user_id: Uuid, business_id: Uuid) -> Self {
        Self {
            user_id,
            business_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_carries_both_ids() {
        let user = Uuid::new_v4();
        let business = Uuid::new_v4();
        let ctx = ActorContext::new(user, business);
        assert_eq!(ctx.user_id, user);
        assert_eq!(ctx.business_id, business);
    }
}
