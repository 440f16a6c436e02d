//! Pending account storage trait.

use crate::StoreError;
use ergauth_types::{PendingUser, Timestamp, UserId};

pub trait UserStore {
    fn get_user(&self, id: &UserId) -> Result<Option<PendingUser>, StoreError>;

    /// Insert or overwrite an account.
    fn put_user(&self, user: &PendingUser) -> Result<(), StoreError>;

    /// Create the account if absent, then replace its nonce and bump its
    /// nonce generation, in one atomic step.
    ///
    /// A newly created account continues above the highest generation of
    /// any proof still stored for the same id.
    fn rotate_nonce(
        &self,
        id: &UserId,
        nonce: &str,
        now: Timestamp,
    ) -> Result<PendingUser, StoreError>;

    /// Delete the account only while it is still pending and owns no
    /// verified proof, together with every proof it owns, in one atomic
    /// step. Returns whether the account was deleted.
    fn delete_user_if_pending(&self, id: &UserId) -> Result<bool, StoreError>;
}
