//! Best-effort removal of pending accounts whose proof flow failed.

use ergauth_store::ProofBackend;
use ergauth_types::UserId;

/// Delete `user_id` if it is still pending and owns no verified proof.
///
/// Never fails: a storage error is logged and swallowed so it cannot mask
/// the error the caller is about to report.
pub fn discard_pending_user<S: ProofBackend + ?Sized>(store: &S, user_id: &UserId) {
    match store.delete_user_if_pending(user_id) {
        Ok(true) => tracing::info!(user = %user_id, "discarded pending user after failed proof"),
        Ok(false) => {}
        Err(e) => tracing::warn!(user = %user_id, "pending user cleanup failed: {e}"),
    }
}
