use core_types::Frame;

/// A `frame -> frame` transform, applied in place (spec.md §4.B). Every
/// operator except [`crate::clutter::ClutterRemoval`] is stateless;
/// `Send` is required so a [`crate::chain::Chain`] can be moved into the
/// pipeline worker thread that owns it, not so it can be shared across
/// threads concurrently.
pub trait Operator: Send {
    fn apply(&mut self, frame: &mut Frame);
}
