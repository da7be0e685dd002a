use crate::state::{Frame, RenderModifier};
use std::ops::{Deref, DerefMut};

/// Saved host render state, restored on drop.
///
/// Capturing swaps the host's render modifier for the identity so draws made
/// through the snapshot land untransformed. Dropping puts the original back,
/// whichever way the scope is left.
pub struct RenderSnapshot<'f, 'a> {
    frame: &'f mut Frame<'a>,
    saved: RenderModifier,
}

impl<'f, 'a> RenderSnapshot<'f, 'a> {
    pub fn capture(frame: &'f mut Frame<'a>) -> Self {
        let saved = std::mem::take(&mut frame.render.modifier);
        tracing::trace!(modifications = saved.modifications.len(), "saved render modifier");
        Self { frame, saved }
    }

    /// The modifier that will be restored.
    pub fn saved(&self) -> &RenderModifier {
        &self.saved
    }
}

impl<'a> Deref for RenderSnapshot<'_, 'a> {
    type Target = Frame<'a>;

    fn deref(&self) -> &Frame<'a> {
        self.frame
    }
}

impl<'a> DerefMut for RenderSnapshot<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Frame<'a> {
        self.frame
    }
}

impl Drop for RenderSnapshot<'_, '_> {
    fn drop(&mut self) {
        self.frame.render.modifier = std::mem::take(&mut self.saved);
        tracing::trace!("restored render modifier");
    }
}
