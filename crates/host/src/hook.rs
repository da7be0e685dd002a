use hyprlens_render::Frame;
use std::fmt;

/// Address of a function inside the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionAddress(pub usize);

impl fmt::Display for FunctionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Token for an installed hook, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookHandle(pub u64);

/// Replacement body for a hooked render pass.
///
/// Receives exactly what the original pass would have: the host's render
/// state for the current monitor and its graphics context.
pub type PassHook = Box<dyn FnMut(&mut Frame<'_>)>;

/// Errors from the host's hooking facility.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HookError {
    #[error("no function at {0}")]
    UnknownAddress(FunctionAddress),
    #[error("function at {0} is already hooked")]
    AlreadyHooked(FunctionAddress),
    #[error("unknown hook {0:?}")]
    UnknownHandle(HookHandle),
}

/// The host's ability to redirect one of its own functions.
pub trait HookFacility {
    /// Every function whose name matches `name`.
    fn resolve(&self, name: &str) -> Vec<FunctionAddress>;

    /// Redirect calls to `address` into `replacement`.
    fn install(
        &mut self,
        address: FunctionAddress,
        replacement: PassHook,
    ) -> Result<HookHandle, HookError>;

    /// Undo an [`HookFacility::install`].
    fn uninstall(&mut self, handle: HookHandle) -> Result<(), HookError>;
}
