use hyprlens_host::{HookError, HookFacility, HookHandle, PassHook};

/// Errors from installing the pass hook.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InstallError {
    #[error("found {found} {symbol} candidates, expected 1")]
    UnexpectedCandidates { symbol: String, found: usize },
    #[error(transparent)]
    Hook(#[from] HookError),
}

/// Hook `symbol` if, and only if, it names exactly one host function.
pub fn install_pass_hook<F: HookFacility + ?Sized>(
    facility: &mut F,
    symbol: &str,
    hook: PassHook,
) -> Result<HookHandle, InstallError> {
    let candidates = facility.resolve(symbol);
    let &[address] = candidates.as_slice() else {
        return Err(InstallError::UnexpectedCandidates {
            symbol: symbol.to_string(),
            found: candidates.len(),
        });
    };
    let handle = facility.install(address, hook)?;
    tracing::info!(symbol, %address, "hooked render pass");
    Ok(handle)
}
