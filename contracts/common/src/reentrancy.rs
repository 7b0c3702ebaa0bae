use soroban_sdk::{symbol_short, Env, Symbol};

const ENTERED: Symbol = symbol_short!("ENTERED");

/// Scoped lock held for the duration of one mutating entry point.
///
/// Acquiring the guard while another one is alive in the same contract fails,
/// so a callback that tries to re-enter a mutating function is rejected before
/// it can touch the ledger. The flag is cleared when the guard is dropped; on
/// an aborted invocation the host discards the write anyway.
pub struct ReentrancyGuard {
    env: Env,
}

impl ReentrancyGuard {
    /// Takes the lock, or returns `None` if it is already held.
    pub fn enter(env: &Env) -> Option<Self> {
        if env.storage().instance().has(&ENTERED) {
            return None;
        }
        env.storage().instance().set(&ENTERED, &true);
        Some(Self { env: env.clone() })
    }

    #[cfg(test)]
    fn is_entered(env: &Env) -> bool {
        env.storage().instance().has(&ENTERED)
    }
}

impl Drop for ReentrancyGuard {
    fn drop(&mut self) {
        self.env.storage().instance().remove(&ENTERED);
    }
}
