//! Contracts the ledger calls out to.

use soroban_sdk::{contractclient, Address, Env};

use crate::errors::ContractError;
use crate::rewards::MAX_EMISSION_RATE;

/// Source of the global base emission rate.
#[contractclient(name = "EmissionCurveClient")]
pub trait EmissionCurve {
    /// Reward units emitted per second, given the pool's last accrual time.
    fn get_rate(env: Env, last_reward_time: u64) -> i128;
}

/// Optional per-pool side channel notified of position activity.
#[contractclient(name = "RewarderClient")]
pub trait Rewarder {
    fn on_reward(env: Env, relic_id: u32, reward_amount: i128, to: Address);
    fn on_deposit(env: Env, relic_id: u32, deposit_amount: i128);
    fn on_withdraw(env: Env, relic_id: u32, withdrawal_amount: i128);
}

/// Reads the base emission rate from `curve` and rejects values outside
/// `[0, MAX_EMISSION_RATE]`.
pub fn base_emission_rate(
    env: &Env,
    curve: &Address,
    last_reward_time: u64,
) -> Result<i128, ContractError> {
    let rate = EmissionCurveClient::new(env, curve).get_rate(&last_reward_time);
    if rate > MAX_EMISSION_RATE {
        return Err(ContractError::MaxEmissionRateExceeded);
    }
    if rate < 0 {
        return Err(ContractError::NegativeEmissionRate);
    }
    Ok(rate)
}
