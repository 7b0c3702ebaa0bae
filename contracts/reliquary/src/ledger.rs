//! Accrual engine and the position settlement primitive.
//!
//! Every mutation of a position runs in the same order: roll the pool's
//! accumulator forward, settle the reward earned at the position's *current*
//! amount and level, then apply the new amount, level and reward debt. State
//! is written in full before any token moves or hook fires; the returned
//! [`Settlement`] carries the external calls still owed.

use soroban_sdk::{token, Address, Env};

use crate::errors::ContractError;
use crate::interfaces::{self, RewarderClient};
use crate::storage::{self, LevelInfo, PoolInfo, PositionInfo};
use crate::{events, levels, rewards};

/// What a settlement does to the position's amount.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    Deposit,
    Withdraw,
    /// Settle and re-level only.
    Other,
}

// ── Pool roll-forward ────────────────────────────────────────────────────────

/// Returns `pool` rolled forward to `now` without writing anything.
///
/// The emission curve is only consulted when there is weighted stake to pay;
/// an interval with no stakers just advances `last_reward_time`.
fn rolled_forward(
    env: &Env,
    mut pool: PoolInfo,
    levels: &LevelInfo,
) -> Result<PoolInfo, ContractError> {
    let now = env.ledger().timestamp();
    if now <= pool.last_reward_time {
        return Ok(pool);
    }
    let elapsed = now - pool.last_reward_time;

    let lp_supply = levels::weighted_supply(levels)?;
    if lp_supply > 0 {
        let curve = storage::emission_curve(env)?;
        let rate = interfaces::base_emission_rate(env, &curve, pool.last_reward_time)?;
        let reward = rewards::pool_reward(
            elapsed,
            rate,
            pool.alloc_point,
            storage::total_alloc_point(env),
        )?;
        pool.acc_reward_per_share =
            rewards::accumulate(pool.acc_reward_per_share, reward, lp_supply)?;
    }
    pool.last_reward_time = now;
    Ok(pool)
}

/// Rolls a pool's accumulator forward to the current ledger time and stores
/// it. Calling it twice in the same ledger is a no-op.
pub fn update_pool(env: &Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
    let pool = storage::get_pool(env, pool_id)?;
    if env.ledger().timestamp() <= pool.last_reward_time {
        return Ok(pool);
    }
    let levels = storage::get_levels(env, pool_id)?;
    let pool = rolled_forward(env, pool, &levels)?;
    storage::set_pool(env, pool_id, &pool);
    Ok(pool)
}

/// Rolls every pool forward. Run before anything that changes the emission
/// split so the old split applies up to now.
pub fn update_all_pools(env: &Env) -> Result<(), ContractError> {
    for pool_id in 0..storage::pool_count(env) {
        update_pool(env, pool_id)?;
    }
    Ok(())
}

/// Rolls every pool forward ahead of an emission curve swap.
///
/// A pool whose elapsed interval the current curve cannot price (rate above
/// the cap or negative) is advanced to now with nothing accrued, so an
/// out-of-range curve can always be replaced.
pub fn update_all_pools_for_curve_swap(env: &Env) -> Result<(), ContractError> {
    for pool_id in 0..storage::pool_count(env) {
        match update_pool(env, pool_id) {
            Ok(_) => {}
            Err(ContractError::MaxEmissionRateExceeded | ContractError::NegativeEmissionRate) => {
                let mut pool = storage::get_pool(env, pool_id)?;
                let skipped_from = pool.last_reward_time;
                pool.last_reward_time = env.ledger().timestamp();
                storage::set_pool(env, pool_id, &pool);
                events::publish_accrual_skipped(env, pool_id, skipped_from);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Pool state as `update_pool` would leave it, for read-only previews.
pub fn simulate_pool(env: &Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
    let pool = storage::get_pool(env, pool_id)?;
    let levels = storage::get_levels(env, pool_id)?;
    rolled_forward(env, pool, &levels)
}

/// Reward a position could claim right now: settled credit plus what the
/// position earned at its stored level since its last settlement.
pub fn pending_reward(env: &Env, position: &PositionInfo) -> Result<i128, ContractError> {
    let pool = simulate_pool(env, position.pool_id)?;
    let levels = storage::get_levels(env, position.pool_id)?;
    let pending = rewards::pending(
        position.amount,
        levels::multiplier(&levels, position.level),
        pool.acc_reward_per_share,
        position.reward_debt,
    )?;
    pending
        .checked_add(position.reward_credit)
        .ok_or(ContractError::ArithmeticOverflow)
}

/// Level the next settlement would assign to a position.
pub fn level_on_update(env: &Env, position: &PositionInfo) -> Result<u32, ContractError> {
    let levels = storage::get_levels(env, position.pool_id)?;
    Ok(levels::level_at(&levels, position.entry, env.ledger().timestamp()))
}

// ── Position settlement ──────────────────────────────────────────────────────

/// External calls owed after a settlement has been written.
#[derive(Clone, Debug)]
pub struct Settlement {
    pub relic_id: u32,
    pub pool_id: u32,
    pub kind: Kind,
    pub amount: i128,
    pub pool_token: Address,
    pub rewarder: Option<Address>,
    pub harvest_to: Option<Address>,
    /// Reward tokens to pay out to `harvest_to`.
    pub received: i128,
}

impl Settlement {
    /// Pays the harvested reward and notifies the pool's rewarder.
    pub fn interact(&self, env: &Env) -> Result<(), ContractError> {
        if let Some(to) = &self.harvest_to {
            if self.received > 0 {
                let reward_token = storage::reward_token(env)?;
                token::Client::new(env, &reward_token).transfer(
                    &env.current_contract_address(),
                    to,
                    &self.received,
                );
                events::publish_harvest(env, self.relic_id, self.pool_id, self.received, to.clone());
                if let Some(rewarder) = &self.rewarder {
                    RewarderClient::new(env, rewarder).on_reward(&self.relic_id, &self.received, to);
                }
            }
        }
        if let Some(rewarder) = &self.rewarder {
            match self.kind {
                Kind::Deposit => {
                    RewarderClient::new(env, rewarder).on_deposit(&self.relic_id, &self.amount)
                }
                Kind::Withdraw => {
                    RewarderClient::new(env, rewarder).on_withdraw(&self.relic_id, &self.amount)
                }
                Kind::Other => {}
            }
        }
        Ok(())
    }
}

/// Settles `relic_id` against a freshly rolled accumulator and applies
/// `amount` according to `kind`.
///
/// With `harvest_to == None` the earned reward is kept as credit. Otherwise
/// credit plus earned reward is paid out up to the contract's reward balance
/// and whatever is not covered stays as credit.
pub fn update_position(
    env: &Env,
    relic_id: u32,
    amount: i128,
    kind: Kind,
    harvest_to: Option<Address>,
) -> Result<Settlement, ContractError> {
    let mut position = storage::get_position(env, relic_id)?;
    let pool_id = position.pool_id;
    let pool = update_pool(env, pool_id)?;
    let mut levels = storage::get_levels(env, pool_id)?;
    let now = env.ledger().timestamp();
    let acc = pool.acc_reward_per_share;

    let old_amount = position.amount;
    let old_level = position.level;
    let new_amount = match kind {
        Kind::Deposit => {
            position.entry =
                rewards::entry_after_deposit(position.entry, now, old_amount, amount)?;
            old_amount
                .checked_add(amount)
                .ok_or(ContractError::ArithmeticOverflow)?
        }
        Kind::Withdraw => {
            if amount != old_amount && !pool.allow_partial_withdrawals {
                return Err(ContractError::PartialWithdrawalsDisabled);
            }
            if amount > old_amount {
                return Err(ContractError::AmountExceedsDeposit);
            }
            old_amount - amount
        }
        Kind::Other => old_amount,
    };

    let new_level = levels::level_at(&levels, position.entry, now);
    levels::migrate(&mut levels, old_level, old_amount, new_level, new_amount)?;

    let earned = rewards::pending(
        old_amount,
        levels::multiplier(&levels, old_level),
        acc,
        position.reward_debt,
    )?;
    position.reward_debt =
        rewards::weighted_value(new_amount, levels::multiplier(&levels, new_level), acc)?;
    position.amount = new_amount;
    position.level = new_level;

    let mut received = 0;
    let owed = position
        .reward_credit
        .checked_add(earned)
        .ok_or(ContractError::ArithmeticOverflow)?;
    if harvest_to.is_some() {
        let reward_token = storage::reward_token(env)?;
        let on_hand = token::Client::new(env, &reward_token)
            .balance(&env.current_contract_address())
            .max(0);
        received = owed.min(on_hand);
        position.reward_credit = owed - received;
        if received < owed {
            events::publish_reward_shortfall(env, relic_id, owed, received);
        }
    } else {
        position.reward_credit = owed;
    }

    storage::set_levels(env, pool_id, &levels);
    storage::set_position(env, relic_id, &position);
    if new_level != old_level {
        events::publish_level_changed(env, relic_id, old_level, new_level);
    }

    Ok(Settlement {
        relic_id,
        pool_id,
        kind,
        amount,
        pool_token: pool.pool_token,
        rewarder: pool.rewarder,
        harvest_to,
        received,
    })
}

/// Pulls stake out of a relic without settling rewards, destroying the relic
/// and forfeiting any pending or credited reward. The accumulator is not
/// rolled forward.
///
/// Returns the pool id, pool token and the amount owed back to the owner.
pub fn emergency_exit(env: &Env, relic_id: u32) -> Result<(u32, Address, i128), ContractError> {
    let position = storage::get_position(env, relic_id)?;
    let pool = storage::get_pool(env, position.pool_id)?;
    let mut levels = storage::get_levels(env, position.pool_id)?;

    levels::remove_balance(&mut levels, position.level, position.amount)?;
    storage::set_levels(env, position.pool_id, &levels);
    storage::remove_position(env, relic_id);

    Ok((position.pool_id, pool.pool_token, position.amount))
}
