//! Moving stake between relics of the same pool: split, shift and merge.
//!
//! Each operation rolls the pool once, settles every participant against
//! that single accumulator value and rewrites all level balances in one
//! pass, so no reward is created or lost by the move.

use soroban_sdk::{Address, Env};

use crate::errors::ContractError;
use crate::storage::{self, LevelInfo, PositionInfo};
use crate::{events, ledger, levels, relics, rewards};

fn checked_add(a: i128, b: i128) -> Result<i128, ContractError> {
    a.checked_add(b).ok_or(ContractError::ArithmeticOverflow)
}

/// Reward `position` earned at its stored level up to `acc`.
fn earned(position: &PositionInfo, levels: &LevelInfo, acc: i128) -> Result<i128, ContractError> {
    rewards::pending(
        position.amount,
        levels::multiplier(levels, position.level),
        acc,
        position.reward_debt,
    )
}

/// Applies a post-move amount and level to `position` and re-bases its debt.
fn restate(
    position: &mut PositionInfo,
    levels: &LevelInfo,
    amount: i128,
    level: u32,
    acc: i128,
) -> Result<(), ContractError> {
    position.amount = amount;
    position.level = level;
    position.reward_debt =
        rewards::weighted_value(amount, levels::multiplier(levels, level), acc)?;
    Ok(())
}

fn announce_level(env: &Env, relic_id: u32, old_level: u32, new_level: u32) {
    if old_level != new_level {
        events::publish_level_changed(env, relic_id, old_level, new_level);
    }
}

/// Carves `amount` out of `from_id` into a new relic minted to `to`.
///
/// The new relic inherits `from_id`'s entry unchanged. Reward earned by
/// `from_id` so far becomes credit on `from_id`.
pub fn split(env: &Env, from_id: u32, amount: i128, to: &Address) -> Result<u32, ContractError> {
    if amount <= 0 {
        return Err(ContractError::ZeroAmount);
    }
    let mut from = storage::get_position(env, from_id)?;
    let pool_id = from.pool_id;
    let pool = ledger::update_pool(env, pool_id)?;
    if !pool.allow_partial_withdrawals {
        return Err(ContractError::PartialWithdrawalsDisabled);
    }
    if amount > from.amount {
        return Err(ContractError::AmountExceedsDeposit);
    }

    let acc = pool.acc_reward_per_share;
    let now = env.ledger().timestamp();
    let mut levels = storage::get_levels(env, pool_id)?;

    let old_level = from.level;
    let level = levels::level_at(&levels, from.entry, now);
    let remaining = from.amount - amount;

    from.reward_credit = checked_add(from.reward_credit, earned(&from, &levels, acc)?)?;
    levels::migrate(&mut levels, old_level, from.amount, level, remaining)?;
    levels::add_balance(&mut levels, level, amount)?;
    restate(&mut from, &levels, remaining, level, acc)?;

    let new_id = relics::mint(env, to)?;
    let mut created = PositionInfo {
        amount: 0,
        reward_debt: 0,
        reward_credit: 0,
        entry: from.entry,
        pool_id,
        level,
    };
    restate(&mut created, &levels, amount, level, acc)?;

    storage::set_levels(env, pool_id, &levels);
    storage::set_position(env, from_id, &from);
    storage::set_position(env, new_id, &created);
    announce_level(env, from_id, old_level, level);
    events::publish_split(env, from_id, new_id, amount);

    Ok(new_id)
}

/// Loads two distinct relics and checks they share a pool.
fn load_pair(
    env: &Env,
    from_id: u32,
    to_id: u32,
) -> Result<(PositionInfo, PositionInfo), ContractError> {
    if from_id == to_id {
        return Err(ContractError::DuplicateRelicIds);
    }
    let from = storage::get_position(env, from_id)?;
    let to = storage::get_position(env, to_id)?;
    if from.pool_id != to.pool_id {
        return Err(ContractError::RelicsNotOfSamePool);
    }
    Ok((from, to))
}

/// Moves `amount` from `from_id` into `to_id`.
///
/// `to_id`'s entry becomes the average of both entries weighted by both
/// relics' full pre-move amounts. Both relics keep what they earned so far as
/// credit.
pub fn shift(env: &Env, from_id: u32, to_id: u32, amount: i128) -> Result<(), ContractError> {
    if amount <= 0 {
        return Err(ContractError::ZeroAmount);
    }
    let (mut from, mut to) = load_pair(env, from_id, to_id)?;
    let pool_id = from.pool_id;
    let pool = ledger::update_pool(env, pool_id)?;
    if !pool.allow_partial_withdrawals {
        return Err(ContractError::PartialWithdrawalsDisabled);
    }
    if amount > from.amount {
        return Err(ContractError::AmountExceedsDeposit);
    }

    let acc = pool.acc_reward_per_share;
    let now = env.ledger().timestamp();
    let mut levels = storage::get_levels(env, pool_id)?;

    from.reward_credit = checked_add(from.reward_credit, earned(&from, &levels, acc)?)?;
    to.reward_credit = checked_add(to.reward_credit, earned(&to, &levels, acc)?)?;

    to.entry = rewards::blended_entry(from.amount, from.entry, to.amount, to.entry)?;
    let from_amount = from.amount - amount;
    let to_amount = checked_add(to.amount, amount)?;
    let (from_old_level, to_old_level) = (from.level, to.level);
    let from_level = levels::level_at(&levels, from.entry, now);
    let to_level = levels::level_at(&levels, to.entry, now);

    levels::remove_balance(&mut levels, from_old_level, from.amount)?;
    levels::remove_balance(&mut levels, to_old_level, to.amount)?;
    levels::add_balance(&mut levels, from_level, from_amount)?;
    levels::add_balance(&mut levels, to_level, to_amount)?;
    restate(&mut from, &levels, from_amount, from_level, acc)?;
    restate(&mut to, &levels, to_amount, to_level, acc)?;

    storage::set_levels(env, pool_id, &levels);
    storage::set_position(env, from_id, &from);
    storage::set_position(env, to_id, &to);
    announce_level(env, from_id, from_old_level, from_level);
    announce_level(env, to_id, to_old_level, to_level);
    events::publish_shift(env, from_id, to_id, amount);

    Ok(())
}

/// Folds all of `from_id` (stake, earned reward and credit) into `to_id`,
/// then destroys `from_id`.
///
/// Returns the amount moved.
pub fn merge(env: &Env, from_id: u32, to_id: u32) -> Result<i128, ContractError> {
    let (from, mut to) = load_pair(env, from_id, to_id)?;
    if from.amount == 0 && to.amount == 0 {
        return Err(ContractError::MergingEmptyRelics);
    }
    let pool_id = from.pool_id;
    let pool = ledger::update_pool(env, pool_id)?;

    let acc = pool.acc_reward_per_share;
    let now = env.ledger().timestamp();
    let mut levels = storage::get_levels(env, pool_id)?;

    let carried = checked_add(from.reward_credit, earned(&from, &levels, acc)?)?;
    let kept = checked_add(to.reward_credit, earned(&to, &levels, acc)?)?;
    to.reward_credit = checked_add(kept, carried)?;

    to.entry = rewards::blended_entry(from.amount, from.entry, to.amount, to.entry)?;
    let to_amount = checked_add(to.amount, from.amount)?;
    let to_old_level = to.level;
    let to_level = levels::level_at(&levels, to.entry, now);

    levels::remove_balance(&mut levels, from.level, from.amount)?;
    levels::migrate(&mut levels, to_old_level, to.amount, to_level, to_amount)?;
    restate(&mut to, &levels, to_amount, to_level, acc)?;

    storage::set_levels(env, pool_id, &levels);
    storage::set_position(env, to_id, &to);
    storage::remove_position(env, from_id);
    relics::burn(env, from_id)?;
    announce_level(env, to_id, to_old_level, to_level);
    events::publish_merge(env, from_id, to_id, from.amount);

    Ok(from.amount)
}
