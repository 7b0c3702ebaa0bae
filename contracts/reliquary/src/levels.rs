//! Maturity ladder: validation, level lookup and per-level balance upkeep.

use soroban_sdk::{Env, Vec};

use crate::errors::ContractError;
use crate::storage::LevelInfo;

/// Checks a ladder supplied at pool creation.
///
/// The ladder must be non-empty, have one multiplier per threshold, start at
/// zero and be strictly increasing.
pub fn validate(
    required_maturities: &Vec<u64>,
    multipliers: &Vec<u32>,
) -> Result<(), ContractError> {
    if required_maturities.is_empty() {
        return Err(ContractError::EmptyLevels);
    }
    if required_maturities.len() != multipliers.len() {
        return Err(ContractError::LevelLengthMismatch);
    }
    if required_maturities.get(0) != Some(0) {
        return Err(ContractError::NonZeroFirstMaturity);
    }
    let mut previous = 0u64;
    for (i, maturity) in required_maturities.iter().enumerate() {
        if i > 0 && maturity <= previous {
            return Err(ContractError::UnsortedMaturityLevels);
        }
        previous = maturity;
    }
    Ok(())
}

/// Builds the stored ladder with every level balance at zero.
pub fn new_ladder(env: &Env, required_maturities: Vec<u64>, multipliers: Vec<u32>) -> LevelInfo {
    let mut balance = Vec::new(env);
    for _ in 0..required_maturities.len() {
        balance.push_back(0i128);
    }
    LevelInfo {
        required_maturities,
        multipliers,
        balance,
    }
}

/// Largest level whose threshold is at most `maturity`.
///
/// The first threshold is always zero, so level 0 is the floor.
pub fn level_for_maturity(required_maturities: &Vec<u64>, maturity: u64) -> u32 {
    let mut level = required_maturities.len();
    while level > 1 {
        level -= 1;
        if required_maturities.get(level).unwrap_or(u64::MAX) <= maturity {
            return level;
        }
    }
    0
}

/// Level a position that entered at `entry` holds at `now`.
pub fn level_at(levels: &LevelInfo, entry: u64, now: u64) -> u32 {
    level_for_maturity(&levels.required_maturities, now.saturating_sub(entry))
}

pub fn multiplier(levels: &LevelInfo, level: u32) -> u32 {
    levels.multipliers.get(level).unwrap_or(0)
}

/// Level-weighted total stake: Σ balance[level] × multiplier[level].
pub fn weighted_supply(levels: &LevelInfo) -> Result<i128, ContractError> {
    let mut supply: i128 = 0;
    for (balance, multiplier) in levels.balance.iter().zip(levels.multipliers.iter()) {
        let weighted = balance
            .checked_mul(multiplier as i128)
            .ok_or(ContractError::ArithmeticOverflow)?;
        supply = supply
            .checked_add(weighted)
            .ok_or(ContractError::ArithmeticOverflow)?;
    }
    Ok(supply)
}

/// Σ balance[level], the raw stake held in the pool.
pub fn total_balance(levels: &LevelInfo) -> i128 {
    levels.balance.iter().sum()
}

pub fn add_balance(levels: &mut LevelInfo, level: u32, amount: i128) -> Result<(), ContractError> {
    let current = levels.balance.get(level).unwrap_or(0);
    let updated = current
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    levels.balance.set(level, updated);
    Ok(())
}

pub fn remove_balance(
    levels: &mut LevelInfo,
    level: u32,
    amount: i128,
) -> Result<(), ContractError> {
    let current = levels.balance.get(level).unwrap_or(0);
    let updated = current
        .checked_sub(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    levels.balance.set(level, updated);
    Ok(())
}

/// Moves a position's contribution from `(old_level, old_amount)` to
/// `(new_level, new_amount)`.
///
/// On an unchanged level this nets out to adjusting that level by exactly
/// the amount delta.
pub fn migrate(
    levels: &mut LevelInfo,
    old_level: u32,
    old_amount: i128,
    new_level: u32,
    new_amount: i128,
) -> Result<(), ContractError> {
    remove_balance(levels, old_level, old_amount)?;
    add_balance(levels, new_level, new_amount)
}
