use crate::errors::ContractError;

/// Fixed-point scaling factor for `acc_reward_per_share`.
///
/// The accumulator is stored as reward per unit of level-weighted stake,
/// multiplied by this constant to keep sub-unit precision without floats.
pub const ACC_REWARD_PRECISION: i128 = 1_000_000_000_000;

/// Fixed-point scale of the entry-time blend weight (1.0 == this value).
pub const WEIGHT_PRECISION: i128 = 1_000_000_000_000;

/// Sanity ceiling for the base emission rate, in reward units per second.
pub const MAX_EMISSION_RATE: i128 = 6_000_000_000_000_000_000;

const OVERFLOW: ContractError = ContractError::ArithmeticOverflow;

fn mul(a: i128, b: i128) -> Result<i128, ContractError> {
    a.checked_mul(b).ok_or(OVERFLOW)
}

fn add(a: i128, b: i128) -> Result<i128, ContractError> {
    a.checked_add(b).ok_or(OVERFLOW)
}

fn sub(a: i128, b: i128) -> Result<i128, ContractError> {
    a.checked_sub(b).ok_or(OVERFLOW)
}

fn div(a: i128, b: i128) -> Result<i128, ContractError> {
    a.checked_div(b).ok_or(OVERFLOW)
}

// ── Pool accrual ────────────────────────────────────────────────────────────

/// Reward a pool earned over `elapsed` seconds:
///
/// ```text
/// reward = elapsed × rate × alloc_point / total_alloc_point
/// ```
///
/// A zero `total_alloc_point` (no pools configured) yields no reward.
pub fn pool_reward(
    elapsed: u64,
    rate: i128,
    alloc_point: u32,
    total_alloc_point: u32,
) -> Result<i128, ContractError> {
    if total_alloc_point == 0 {
        return Ok(0);
    }
    let emitted = mul(elapsed as i128, rate)?;
    div(mul(emitted, alloc_point as i128)?, total_alloc_point as i128)
}

/// Fold `reward` into the accumulator, spread over `lp_supply` units of
/// level-weighted stake.
///
/// ```text
/// acc' = acc + reward × ACC_REWARD_PRECISION / lp_supply
/// ```
///
/// With no weighted stake the accumulator is returned unchanged and the
/// interval's reward is not banked anywhere.
pub fn accumulate(acc: i128, reward: i128, lp_supply: i128) -> Result<i128, ContractError> {
    if lp_supply <= 0 {
        return Ok(acc);
    }
    add(acc, div(mul(reward, ACC_REWARD_PRECISION)?, lp_supply)?)
}

// ── Position settlement ─────────────────────────────────────────────────────

/// Level-weighted value of a stake at accumulator `acc`:
/// `amount × multiplier × acc / ACC_REWARD_PRECISION`.
///
/// This is both the reward-debt baseline and the minuend of a pending reward.
pub fn weighted_value(amount: i128, multiplier: u32, acc: i128) -> Result<i128, ContractError> {
    div(
        mul(mul(amount, multiplier as i128)?, acc)?,
        ACC_REWARD_PRECISION,
    )
}

/// Reward accrued since the last settlement.
///
/// `reward_debt` was set from the same amount and multiplier at an earlier,
/// never larger accumulator, so the difference cannot go below zero as long
/// as settlement happens before the amount or level changes.
pub fn pending(
    amount: i128,
    multiplier: u32,
    acc: i128,
    reward_debt: i128,
) -> Result<i128, ContractError> {
    sub(weighted_value(amount, multiplier, acc)?, reward_debt)
}

// ── Entry-time blending ─────────────────────────────────────────────────────

/// Fraction (scaled by `WEIGHT_PRECISION`) of the accumulated maturity that a
/// top-up of `added` onto `old` wipes out.
///
/// The branch keeps the larger side in the denominator's complement so the
/// result is exact at the extremes and never divides by zero for positive
/// inputs.
pub fn entry_weight(added: i128, old: i128) -> Result<i128, ContractError> {
    let total = add(added, old)?;
    if old < added {
        sub(WEIGHT_PRECISION, div(mul(old, WEIGHT_PRECISION)?, total)?)
    } else if added < old {
        div(mul(added, WEIGHT_PRECISION)?, total)
    } else {
        Ok(WEIGHT_PRECISION / 2)
    }
}

/// New entry timestamp after depositing `added` onto a position holding
/// `old` that entered at `old_entry`. An empty position restarts at `now`.
pub fn entry_after_deposit(
    old_entry: u64,
    now: u64,
    old: i128,
    added: i128,
) -> Result<u64, ContractError> {
    if old == 0 {
        return Ok(now);
    }
    let maturity = now.saturating_sub(old_entry) as i128;
    let shift = div(mul(maturity, entry_weight(added, old)?)?, WEIGHT_PRECISION)?;
    let shift = u64::try_from(shift).map_err(|_| OVERFLOW)?;
    old_entry.checked_add(shift).ok_or(OVERFLOW)
}

/// Amount-weighted average of two entry timestamps:
/// `(a × a_entry + b × b_entry) / (a + b)`.
///
/// When both amounts are zero `b_entry` is kept.
pub fn blended_entry(
    a_amount: i128,
    a_entry: u64,
    b_amount: i128,
    b_entry: u64,
) -> Result<u64, ContractError> {
    let total = add(a_amount, b_amount)?;
    if total == 0 {
        return Ok(b_entry);
    }
    let weighted = add(
        mul(a_amount, a_entry as i128)?,
        mul(b_amount, b_entry as i128)?,
    )?;
    u64::try_from(div(weighted, total)?).map_err(|_| OVERFLOW)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests with no Soroban environment dependency.
