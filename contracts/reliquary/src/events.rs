#![allow(deprecated)] // events().publish migration tracked separately

use common::Role;
use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub emission_curve: Address,
    pub timestamp: u64,
}

/// Fired when an operator appends a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pool_id: u32,
    pub pool_token: Address,
    pub alloc_point: u32,
    pub rewarder: Option<Address>,
    pub level_count: u32,
    pub allow_partial_withdrawals: bool,
    pub timestamp: u64,
}

/// Fired when an operator changes a pool's weight, rewarder or name.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolModifiedEvent {
    pub pool_id: u32,
    pub alloc_point: u32,
    pub rewarder: Option<Address>,
    pub overwrite_rewarder: bool,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionCurveSetEvent {
    pub emission_curve: Address,
    pub timestamp: u64,
}

/// Fired when a curve swap advances a pool past an interval the outgoing
/// curve could not price. Nothing accrues for `[skipped_from, timestamp)`.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccrualSkippedEvent {
    pub pool_id: u32,
    pub skipped_from: u64,
    pub timestamp: u64,
}

/// Fired when stake moves in or out of a relic through a regular deposit or
/// withdrawal.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeMovedEvent {
    pub relic_id: u32,
    pub pool_id: u32,
    pub amount: i128,
    pub account: Address,
    pub timestamp: u64,
}

/// Fired when reward tokens leave the contract.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestEvent {
    pub relic_id: u32,
    pub pool_id: u32,
    pub amount: i128,
    pub to: Address,
    pub timestamp: u64,
}

/// Fired when a harvest is capped by the on-hand reward balance.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardShortfallEvent {
    pub relic_id: u32,
    pub owed: i128,
    pub paid: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LevelChangedEvent {
    pub relic_id: u32,
    pub old_level: u32,
    pub new_level: u32,
    pub timestamp: u64,
}

/// Fired for split, shift and merge.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelicTransferEvent {
    pub from_id: u32,
    pub to_id: u32,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelicBurnedEvent {
    pub relic_id: u32,
    pub timestamp: u64,
}

/// Fired when relic ownership changes hands.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelicOwnershipEvent {
    pub relic_id: u32,
    pub from: Address,
    pub to: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleChangedEvent {
    pub role: Role,
    pub account: Address,
    pub sender: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    reward_token: Address,
    emission_curve: Address,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            reward_token,
            emission_curve,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_added(
    env: &Env,
    pool_id: u32,
    pool_token: Address,
    alloc_point: u32,
    rewarder: Option<Address>,
    level_count: u32,
    allow_partial_withdrawals: bool,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pool_id),
        PoolAddedEvent {
            pool_id,
            pool_token,
            alloc_point,
            rewarder,
            level_count,
            allow_partial_withdrawals,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_modified(
    env: &Env,
    pool_id: u32,
    alloc_point: u32,
    rewarder: Option<Address>,
    overwrite_rewarder: bool,
) {
    env.events().publish(
        (symbol_short!("POOL_MOD"), pool_id),
        PoolModifiedEvent {
            pool_id,
            alloc_point,
            rewarder,
            overwrite_rewarder,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emission_curve_set(env: &Env, emission_curve: Address) {
    env.events().publish(
        (symbol_short!("CURVE_SET"),),
        EmissionCurveSetEvent {
            emission_curve,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_accrual_skipped(env: &Env, pool_id: u32, skipped_from: u64) {
    env.events().publish(
        (symbol_short!("ACCR_SKIP"), pool_id),
        AccrualSkippedEvent {
            pool_id,
            skipped_from,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposit(env: &Env, relic_id: u32, pool_id: u32, amount: i128, account: Address) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), relic_id),
        StakeMovedEvent {
            relic_id,
            pool_id,
            amount,
            account,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdraw(env: &Env, relic_id: u32, pool_id: u32, amount: i128, account: Address) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), relic_id),
        StakeMovedEvent {
            relic_id,
            pool_id,
            amount,
            account,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emergency_withdraw(
    env: &Env,
    relic_id: u32,
    pool_id: u32,
    amount: i128,
    account: Address,
) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), relic_id),
        StakeMovedEvent {
            relic_id,
            pool_id,
            amount,
            account,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_harvest(env: &Env, relic_id: u32, pool_id: u32, amount: i128, to: Address) {
    env.events().publish(
        (symbol_short!("HARVEST"), relic_id),
        HarvestEvent {
            relic_id,
            pool_id,
            amount,
            to,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_shortfall(env: &Env, relic_id: u32, owed: i128, paid: i128) {
    env.events().publish(
        (symbol_short!("SHORTFALL"), relic_id),
        RewardShortfallEvent {
            relic_id,
            owed,
            paid,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_level_changed(env: &Env, relic_id: u32, old_level: u32, new_level: u32) {
    env.events().publish(
        (symbol_short!("LVL_CHG"), relic_id),
        LevelChangedEvent {
            relic_id,
            old_level,
            new_level,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_split(env: &Env, from_id: u32, to_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("SPLIT"), from_id),
        RelicTransferEvent {
            from_id,
            to_id,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_shift(env: &Env, from_id: u32, to_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("SHIFT"), from_id),
        RelicTransferEvent {
            from_id,
            to_id,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_merge(env: &Env, from_id: u32, to_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("MERGE"), from_id),
        RelicTransferEvent {
            from_id,
            to_id,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_relic_burned(env: &Env, relic_id: u32) {
    env.events().publish(
        (symbol_short!("BURN"), relic_id),
        RelicBurnedEvent {
            relic_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_relic_transferred(env: &Env, relic_id: u32, from: Address, to: Address) {
    env.events().publish(
        (symbol_short!("RELIC_XFR"), relic_id),
        RelicOwnershipEvent {
            relic_id,
            from,
            to,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_role_granted(env: &Env, role: Role, account: Address, sender: Address) {
    env.events().publish(
        (symbol_short!("ROLE_GRNT"), account.clone()),
        RoleChangedEvent {
            role,
            account,
            sender,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_role_revoked(env: &Env, role: Role, account: Address, sender: Address) {
    env.events().publish(
        (symbol_short!("ROLE_RVKE"), account.clone()),
        RoleChangedEvent {
            role,
            account,
            sender,
            timestamp: env.ledger().timestamp(),
        },
    );
}
