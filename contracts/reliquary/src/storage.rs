use soroban_sdk::{contracttype, Address, Env, String, Vec};

use crate::errors::ContractError;

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Keys ─────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    Initialized,
    RewardToken,
    EmissionCurve,
    TotalAllocPoint,
    PoolCount,
    /// Pool accounting, by pool id.
    Pool(u32),
    /// Maturity ladder of a pool, by pool id.
    Levels(u32),
    /// Position payload, by relic id.
    Position(u32),
}

// ── Records ──────────────────────────────────────────────────────────────────

/// Accounting state of one incentivized pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    /// Reward per unit of level-weighted stake, scaled by
    /// `ACC_REWARD_PRECISION`.
    pub acc_reward_per_share: i128,
    pub last_reward_time: u64,
    pub alloc_point: u32,
    pub name: String,
    pub allow_partial_withdrawals: bool,
    pub pool_token: Address,
    pub rewarder: Option<Address>,
}

/// Maturity ladder of a pool. The three vectors are parallel, one entry per
/// level. `balance` holds raw (unmultiplied) stake.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LevelInfo {
    pub required_maturities: Vec<u64>,
    pub multipliers: Vec<u32>,
    pub balance: Vec<i128>,
}

/// Accounting payload attached to a relic.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionInfo {
    pub amount: i128,
    pub reward_debt: i128,
    pub reward_credit: i128,
    /// Timestamp maturity is measured from; blended on top-ups.
    pub entry: u64,
    pub pool_id: u32,
    pub level: u32,
}

fn extend_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Instance configuration ───────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Initialized)
}

pub fn require_initialized(env: &Env) -> Result<(), ContractError> {
    if !is_initialized(env) {
        return Err(ContractError::NotInitialized);
    }
    Ok(())
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&DataKey::Initialized, &true);
}

pub fn reward_token(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::RewardToken)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_reward_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::RewardToken, token);
}

pub fn emission_curve(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::EmissionCurve)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_emission_curve(env: &Env, curve: &Address) {
    env.storage().instance().set(&DataKey::EmissionCurve, curve);
}

pub fn total_alloc_point(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::TotalAllocPoint)
        .unwrap_or(0)
}

pub fn set_total_alloc_point(env: &Env, total: u32) {
    env.storage().instance().set(&DataKey::TotalAllocPoint, &total);
}

pub fn pool_count(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::PoolCount).unwrap_or(0)
}

pub fn set_pool_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::PoolCount, &count);
}

// ── Pools and levels ─────────────────────────────────────────────────────────

pub fn get_pool(env: &Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
    let key = DataKey::Pool(pool_id);
    let pool: PoolInfo = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::PoolNotFound)?;
    extend_ttl(env, &key);
    Ok(pool)
}

pub fn set_pool(env: &Env, pool_id: u32, pool: &PoolInfo) {
    let key = DataKey::Pool(pool_id);
    env.storage().persistent().set(&key, pool);
    extend_ttl(env, &key);
}

pub fn get_levels(env: &Env, pool_id: u32) -> Result<LevelInfo, ContractError> {
    let key = DataKey::Levels(pool_id);
    let levels: LevelInfo = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::PoolNotFound)?;
    extend_ttl(env, &key);
    Ok(levels)
}

pub fn set_levels(env: &Env, pool_id: u32, levels: &LevelInfo) {
    let key = DataKey::Levels(pool_id);
    env.storage().persistent().set(&key, levels);
    extend_ttl(env, &key);
}

// ── Positions ────────────────────────────────────────────────────────────────

pub fn get_position(env: &Env, relic_id: u32) -> Result<PositionInfo, ContractError> {
    let key = DataKey::Position(relic_id);
    let position: PositionInfo = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::RelicNotFound)?;
    extend_ttl(env, &key);
    Ok(position)
}

pub fn set_position(env: &Env, relic_id: u32, position: &PositionInfo) {
    let key = DataKey::Position(relic_id);
    env.storage().persistent().set(&key, position);
    extend_ttl(env, &key);
}

pub fn remove_position(env: &Env, relic_id: u32) {
    env.storage()
        .persistent()
        .remove(&DataKey::Position(relic_id));
}
