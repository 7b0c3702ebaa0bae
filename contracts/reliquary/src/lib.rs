#![no_std]

//! # Reliquary
//!
//! Position-based liquidity mining. Every stake lives in a relic (a
//! non-fungible id) that remembers when it entered its pool; the longer a
//! relic matures, the higher the level it reaches on the pool's maturity
//! ladder and the larger its multiplier on the pool's emissions.
//!
//! Relics can be split, have stake shifted between them, or be merged,
//! without losing the maturity they have built up.

#[cfg(test)]
extern crate std;

pub mod errors;
pub mod events;
pub mod interfaces;
pub mod ledger;
pub mod levels;
pub mod relics;
pub mod restructure;
pub mod rewards;
pub mod storage;

use common::{roles, ReentrancyGuard, Role};
use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env, String, Vec};

pub use errors::ContractError;
pub use storage::{LevelInfo, PoolInfo, PositionInfo};

use ledger::Kind;

// ── Public-facing types ──────────────────────────────────────────────────────

/// A relic together with its position, returned by `relic_positions_of_owner`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelicPosition {
    pub relic_id: u32,
    pub position: PositionInfo,
}

/// Claimable reward of one relic, returned by `pending_rewards_of_owner`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingReward {
    pub relic_id: u32,
    pub pool_id: u32,
    pub pending_reward: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct ReliquaryContract;

#[contractimpl]
impl ReliquaryContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `admin`          – receives the `Admin` role.
    /// * `reward_token`   – SAC address of the token paid out on harvest.
    /// * `emission_curve` – contract answering `get_rate`.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        emission_curve: Address,
    ) -> Result<(), ContractError> {
        if storage::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }

        storage::set_reward_token(&env, &reward_token);
        storage::set_emission_curve(&env, &emission_curve);
        storage::set_total_alloc_point(&env, 0);
        storage::set_pool_count(&env, 0);
        storage::set_initialized(&env);
        roles::set_initial_admin(&env, &admin);

        events::publish_initialized(&env, admin, reward_token, emission_curve);

        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    // ── Roles ───────────────────────────────────────────────────────────────

    /// Grant `role` to `target`. Only an `Admin` may call this.
    pub fn grant_role(
        env: Env,
        caller: Address,
        target: Address,
        role: Role,
    ) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        if !roles::grant_role(&env, &caller, &target, role) {
            return Err(ContractError::Unauthorized);
        }
        events::publish_role_granted(&env, role, target, caller);
        Ok(())
    }

    /// Revoke `role` from `target`. Only an `Admin` may call this.
    pub fn revoke_role(
        env: Env,
        caller: Address,
        target: Address,
        role: Role,
    ) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        if !roles::revoke_role(&env, &caller, &target, role) {
            return Err(ContractError::Unauthorized);
        }
        events::publish_role_revoked(&env, role, target, caller);
        Ok(())
    }

    pub fn has_role(env: Env, account: Address, role: Role) -> bool {
        roles::has_role(&env, &account, role)
    }

    pub fn role_members(env: Env, role: Role) -> Vec<Address> {
        roles::role_members(&env, role)
    }

    // ── Pool administration ─────────────────────────────────────────────────

    /// Append a pool with its maturity ladder. Requires `Operator`.
    ///
    /// Every existing pool is rolled forward first so the new total alloc
    /// point only applies from now on.
    #[allow(clippy::too_many_arguments)]
    pub fn add_pool(
        env: Env,
        caller: Address,
        alloc_point: u32,
        pool_token: Address,
        rewarder: Option<Address>,
        required_maturities: Vec<u64>,
        level_multipliers: Vec<u32>,
        name: String,
        allow_partial_withdrawals: bool,
    ) -> Result<u32, ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        Self::require_role(&env, &caller, Role::Operator)?;
        let _guard = Self::enter(&env)?;

        levels::validate(&required_maturities, &level_multipliers)?;
        if pool_token == storage::reward_token(&env)? {
            return Err(ContractError::TokensIdentical);
        }

        ledger::update_all_pools(&env)?;

        let total = storage::total_alloc_point(&env)
            .checked_add(alloc_point)
            .ok_or(ContractError::ArithmeticOverflow)?;
        if total == 0 {
            return Err(ContractError::ZeroTotalAllocPoint);
        }

        let pool_id = storage::pool_count(&env);
        let level_count = required_maturities.len();
        storage::set_pool(
            &env,
            pool_id,
            &PoolInfo {
                acc_reward_per_share: 0,
                last_reward_time: env.ledger().timestamp(),
                alloc_point,
                name,
                allow_partial_withdrawals,
                pool_token: pool_token.clone(),
                rewarder: rewarder.clone(),
            },
        );
        storage::set_levels(
            &env,
            pool_id,
            &levels::new_ladder(&env, required_maturities, level_multipliers),
        );
        storage::set_pool_count(&env, pool_id + 1);
        storage::set_total_alloc_point(&env, total);

        events::publish_pool_added(
            &env,
            pool_id,
            pool_token,
            alloc_point,
            rewarder,
            level_count,
            allow_partial_withdrawals,
        );

        Ok(pool_id)
    }

    /// Change a pool's alloc point and name, and its rewarder when
    /// `overwrite_rewarder` is set. Requires `Operator`.
    pub fn modify_pool(
        env: Env,
        caller: Address,
        pool_id: u32,
        alloc_point: u32,
        rewarder: Option<Address>,
        name: String,
        overwrite_rewarder: bool,
    ) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        Self::require_role(&env, &caller, Role::Operator)?;
        let _guard = Self::enter(&env)?;

        ledger::update_all_pools(&env)?;
        let mut pool = storage::get_pool(&env, pool_id)?;

        let total = (storage::total_alloc_point(&env) - pool.alloc_point)
            .checked_add(alloc_point)
            .ok_or(ContractError::ArithmeticOverflow)?;
        if total == 0 {
            return Err(ContractError::ZeroTotalAllocPoint);
        }

        pool.alloc_point = alloc_point;
        pool.name = name;
        if overwrite_rewarder {
            pool.rewarder = rewarder;
        }
        storage::set_pool(&env, pool_id, &pool);
        storage::set_total_alloc_point(&env, total);

        events::publish_pool_modified(
            &env,
            pool_id,
            alloc_point,
            pool.rewarder,
            overwrite_rewarder,
        );

        Ok(())
    }

    /// Swap the emission-rate source. Requires `EmissionCurve`.
    ///
    /// Pools are rolled forward under the old curve first. Intervals the old
    /// curve prices out of range are skipped rather than blocking the swap.
    pub fn set_emission_curve(
        env: Env,
        caller: Address,
        emission_curve: Address,
    ) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        Self::require_role(&env, &caller, Role::EmissionCurve)?;
        let _guard = Self::enter(&env)?;

        ledger::update_all_pools_for_curve_swap(&env)?;
        storage::set_emission_curve(&env, &emission_curve);

        events::publish_emission_curve_set(&env, emission_curve);

        Ok(())
    }

    // ── Accrual ─────────────────────────────────────────────────────────────

    /// Roll a pool's accumulator forward to now.
    pub fn update_pool(env: Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
        storage::require_initialized(&env)?;
        let _guard = Self::enter(&env)?;
        ledger::update_pool(&env, pool_id)
    }

    pub fn mass_update_pools(env: Env, pool_ids: Vec<u32>) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        let _guard = Self::enter(&env)?;
        for pool_id in pool_ids.iter() {
            ledger::update_pool(&env, pool_id)?;
        }
        Ok(())
    }

    // ── Positions ───────────────────────────────────────────────────────────

    /// Mint a relic to `to` and fund it with `amount` pool tokens pulled from
    /// `caller`.
    pub fn create_relic_and_deposit(
        env: Env,
        caller: Address,
        to: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<u32, ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        let _guard = Self::enter(&env)?;

        if amount <= 0 {
            return Err(ContractError::ZeroAmount);
        }
        storage::get_pool(&env, pool_id)?;

        let relic_id = relics::mint(&env, &to)?;
        storage::set_position(
            &env,
            relic_id,
            &PositionInfo {
                amount: 0,
                reward_debt: 0,
                reward_credit: 0,
                entry: env.ledger().timestamp(),
                pool_id,
                level: 0,
            },
        );

        Self::deposit_into(&env, &caller, relic_id, amount)?;

        Ok(relic_id)
    }

    /// Add `amount` pool tokens to an existing relic.
    ///
    /// The relic's entry moves toward now in proportion to the size of the
    /// top-up relative to its current stake.
    pub fn deposit(
        env: Env,
        caller: Address,
        relic_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        let _guard = Self::enter(&env)?;

        if amount <= 0 {
            return Err(ContractError::ZeroAmount);
        }
        relics::require_approved_or_owner(&env, &caller, relic_id)?;

        Self::deposit_into(&env, &caller, relic_id, amount)
    }

    /// Withdraw `amount` pool tokens from a relic to `caller`. Earned reward
    /// is kept as credit.
    pub fn withdraw(
        env: Env,
        caller: Address,
        relic_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        let _guard = Self::enter(&env)?;

        Self::withdraw_from(&env, &caller, relic_id, amount, None)?;
        Ok(())
    }

    /// Pay a relic's credited and newly earned reward to `harvest_to`.
    ///
    /// The payout is capped at the contract's reward balance; the remainder
    /// stays credited for a later harvest. Returns the amount paid.
    pub fn harvest(
        env: Env,
        caller: Address,
        relic_id: u32,
        harvest_to: Address,
    ) -> Result<i128, ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        let _guard = Self::enter(&env)?;

        relics::require_approved_or_owner(&env, &caller, relic_id)?;

        let settlement = ledger::update_position(&env, relic_id, 0, Kind::Other, Some(harvest_to))?;
        settlement.interact(&env)?;

        Ok(settlement.received)
    }

    /// `withdraw` and `harvest` in a single settlement. Returns the reward
    /// paid.
    pub fn withdraw_and_harvest(
        env: Env,
        caller: Address,
        relic_id: u32,
        amount: i128,
        harvest_to: Address,
    ) -> Result<i128, ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        let _guard = Self::enter(&env)?;

        Self::withdraw_from(&env, &caller, relic_id, amount, Some(harvest_to))
    }

    /// Settle a relic and move it to the level its age has reached.
    /// Anyone may call this.
    pub fn update_position(env: Env, relic_id: u32) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        let _guard = Self::enter(&env)?;

        let settlement = ledger::update_position(&env, relic_id, 0, Kind::Other, None)?;
        settlement.interact(&env)
    }

    /// Return a relic's whole stake to its owner without touching rewards,
    /// and destroy the relic. Pending and credited reward are forfeited.
    pub fn emergency_withdraw(
        env: Env,
        caller: Address,
        relic_id: u32,
    ) -> Result<i128, ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        let _guard = Self::enter(&env)?;

        let owner = relics::owner_of(&env, relic_id)?;
        if caller != owner {
            return Err(ContractError::NotApprovedOrOwner);
        }

        let (pool_id, pool_token, amount) = ledger::emergency_exit(&env, relic_id)?;
        relics::burn(&env, relic_id)?;

        if amount > 0 {
            token::Client::new(&env, &pool_token).transfer(
                &env.current_contract_address(),
                &owner,
                &amount,
            );
        }

        events::publish_emergency_withdraw(&env, relic_id, pool_id, amount, owner);

        Ok(amount)
    }

    // ── Split / shift / merge ───────────────────────────────────────────────

    /// Move `amount` out of `from_id` into a new relic minted to `to`, with
    /// the same entry. Returns the new relic id.
    pub fn split(
        env: Env,
        caller: Address,
        from_id: u32,
        amount: i128,
        to: Address,
    ) -> Result<u32, ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        let _guard = Self::enter(&env)?;

        relics::require_approved_or_owner(&env, &caller, from_id)?;
        restructure::split(&env, from_id, amount, &to)
    }

    /// Move `amount` from `from_id` to `to_id` within one pool.
    pub fn shift(
        env: Env,
        caller: Address,
        from_id: u32,
        to_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        let _guard = Self::enter(&env)?;

        relics::require_approved_or_owner(&env, &caller, from_id)?;
        relics::require_approved_or_owner(&env, &caller, to_id)?;
        restructure::shift(&env, from_id, to_id, amount)
    }

    /// Fold `from_id` into `to_id` and destroy `from_id`.
    pub fn merge(
        env: Env,
        caller: Address,
        from_id: u32,
        to_id: u32,
    ) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        let _guard = Self::enter(&env)?;

        relics::require_approved_or_owner(&env, &caller, from_id)?;
        relics::require_approved_or_owner(&env, &caller, to_id)?;
        restructure::merge(&env, from_id, to_id)?;
        Ok(())
    }

    /// Destroy an empty relic. Fails while it still holds stake or any
    /// claimable reward.
    pub fn burn(env: Env, caller: Address, relic_id: u32) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        let _guard = Self::enter(&env)?;

        relics::require_approved_or_owner(&env, &caller, relic_id)?;
        let position = storage::get_position(&env, relic_id)?;
        if position.amount > 0 {
            return Err(ContractError::BurningPrincipal);
        }
        if ledger::pending_reward(&env, &position)? > 0 {
            return Err(ContractError::BurningRewards);
        }

        storage::remove_position(&env, relic_id);
        relics::burn(&env, relic_id)?;

        events::publish_relic_burned(&env, relic_id);

        Ok(())
    }

    // ── Relic ownership ─────────────────────────────────────────────────────

    pub fn owner_of(env: Env, relic_id: u32) -> Result<Address, ContractError> {
        relics::owner_of(&env, relic_id)
    }

    pub fn balance_of(env: Env, owner: Address) -> u32 {
        relics::balance_of(&env, &owner)
    }

    pub fn is_approved_or_owner(
        env: Env,
        spender: Address,
        relic_id: u32,
    ) -> Result<bool, ContractError> {
        relics::is_approved_or_owner(&env, &spender, relic_id)
    }

    /// Approve `spender` for a single relic, or clear the approval with
    /// `None`.
    pub fn approve(
        env: Env,
        caller: Address,
        spender: Option<Address>,
        relic_id: u32,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        relics::approve(&env, &caller, spender, relic_id)
    }

    pub fn get_approved(env: Env, relic_id: u32) -> Option<Address> {
        relics::get_approved(&env, relic_id)
    }

    pub fn set_approval_for_all(env: Env, owner: Address, operator: Address, approved: bool) {
        owner.require_auth();
        relics::set_approval_for_all(&env, &owner, &operator, approved);
    }

    pub fn is_approved_for_all(env: Env, owner: Address, operator: Address) -> bool {
        relics::is_approved_for_all(&env, &owner, &operator)
    }

    /// Move a relic between owners. The position travels with it untouched.
    pub fn transfer_from(
        env: Env,
        caller: Address,
        from: Address,
        to: Address,
        relic_id: u32,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let _guard = Self::enter(&env)?;

        relics::require_approved_or_owner(&env, &caller, relic_id)?;
        relics::transfer(&env, &from, &to, relic_id)?;

        events::publish_relic_transferred(&env, relic_id, from, to);

        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn get_position(env: Env, relic_id: u32) -> Result<PositionInfo, ContractError> {
        storage::get_position(&env, relic_id)
    }

    pub fn get_pool_info(env: Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
        storage::get_pool(&env, pool_id)
    }

    pub fn get_level_info(env: Env, pool_id: u32) -> Result<LevelInfo, ContractError> {
        storage::get_levels(&env, pool_id)
    }

    pub fn pool_length(env: Env) -> u32 {
        storage::pool_count(&env)
    }

    pub fn total_alloc_point(env: Env) -> u32 {
        storage::total_alloc_point(&env)
    }

    pub fn reward_token(env: Env) -> Result<Address, ContractError> {
        storage::reward_token(&env)
    }

    pub fn emission_curve(env: Env) -> Result<Address, ContractError> {
        storage::emission_curve(&env)
    }

    /// Reward a relic could harvest right now (credit included), assuming
    /// unlimited reward balance.
    pub fn pending_reward(env: Env, relic_id: u32) -> Result<i128, ContractError> {
        let position = storage::get_position(&env, relic_id)?;
        ledger::pending_reward(&env, &position)
    }

    /// Level the relic would move to on its next settlement.
    pub fn level_on_update(env: Env, relic_id: u32) -> Result<u32, ContractError> {
        let position = storage::get_position(&env, relic_id)?;
        ledger::level_on_update(&env, &position)
    }

    pub fn relic_positions_of_owner(
        env: Env,
        owner: Address,
    ) -> Result<Vec<RelicPosition>, ContractError> {
        let mut out = Vec::new(&env);
        for relic_id in relics::relics_of_owner(&env, &owner).iter() {
            out.push_back(RelicPosition {
                relic_id,
                position: storage::get_position(&env, relic_id)?,
            });
        }
        Ok(out)
    }

    pub fn pending_rewards_of_owner(
        env: Env,
        owner: Address,
    ) -> Result<Vec<PendingReward>, ContractError> {
        let mut out = Vec::new(&env);
        for relic_id in relics::relics_of_owner(&env, &owner).iter() {
            let position = storage::get_position(&env, relic_id)?;
            out.push_back(PendingReward {
                relic_id,
                pool_id: position.pool_id,
                pending_reward: ledger::pending_reward(&env, &position)?,
            });
        }
        Ok(out)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn enter(env: &Env) -> Result<ReentrancyGuard, ContractError> {
        ReentrancyGuard::enter(env).ok_or(ContractError::Reentrancy)
    }

    fn require_role(env: &Env, caller: &Address, role: Role) -> Result<(), ContractError> {
        if !roles::has_role(env, caller, role) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Settle, then pull `amount` pool tokens from `funder`, then notify.
    fn deposit_into(
        env: &Env,
        funder: &Address,
        relic_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        let settlement = ledger::update_position(env, relic_id, amount, Kind::Deposit, None)?;

        token::Client::new(env, &settlement.pool_token).transfer(
            funder,
            &env.current_contract_address(),
            &amount,
        );
        settlement.interact(env)?;

        events::publish_deposit(env, relic_id, settlement.pool_id, amount, funder.clone());

        Ok(())
    }

    fn withdraw_from(
        env: &Env,
        caller: &Address,
        relic_id: u32,
        amount: i128,
        harvest_to: Option<Address>,
    ) -> Result<i128, ContractError> {
        if amount <= 0 {
            return Err(ContractError::ZeroAmount);
        }
        relics::require_approved_or_owner(env, caller, relic_id)?;

        let settlement =
            ledger::update_position(env, relic_id, amount, Kind::Withdraw, harvest_to)?;

        token::Client::new(env, &settlement.pool_token).transfer(
            &env.current_contract_address(),
            caller,
            &amount,
        );
        settlement.interact(env)?;

        events::publish_withdraw(env, relic_id, settlement.pool_id, amount, caller.clone());

        Ok(settlement.received)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test_support;


#[cfg(test)]
mod test_restructure;
