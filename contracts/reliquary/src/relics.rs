//! Relic identity: the non-fungible ids positions are keyed by.
//!
//! Ids come from a monotonically increasing nonce starting at 1. The ledger
//! only ever asks this module to mint, burn, resolve owners and check
//! approvals; everything else here exists so approvals can be granted.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::errors::ContractError;

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

#[contracttype]
#[derive(Clone, Debug)]
pub enum RelicKey {
    Nonce,
    Owner(u32),
    Approved(u32),
    /// (owner, operator) → approved for every relic of `owner`.
    Operator(Address, Address),
    /// Relic ids held by an owner.
    Owned(Address),
}

fn extend_ttl(env: &Env, key: &RelicKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Identity provider ────────────────────────────────────────────────────────

/// Issues the next relic id to `to`.
pub fn mint(env: &Env, to: &Address) -> Result<u32, ContractError> {
    let nonce: u32 = env.storage().instance().get(&RelicKey::Nonce).unwrap_or(0);
    let relic_id = nonce
        .checked_add(1)
        .ok_or(ContractError::ArithmeticOverflow)?;
    env.storage().instance().set(&RelicKey::Nonce, &relic_id);

    let key = RelicKey::Owner(relic_id);
    env.storage().persistent().set(&key, to);
    extend_ttl(env, &key);
    add_owned(env, to, relic_id);
    Ok(relic_id)
}

/// Destroys a relic id. Payload cleanup is the ledger's job.
pub fn burn(env: &Env, relic_id: u32) -> Result<(), ContractError> {
    let owner = owner_of(env, relic_id)?;
    env.storage().persistent().remove(&RelicKey::Owner(relic_id));
    env.storage().persistent().remove(&RelicKey::Approved(relic_id));
    remove_owned(env, &owner, relic_id);
    Ok(())
}

pub fn owner_of(env: &Env, relic_id: u32) -> Result<Address, ContractError> {
    let key = RelicKey::Owner(relic_id);
    let owner: Address = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::RelicNotFound)?;
    extend_ttl(env, &key);
    Ok(owner)
}

pub fn is_approved_or_owner(
    env: &Env,
    spender: &Address,
    relic_id: u32,
) -> Result<bool, ContractError> {
    let owner = owner_of(env, relic_id)?;
    Ok(*spender == owner
        || get_approved(env, relic_id).as_ref() == Some(spender)
        || is_approved_for_all(env, &owner, spender))
}

/// Fails with `NotApprovedOrOwner` unless `spender` may act for `relic_id`.
pub fn require_approved_or_owner(
    env: &Env,
    spender: &Address,
    relic_id: u32,
) -> Result<(), ContractError> {
    if !is_approved_or_owner(env, spender, relic_id)? {
        return Err(ContractError::NotApprovedOrOwner);
    }
    Ok(())
}

// ── Approvals ────────────────────────────────────────────────────────────────

/// Sets (or clears, with `None`) the single-relic approval.
///
/// `caller` must be the owner or an operator of the owner.
pub fn approve(
    env: &Env,
    caller: &Address,
    spender: Option<Address>,
    relic_id: u32,
) -> Result<(), ContractError> {
    let owner = owner_of(env, relic_id)?;
    if *caller != owner && !is_approved_for_all(env, &owner, caller) {
        return Err(ContractError::NotApprovedOrOwner);
    }
    let key = RelicKey::Approved(relic_id);
    match spender {
        Some(spender) => {
            env.storage().persistent().set(&key, &spender);
            extend_ttl(env, &key);
        }
        None => env.storage().persistent().remove(&key),
    }
    Ok(())
}

pub fn get_approved(env: &Env, relic_id: u32) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&RelicKey::Approved(relic_id))
}

pub fn set_approval_for_all(env: &Env, owner: &Address, operator: &Address, approved: bool) {
    let key = RelicKey::Operator(owner.clone(), operator.clone());
    if approved {
        env.storage().persistent().set(&key, &true);
        extend_ttl(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn is_approved_for_all(env: &Env, owner: &Address, operator: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&RelicKey::Operator(owner.clone(), operator.clone()))
        .unwrap_or(false)
}

// ── Ownership transfer and enumeration ───────────────────────────────────────

/// Moves `relic_id` from `from` to `to` and clears its single-relic approval.
pub fn transfer(env: &Env, from: &Address, to: &Address, relic_id: u32) -> Result<(), ContractError> {
    let owner = owner_of(env, relic_id)?;
    if owner != *from {
        return Err(ContractError::NotApprovedOrOwner);
    }
    env.storage().persistent().remove(&RelicKey::Approved(relic_id));
    let key = RelicKey::Owner(relic_id);
    env.storage().persistent().set(&key, to);
    extend_ttl(env, &key);
    remove_owned(env, from, relic_id);
    add_owned(env, to, relic_id);
    Ok(())
}

pub fn relics_of_owner(env: &Env, owner: &Address) -> Vec<u32> {
    env.storage()
        .persistent()
        .get(&RelicKey::Owned(owner.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn balance_of(env: &Env, owner: &Address) -> u32 {
    relics_of_owner(env, owner).len()
}

fn add_owned(env: &Env, owner: &Address, relic_id: u32) {
    let key = RelicKey::Owned(owner.clone());
    let mut owned = relics_of_owner(env, owner);
    owned.push_back(relic_id);
    env.storage().persistent().set(&key, &owned);
    extend_ttl(env, &key);
}

fn remove_owned(env: &Env, owner: &Address, relic_id: u32) {
    let key = RelicKey::Owned(owner.clone());
    let mut owned = relics_of_owner(env, owner);
    if let Some(index) = owned.first_index_of(relic_id) {
        owned.remove(index);
    }
    if owned.is_empty() {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &owned);
        extend_ttl(env, &key);
    }
}
