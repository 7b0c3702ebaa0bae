use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const ROLE_PREFIX: Symbol = symbol_short!("ROLE");
const ROLE_MEMBERS: Symbol = symbol_short!("ROLE_MBR");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Role Enum ────────────────────────────────────────────────────────────────

/// Capabilities a contract can gate its privileged calls on.
///
/// Roles are independent of each other: holding `Admin` does not imply
/// `Operator`. `Admin` is the only role allowed to grant and revoke.
///
/// - `Admin`         – Grants and revokes every role.
/// - `Operator`      – Adds and configures pools.
/// - `EmissionCurve` – Swaps the emission-rate source.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    Admin = 1,
    Operator = 2,
    EmissionCurve = 3,
}

// ── Storage Helpers ──────────────────────────────────────────────────────────

fn role_key(role: Role, account: &Address) -> (Symbol, Role, Address) {
    (ROLE_PREFIX, role, account.clone())
}

fn members_key(role: Role) -> (Symbol, Role) {
    (ROLE_MEMBERS, role)
}

// ── Core Functions ───────────────────────────────────────────────────────────

/// Returns true if `account` currently holds `role`.
pub fn has_role(env: &Env, account: &Address, role: Role) -> bool {
    let key = role_key(role, account);
    let held: bool = env.storage().persistent().get(&key).unwrap_or(false);
    if held {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    held
}

/// Assigns `role` without any authorization check.
/// Only for bootstrapping during contract initialization.
pub fn set_initial_admin(env: &Env, admin: &Address) {
    assign(env, admin, Role::Admin);
}

/// Grants `role` to `target`.
///
/// The caller must have already been authenticated via `require_auth()`.
/// Returns `false` if the caller does not hold `Admin`.
pub fn grant_role(env: &Env, caller: &Address, target: &Address, role: Role) -> bool {
    if !has_role(env, caller, Role::Admin) {
        return false;
    }
    assign(env, target, role);
    true
}

/// Revokes `role` from `target`. Revoking a role that is not held is a no-op.
///
/// Returns `false` if the caller does not hold `Admin`.
pub fn revoke_role(env: &Env, caller: &Address, target: &Address, role: Role) -> bool {
    if !has_role(env, caller, Role::Admin) {
        return false;
    }
    env.storage().persistent().remove(&role_key(role, target));
    untrack(env, target, role);
    true
}

/// Returns every address currently holding `role`.
pub fn role_members(env: &Env, role: Role) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&members_key(role))
        .unwrap_or(Vec::new(env))
}

fn assign(env: &Env, account: &Address, role: Role) {
    let key = role_key(role, account);
    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    track(env, account, role);
}

fn track(env: &Env, account: &Address, role: Role) {
    let mut members = role_members(env, role);
    if members.contains(account) {
        return;
    }
    members.push_back(account.clone());
    env.storage().persistent().set(&members_key(role), &members);
}

fn untrack(env: &Env, account: &Address, role: Role) {
    let members = role_members(env, role);
    let mut kept = Vec::new(env);
    for member in members.iter() {
        if member != *account {
            kept.push_back(member);
        }
    }
    env.storage().persistent().set(&members_key(role), &kept);
}
