extern crate std;

use common::Role;
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short,
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env, String, Symbol, Vec,
};

use crate::{levels, ReliquaryContract, ReliquaryContractClient};

// ── Mock collaborators ───────────────────────────────────────────────────────

const RATE: Symbol = symbol_short!("RATE");
const CALLS: Symbol = symbol_short!("CALLS");

/// Emission curve returning a settable constant rate.
#[contract]
pub struct MockEmissionCurve;

#[contractimpl]
impl MockEmissionCurve {
    pub fn set_rate(env: Env, rate: i128) {
        env.storage().instance().set(&RATE, &rate);
    }

    pub fn get_rate(env: Env, _last_reward_time: u64) -> i128 {
        env.storage().instance().get(&RATE).unwrap_or(0)
    }
}

/// One notification received by [`MockRewarder`].
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HookCall {
    pub hook: Symbol,
    pub relic_id: u32,
    pub amount: i128,
}

/// Rewarder that records every notification it receives.
#[contract]
pub struct MockRewarder;

#[contractimpl]
impl MockRewarder {
    pub fn on_reward(env: Env, relic_id: u32, reward_amount: i128, _to: Address) {
        Self::record(&env, symbol_short!("reward"), relic_id, reward_amount);
    }

    pub fn on_deposit(env: Env, relic_id: u32, deposit_amount: i128) {
        Self::record(&env, symbol_short!("deposit"), relic_id, deposit_amount);
    }

    pub fn on_withdraw(env: Env, relic_id: u32, withdrawal_amount: i128) {
        Self::record(&env, symbol_short!("withdraw"), relic_id, withdrawal_amount);
    }

    pub fn calls(env: Env) -> Vec<HookCall> {
        env.storage()
            .instance()
            .get(&CALLS)
            .unwrap_or(Vec::new(&env))
    }

    fn record(env: &Env, hook: Symbol, relic_id: u32, amount: i128) {
        let mut calls = Self::calls(env.clone());
        calls.push_back(HookCall {
            hook,
            relic_id,
            amount,
        });
        env.storage().instance().set(&CALLS, &calls);
    }
}

// ── Test environment ─────────────────────────────────────────────────────────

pub struct TestContext {
    pub env: Env,
    pub client: ReliquaryContractClient<'static>,
    pub contract_id: Address,
    pub admin: Address,
    pub reward_token: Address,
    pub pool_token: Address,
    pub curve: MockEmissionCurveClient<'static>,
}

/// Provisions a full test environment:
/// - Two SAC token contracts (pool stake + reward)
/// - A constant-rate emission curve emitting `rate` per second
/// - A deployed, initialized ReliquaryContract whose admin also holds
///   `Operator` and `EmissionCurve`
/// - `reward_funding` reward tokens minted to the contract
pub fn setup_funded(rate: i128, reward_funding: i128) -> TestContext {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(0);

    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let pool_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let curve_id = env.register(MockEmissionCurve, ());
    let curve = MockEmissionCurveClient::new(&env, &curve_id);
    curve.set_rate(&rate);

    let contract_id = env.register(ReliquaryContract, ());
    let client = ReliquaryContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &reward_token, &curve_id);
    client.grant_role(&admin, &admin, &Role::Operator);
    client.grant_role(&admin, &admin, &Role::EmissionCurve);

    if reward_funding > 0 {
        StellarAssetClient::new(&env, &reward_token).mint(&contract_id, &reward_funding);
    }

    TestContext {
        env,
        client,
        contract_id,
        admin,
        reward_token,
        pool_token,
        curve,
    }
}

pub fn setup(rate: i128) -> TestContext {
    setup_funded(rate, 1_000_000_000_000)
}

impl TestContext {
    /// Adds a pool staking `self.pool_token` with alloc point 100.
    pub fn add_pool(&self, maturities: &[u64], multipliers: &[u32], partial: bool) -> u32 {
        self.add_pool_with(100, maturities, multipliers, partial, None)
    }

    pub fn add_pool_with(
        &self,
        alloc_point: u32,
        maturities: &[u64],
        multipliers: &[u32],
        partial: bool,
        rewarder: Option<Address>,
    ) -> u32 {
        self.client.add_pool(
            &self.admin,
            &alloc_point,
            &self.pool_token,
            &rewarder,
            &Vec::from_slice(&self.env, maturities),
            &Vec::from_slice(&self.env, multipliers),
            &String::from_str(&self.env, "pool"),
            &partial,
        )
    }

    /// A fresh account holding `amount` pool tokens.
    pub fn staker(&self, amount: i128) -> Address {
        let staker = Address::generate(&self.env);
        StellarAssetClient::new(&self.env, &self.pool_token).mint(&staker, &amount);
        staker
    }

    pub fn at(&self, timestamp: u64) {
        self.env.ledger().set_timestamp(timestamp);
    }

    pub fn pool_balance(&self, account: &Address) -> i128 {
        TokenClient::new(&self.env, &self.pool_token).balance(account)
    }

    pub fn reward_balance(&self, account: &Address) -> i128 {
        TokenClient::new(&self.env, &self.reward_token).balance(account)
    }

    /// Σ position amounts over `relic_ids` must equal Σ level balances.
    pub fn assert_conservation(&self, pool_id: u32, relic_ids: &[u32]) {
        let mut staked = 0i128;
        for relic_id in relic_ids {
            staked += self.client.get_position(relic_id).amount;
        }
        let levels = self.client.get_level_info(&pool_id);
        assert_eq!(
            staked,
            levels::total_balance(&levels),
            "level balances drifted from positions"
        );
    }
}
