extern crate std;

use soroban_sdk::{testutils::Address as _, Address, Vec};

use crate::test_support::setup;
use crate::ContractError;

const LADDER: [u64; 3] = [0, 100, 1_000];
const MULTIPLIERS: [u32; 3] = [1, 2, 3];

// ── Split ─────────────────────────────────────────────────────────────────────

#[test]
fn test_split_keeps_entry_and_conserves_stake() {
    let ctx = setup(10);
    let pool = ctx.add_pool(&LADDER, &MULTIPLIERS, true);
    let alice = ctx.staker(1_000);
    let bob = Address::generate(&ctx.env);
    let from = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &1_000);

    ctx.at(150);
    let pending_before = ctx.client.pending_reward(&from);
    let new_id = ctx.client.split(&alice, &from, &400, &bob);

    assert_eq!(ctx.client.owner_of(&new_id), bob);

    let source = ctx.client.get_position(&from);
    let created = ctx.client.get_position(&new_id);
    assert_eq!(source.amount + created.amount, 1_000);
    assert_eq!(created.amount, 400);
    assert_eq!(source.entry, 0);
    assert_eq!(created.entry, 0);
    assert_eq!(source.level, 1);
    assert_eq!(created.level, 1);

    // Reward earned before the split stays with the source relic.
    assert_eq!(pending_before, 1_500);
    assert_eq!(source.reward_credit, 1_500);
    assert_eq!(created.reward_credit, 0);
    assert_eq!(ctx.client.pending_reward(&from), 1_500);
    assert_eq!(ctx.client.pending_reward(&new_id), 0);

    assert_eq!(
        ctx.client.get_level_info(&pool).balance,
        Vec::from_array(&ctx.env, [0i128, 1_000, 0])
    );
    ctx.assert_conservation(pool, &[from, new_id]);

    // Both halves now earn at level 1 in proportion to their stake.
    ctx.at(250);
    assert_eq!(ctx.client.pending_reward(&from), 2_100);
    assert_eq!(ctx.client.pending_reward(&new_id), 400);
}

#[test]
fn test_split_requires_partial_withdrawals() {
    let ctx = setup(10);
    let pool = ctx.add_pool(&LADDER, &MULTIPLIERS, false);
    let alice = ctx.staker(1_000);
    let from = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &1_000);

    match ctx.client.try_split(&alice, &from, &400, &alice) {
        Err(Ok(e)) => assert_eq!(e, ContractError::PartialWithdrawalsDisabled),
        _ => unreachable!("Expected PartialWithdrawalsDisabled error"),
    }
}

#[test]
fn test_split_bad_amounts_fail() {
    let ctx = setup(10);
    let pool = ctx.add_pool(&LADDER, &MULTIPLIERS, true);
    let alice = ctx.staker(1_000);
    let from = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &1_000);

    match ctx.client.try_split(&alice, &from, &1_001, &alice) {
        Err(Ok(e)) => assert_eq!(e, ContractError::AmountExceedsDeposit),
        _ => unreachable!("Expected AmountExceedsDeposit error"),
    }
    match ctx.client.try_split(&alice, &from, &0, &alice) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ZeroAmount),
        _ => unreachable!("Expected ZeroAmount error"),
    }
    assert_eq!(ctx.client.balance_of(&alice), 1);
}

#[test]
fn test_split_by_stranger_fails() {
    let ctx = setup(10);
    let pool = ctx.add_pool(&LADDER, &MULTIPLIERS, true);
    let alice = ctx.staker(1_000);
    let mallory = Address::generate(&ctx.env);
    let from = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &1_000);

    match ctx.client.try_split(&mallory, &from, &10, &mallory) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotApprovedOrOwner),
        _ => unreachable!("Expected NotApprovedOrOwner error"),
    }
}

// ── Shift ─────────────────────────────────────────────────────────────────────

#[test]
fn test_shift_blends_entry_by_pre_move_amounts() {
    let ctx = setup(10);
    let pool = ctx.add_pool(&LADDER, &MULTIPLIERS, true);
    let alice = ctx.staker(1_000);
    let a = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &300);
    ctx.at(400);
    let b = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &100);

    ctx.at(500);
    ctx.client.shift(&alice, &a, &b, &300);

    let source = ctx.client.get_position(&a);
    let target = ctx.client.get_position(&b);

    // (300 × 0 + 100 × 400) / 400
    assert_eq!(target.entry, 100);
    assert_eq!(target.amount, 400);
    assert_eq!(target.level, 1);
    assert_eq!(source.amount, 0);
    assert_eq!(source.entry, 0);

    assert_eq!(source.reward_credit, 4_749);
    assert_eq!(target.reward_credit, 250);

    assert_eq!(
        ctx.client.get_level_info(&pool).balance,
        Vec::from_array(&ctx.env, [0i128, 400, 0])
    );
    ctx.assert_conservation(pool, &[a, b]);
}

#[test]
fn test_partial_shift() {
    let ctx = setup(10);
    let pool = ctx.add_pool(&LADDER, &MULTIPLIERS, true);
    let alice = ctx.staker(1_000);
    let a = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &500);
    let b = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &500);

    ctx.at(100);
    ctx.client.shift(&alice, &a, &b, &200);

    assert_eq!(ctx.client.get_position(&a).amount, 300);
    assert_eq!(ctx.client.get_position(&b).amount, 700);
    assert_eq!(ctx.client.get_position(&b).entry, 0);
    assert_eq!(ctx.client.pending_reward(&a), 500);
    assert_eq!(ctx.client.pending_reward(&b), 500);
    ctx.assert_conservation(pool, &[a, b]);
}

#[test]
fn test_shift_invalid_pairs_fail() {
    let ctx = setup(10);
    let first = ctx.add_pool(&LADDER, &MULTIPLIERS, true);
    let second = ctx.add_pool(&LADDER, &MULTIPLIERS, true);
    let alice = ctx.staker(1_000);
    let bob = ctx.staker(1_000);
    let a = ctx.client.create_relic_and_deposit(&alice, &alice, &first, &100);
    let c = ctx.client.create_relic_and_deposit(&alice, &alice, &second, &100);
    let foreign = ctx.client.create_relic_and_deposit(&bob, &bob, &first, &100);

    match ctx.client.try_shift(&alice, &a, &a, &10) {
        Err(Ok(e)) => assert_eq!(e, ContractError::DuplicateRelicIds),
        _ => unreachable!("Expected DuplicateRelicIds error"),
    }
    match ctx.client.try_shift(&alice, &a, &c, &10) {
        Err(Ok(e)) => assert_eq!(e, ContractError::RelicsNotOfSamePool),
        _ => unreachable!("Expected RelicsNotOfSamePool error"),
    }
    match ctx.client.try_shift(&alice, &a, &foreign, &10) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotApprovedOrOwner),
        _ => unreachable!("Expected NotApprovedOrOwner error"),
    }
    match ctx.client.try_shift(&alice, &a, &c, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ZeroAmount),
        _ => unreachable!("Expected ZeroAmount error"),
    }
}

// ── Merge ─────────────────────────────────────────────────────────────────────

#[test]
fn test_merge_conserves_reward_and_burns_source() {
    let ctx = setup(10);
    // Merging is allowed even where partial withdrawals are not.
    let pool = ctx.add_pool(&LADDER, &MULTIPLIERS, false);
    let alice = ctx.staker(1_000);
    let a = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &300);
    ctx.at(400);
    let b = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &100);

    ctx.at(500);
    let before = ctx.client.pending_reward(&a) + ctx.client.pending_reward(&b);
    ctx.client.merge(&alice, &a, &b);

    assert_eq!(before, 4_999);
    assert_eq!(ctx.client.pending_reward(&b), before);

    let merged = ctx.client.get_position(&b);
    assert_eq!(merged.amount, 400);
    assert_eq!(merged.entry, 100);
    assert_eq!(merged.level, 1);
    assert_eq!(merged.reward_credit, 4_999);

    match ctx.client.try_get_position(&a) {
        Err(Ok(e)) => assert_eq!(e, ContractError::RelicNotFound),
        _ => unreachable!("Expected RelicNotFound error"),
    }
    match ctx.client.try_owner_of(&a) {
        Err(Ok(e)) => assert_eq!(e, ContractError::RelicNotFound),
        _ => unreachable!("Expected RelicNotFound error"),
    }
    assert_eq!(ctx.client.balance_of(&alice), 1);
    assert_eq!(
        ctx.client.get_level_info(&pool).balance,
        Vec::from_array(&ctx.env, [0i128, 400, 0])
    );
    ctx.assert_conservation(pool, &[b]);
}

#[test]
fn test_merge_empty_relics_fails() {
    let ctx = setup(10);
    let pool = ctx.add_pool(&LADDER, &MULTIPLIERS, false);
    let alice = ctx.staker(1_000);
    let a = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &100);
    let b = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &100);
    ctx.client.withdraw(&alice, &a, &100);
    ctx.client.withdraw(&alice, &b, &100);

    match ctx.client.try_merge(&alice, &a, &b) {
        Err(Ok(e)) => assert_eq!(e, ContractError::MergingEmptyRelics),
        _ => unreachable!("Expected MergingEmptyRelics error"),
    }
}

#[test]
fn test_merge_same_relic_fails() {
    let ctx = setup(10);
    let pool = ctx.add_pool(&LADDER, &MULTIPLIERS, true);
    let alice = ctx.staker(1_000);
    let a = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &100);

    match ctx.client.try_merge(&alice, &a, &a) {
        Err(Ok(e)) => assert_eq!(e, ContractError::DuplicateRelicIds),
        _ => unreachable!("Expected DuplicateRelicIds error"),
    }
}

#[test]
fn test_operator_can_restructure_for_owner() {
    let ctx = setup(10);
    let pool = ctx.add_pool(&LADDER, &MULTIPLIERS, true);
    let alice = ctx.staker(1_000);
    let keeper = Address::generate(&ctx.env);
    let a = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &100);
    let b = ctx.client.create_relic_and_deposit(&alice, &alice, &pool, &100);

    ctx.client.set_approval_for_all(&alice, &keeper, &true);
    assert!(ctx.client.is_approved_for_all(&alice, &keeper));
    ctx.client.merge(&keeper, &a, &b);

    assert_eq!(ctx.client.get_position(&b).amount, 200);
    assert_eq!(ctx.client.owner_of(&b), alice);
}
