pub mod account_structs;
/// # yield farm - Slot-based Staking Rewards
///
/// A single-purpose staking facility: depositors stake one token into a
/// numbered pool and earn a second token emitted at a fixed rate per slot,
/// shared pro-rata over everything staked.
///
/// The IFO program uses it as its external staking facility:
/// - `deposit_for_pool`: the farm pulls stake tokens from the depositor's
///   account as SPL delegate of the farm authority PDA
/// - `withdraw_all_and_claim`: returns the whole position plus accrued rewards
///
/// Rewards are paid out of the pool's reward vault, which the pool admin funds
/// with a plain token transfer. Payouts never exceed the vault balance.
pub mod error;
pub mod events;
pub mod processor;
pub mod state;

use account_structs::*;
use anchor_lang::prelude::*;

declare_id!("AwgDob7BPeaqKcXFyzh3XeiReoioLhLPzNvSPsUhzCZv");

#[program]
pub mod yield_farm {
    use super::*;

    /// Creates pool `pool_id` with its stake and reward vaults:
    /// - reward_per_slot: reward tokens emitted per slot across all stakers
    pub fn initialize_pool(
        ctx: Context<InitializePool>,
        pool_id: u64,
        reward_per_slot: u64,
    ) -> Result<()> {
        processor::initialize_pool(ctx, pool_id, reward_per_slot)
    }

    pub fn deposit_for_pool(ctx: Context<DepositForPool>, pool_id: u64, amount: u64) -> Result<()> {
        processor::deposit_for_pool(ctx, pool_id, amount)
    }

    pub fn withdraw_all_and_claim(ctx: Context<WithdrawAllAndClaim>, pool_id: u64) -> Result<()> {
        processor::withdraw_all_and_claim(ctx, pool_id)
    }
}
