pub mod account_structs;
/// # IFO - Initial Farm Offering
///
/// ## Business Process Flow
///
/// 1. Initial Setup:
///    - Admin creates a farm pool that stakes the LP token and pays the yield token
///    - Admin initializes the sale with the LP, offering and yield mints, the
///      slot window, the offering cap and the raising target
///    - Admin funds the offering vault and approves the farm to pull LP
///
/// 2. Deposit Flow (start_slot <= slot < end_slot):
///    - User deposits LP tokens
///    - The LP is forwarded to the farm in the same transaction
///    - The first deposit registers the user as a participant
///
/// 3. Round End (slot >= end_slot):
///    - Admin withdraws the whole farm position once
///    - LP returns to the LP vault, farm rewards land in the yield vault
///    - The yield vault balance is frozen as the harvest snapshot
///
/// 4. Harvest:
///    - Each participant claims once
///    - Offering tokens: pro-rata when over-subscribed, fixed price otherwise
///    - LP refund for the over-subscribed part of the contribution
///    - Yield share proportional to the allocation
///
/// 5. Administrative Functions:
///    - Withdraw LP any time after the sale ended
///    - Withdraw unsold offering tokens two days after the sale ended
///
/// Every instruction runs inside a single Solana transaction, so a failed
/// farm or token transfer leaves no partial state behind.
pub mod allocation;
pub mod error;
pub mod events;
mod guard;
pub mod processor;
mod staking;
pub mod state;

use account_structs::*;
use anchor_lang::prelude::*;
use state::InitializeParams;

declare_id!("FTc4WeMbFoygHYZ24x6rBUM4AjhYmkcegXwaBroyrL2L");

#[program]
pub mod ifo {
    use super::*;

    /// Creates the sale and its three vaults. Only the program's upgrade
    /// authority may call it:
    /// - params.start_slot / params.end_slot: deposit window, end exclusive
    /// - params.offering_amount: offering tokens for sale
    /// - params.raising_amount: LP the sale aims to raise
    /// - params.pool_id: farm pool the contributed LP is staked in
    pub fn initialize(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
        processor::initialize(ctx, params)
    }

    /// Grants the farm authority an unlimited delegate on the LP vault.
    pub fn approve(ctx: Context<Approve>) -> Result<()> {
        processor::approve(ctx)
    }

    /// Handles user LP deposits:
    /// - Transfers LP to the vault and stakes it in the farm
    /// - Registers first-time participants
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        processor::deposit(ctx, amount)
    }

    pub fn end_round(ctx: Context<EndRound>) -> Result<()> {
        processor::end_round(ctx)
    }

    /// Pays the caller's offering tokens, LP refund and yield share.
    pub fn harvest(ctx: Context<Harvest>) -> Result<()> {
        processor::harvest(ctx)
    }

    pub fn final_withdraw_lp_token(ctx: Context<FinalWithdraw>, amount: u64) -> Result<()> {
        processor::final_withdraw_lp_token(ctx, amount)
    }

    pub fn final_withdraw_offering_token(ctx: Context<FinalWithdraw>, amount: u64) -> Result<()> {
        processor::final_withdraw_offering_token(ctx, amount)
    }

    pub fn total_amount(ctx: Context<PoolView>) -> Result<u64> {
        processor::total_amount(ctx)
    }

    pub fn get_user_allocation(ctx: Context<UserView>, user: Pubkey) -> Result<u64> {
        processor::get_user_allocation(ctx, user)
    }

    pub fn get_offering_amount(ctx: Context<UserView>, user: Pubkey) -> Result<u64> {
        processor::get_offering_amount(ctx, user)
    }

    pub fn get_refunding_amount(ctx: Context<UserView>, user: Pubkey) -> Result<u64> {
        processor::get_refunding_amount(ctx, user)
    }

    pub fn has_harvest(ctx: Context<UserView>, user: Pubkey) -> Result<bool> {
        processor::has_harvest(ctx, user)
    }

    pub fn get_address_list_length(ctx: Context<PoolView>) -> Result<u64> {
        processor::get_address_list_length(ctx)
    }
}
