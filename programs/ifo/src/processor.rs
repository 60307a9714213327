use crate::account_structs::*;
use crate::error::*;
use crate::events::*;
use crate::guard::validate_program_update_authority;
use crate::staking;
use crate::state::{InitializeParams, SweepVault, VAULT_AUTHORITY_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

/*
# Sale lifecycle

    start_slot ........ end_slot ........ end_slot + FINAL_WITHDRAW_DELAY_SLOTS
    |   deposit       |   end_round, harvest, final LP withdraw
                                          |   final offering withdraw

Every deposit is forwarded to the yield farm in the same transaction, so the LP
vault is empty while the sale is open. `end_round` pulls the LP back together
with the farm rewards and freezes the reward balance as `yield_snapshot`.
Each participant then harvests once:

- offering tokens: pro-rata when over-subscribed, fixed price otherwise
- LP refund: the part of the contribution above the raising target
- yield: allocation share of `yield_snapshot`

All amounts are floored. Whatever rounding leaves behind, and whatever is
never harvested, can only leave through the admin final withdrawals.
 */

pub fn initialize(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer)?;
    params.validate()?;
    let lp_mint = ctx.accounts.lp_mint.key();
    let offering_mint = ctx.accounts.offering_mint.key();
    let yield_mint = ctx.accounts.yield_mint.key();
    require!(
        lp_mint != offering_mint && lp_mint != yield_mint && offering_mint != yield_mint,
        IfoErrorCode::MintsMustDiffer
    );

    let pool = &mut ctx.accounts.ifo_pool;
    pool.admin = params.admin;
    pool.lp_mint = lp_mint;
    pool.offering_mint = offering_mint;
    pool.yield_mint = yield_mint;
    pool.lp_vault = ctx.accounts.lp_vault.key();
    pool.offering_vault = ctx.accounts.offering_vault.key();
    pool.yield_vault = ctx.accounts.yield_vault.key();
    pool.start_slot = params.start_slot;
    pool.end_slot = params.end_slot;
    pool.offering_amount = params.offering_amount;
    pool.raising_amount = params.raising_amount;
    pool.farm_program = ctx.accounts.farm_program.key();
    pool.farm_pool = ctx.accounts.farm_pool.key();
    pool.pool_id = params.pool_id;
    pool.total_amount = 0;
    pool.address_count = 0;
    pool.farm_ended = false;
    pool.yield_snapshot = 0;
    pool.ended_at_slot = 0;
    pool.bump = ctx.bumps.ifo_pool;
    pool.vault_authority_bump = ctx.bumps.vault_authority;

    emit!(IfoInitialized {
        admin: pool.admin,
        lp_mint,
        offering_mint,
        yield_mint,
        start_slot: pool.start_slot,
        end_slot: pool.end_slot,
        offering_amount: pool.offering_amount,
        raising_amount: pool.raising_amount,
        farm_pool: pool.farm_pool,
        pool_id: pool.pool_id,
    });

    Ok(())
}

pub fn approve(ctx: Context<Approve>) -> Result<()> {
    ctx.accounts
        .ifo_pool
        .require_admin(&ctx.accounts.signer.key())?;

    staking::approve_farm(ctx.accounts)?;

    msg!("LP vault approved for farm authority {}", ctx.accounts.farm_authority.key());
    emit!(ApproveEvent {
        admin: ctx.accounts.signer.key(),
        lp_vault: ctx.accounts.lp_vault.key(),
        delegate: ctx.accounts.farm_authority.key(),
        slot: Clock::get()?.slot,
    });

    Ok(())
}

pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    require!(amount > 0, IfoErrorCode::InvalidAmount);
    let slot = Clock::get()?.slot;
    ctx.accounts.ifo_pool.check_deposit_window(slot)?;

    msg!("Deposit amount: {}", amount);
    msg!("Current total_amount: {}", ctx.accounts.ifo_pool.total_amount);

    let cpi_accounts = Transfer {
        from: ctx.accounts.user_lp_account.to_account_info(),
        to: ctx.accounts.lp_vault.to_account_info(),
        authority: ctx.accounts.signer.to_account_info(),
    };
    token::transfer(
        CpiContext::new(ctx.accounts.token_program.to_account_info(), cpi_accounts),
        amount,
    )?;

    staking::deposit_for_pool(ctx.accounts, amount)?;

    // Book the deposit only once the LP sits in the farm
    let owner = ctx.accounts.signer.key();
    let user_info = &mut ctx.accounts.user_info;
    let pool = &mut ctx.accounts.ifo_pool;
    let first_deposit = pool.record_deposit(user_info, owner, amount, slot)?;
    if first_deposit {
        user_info.bump = ctx.bumps.user_info;
        msg!("New participant #{}", user_info.index);
    }

    emit!(DepositEvent {
        user: owner,
        deposit_amount: amount,
        user_amount: user_info.amount,
        total_amount: pool.total_amount,
        address_count: pool.address_count,
        slot,
    });

    Ok(())
}

// End the farming leg of the sale. Admin only, once, at or after end_slot.
// A sale nobody joined has no farm position to withdraw.
pub fn end_round(ctx: Context<EndRound>) -> Result<()> {
    let slot = Clock::get()?.slot;
    ctx.accounts
        .ifo_pool
        .require_admin(&ctx.accounts.signer.key())?;
    ctx.accounts.ifo_pool.check_end_round(slot)?;

    if ctx.accounts.ifo_pool.total_amount > 0 {
        staking::withdraw_all_and_claim(ctx.accounts)?;
    }

    ctx.accounts.lp_vault.reload()?;
    ctx.accounts.yield_vault.reload()?;
    let lp_balance = ctx.accounts.lp_vault.amount;
    let yield_balance = ctx.accounts.yield_vault.amount;
    msg!("LP returned: {}", lp_balance);
    msg!("Yield claimed: {}", yield_balance);

    let pool = &mut ctx.accounts.ifo_pool;
    pool.record_round_end(lp_balance, yield_balance, slot)?;

    emit!(RoundEndedEvent {
        admin: ctx.accounts.signer.key(),
        total_amount: pool.total_amount,
        lp_vault_balance: lp_balance,
        yield_snapshot: pool.yield_snapshot,
        slot,
    });

    Ok(())
}

pub fn harvest(ctx: Context<Harvest>) -> Result<()> {
    let slot = Clock::get()?.slot;
    let settlement = ctx
        .accounts
        .ifo_pool
        .settle_harvest(&ctx.accounts.user_info, slot)?;

    msg!("Offering amount: {}", settlement.offering_amount);
    msg!("Refunding amount: {}", settlement.refunding_amount);
    msg!("Yield amount: {}", settlement.yield_amount);

    let seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        &[ctx.accounts.ifo_pool.vault_authority_bump],
    ];
    let signer = &[&seeds[..]];
    let token_program = ctx.accounts.token_program.to_account_info();
    let vault_authority = ctx.accounts.vault_authority.to_account_info();

    let payouts = [
        (
            &ctx.accounts.offering_vault,
            &ctx.accounts.user_offering_account,
            settlement.offering_amount,
        ),
        (
            &ctx.accounts.lp_vault,
            &ctx.accounts.user_lp_account,
            settlement.refunding_amount,
        ),
        (
            &ctx.accounts.yield_vault,
            &ctx.accounts.user_yield_account,
            settlement.yield_amount,
        ),
    ];
    for (from, to, amount) in payouts {
        if amount == 0 {
            continue;
        }
        token::transfer(
            CpiContext::new_with_signer(
                token_program.clone(),
                Transfer {
                    from: from.to_account_info(),
                    to: to.to_account_info(),
                    authority: vault_authority.clone(),
                },
                signer,
            ),
            amount,
        )?;
    }

    // One atomic transaction, and the token program cannot call back in
    ctx.accounts.user_info.mark_harvested()?;

    emit!(HarvestEvent {
        user: ctx.accounts.signer.key(),
        offering_amount: settlement.offering_amount,
        refunding_amount: settlement.refunding_amount,
        yield_amount: settlement.yield_amount,
        slot,
    });

    Ok(())
}

pub fn final_withdraw_lp_token(ctx: Context<FinalWithdraw>, amount: u64) -> Result<()> {
    let slot = Clock::get()?.slot;
    let pool = &ctx.accounts.ifo_pool;
    pool.check_final_withdraw_lp(&ctx.accounts.signer.key(), slot)?;

    sweep_vault(ctx, SweepVault::Lp, amount, slot)
}

pub fn final_withdraw_offering_token(ctx: Context<FinalWithdraw>, amount: u64) -> Result<()> {
    let slot = Clock::get()?.slot;
    let pool = &ctx.accounts.ifo_pool;
    pool.check_final_withdraw_offering(&ctx.accounts.signer.key(), slot)?;

    sweep_vault(ctx, SweepVault::Offering, amount, slot)
}

fn sweep_vault(
    ctx: Context<FinalWithdraw>,
    which: SweepVault,
    amount: u64,
    slot: u64,
) -> Result<()> {
    ctx.accounts.ifo_pool.check_sweep(
        which,
        &ctx.accounts.vault.key(),
        ctx.accounts.vault.amount,
        amount,
    )?;

    let seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        &[ctx.accounts.ifo_pool.vault_authority_bump],
    ];
    let signer = &[&seeds[..]];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault.to_account_info(),
                to: ctx.accounts.admin_token_account.to_account_info(),
                authority: ctx.accounts.vault_authority.to_account_info(),
            },
            signer,
        ),
        amount,
    )?;

    msg!("Final withdraw of {} from vault {}", amount, ctx.accounts.vault.key());
    emit!(FinalWithdrawEvent {
        admin: ctx.accounts.signer.key(),
        mint: ctx.accounts.vault.mint,
        amount,
        vault_balance: ctx.accounts.vault.amount - amount,
        slot,
    });

    Ok(())
}

/// Total LP contributed so far
/// Returns value via return_data for efficient CPI access
pub fn total_amount(ctx: Context<PoolView>) -> Result<u64> {
    let total = ctx.accounts.ifo_pool.total_amount;
    anchor_lang::solana_program::program::set_return_data(&total.to_le_bytes());
    Ok(total)
}

/// Share of all contributions, scaled by 1e6
pub fn get_user_allocation(ctx: Context<UserView>, user: Pubkey) -> Result<u64> {
    let allocation = ctx
        .accounts
        .ifo_pool
        .user_allocation(ctx.accounts.user_amount())?;

    msg!("user_allocation: {} = {}", user, allocation);
    anchor_lang::solana_program::program::set_return_data(&allocation.to_le_bytes());

    Ok(allocation)
}

pub fn get_offering_amount(ctx: Context<UserView>, user: Pubkey) -> Result<u64> {
    let offering = ctx
        .accounts
        .ifo_pool
        .user_offering_amount(ctx.accounts.user_amount())?;

    msg!("offering_amount: {} = {}", user, offering);
    anchor_lang::solana_program::program::set_return_data(&offering.to_le_bytes());

    Ok(offering)
}

pub fn get_refunding_amount(ctx: Context<UserView>, user: Pubkey) -> Result<u64> {
    let refund = ctx
        .accounts
        .ifo_pool
        .user_refunding_amount(ctx.accounts.user_amount())?;

    msg!("refunding_amount: {} = {}", user, refund);
    anchor_lang::solana_program::program::set_return_data(&refund.to_le_bytes());

    Ok(refund)
}

pub fn has_harvest(ctx: Context<UserView>, _user: Pubkey) -> Result<bool> {
    let harvested = ctx.accounts.has_harvest();
    anchor_lang::solana_program::program::set_return_data(&[harvested as u8]);
    Ok(harvested)
}

pub fn get_address_list_length(ctx: Context<PoolView>) -> Result<u64> {
    let length = ctx.accounts.ifo_pool.address_count;
    anchor_lang::solana_program::program::set_return_data(&length.to_le_bytes());
    Ok(length)
}
