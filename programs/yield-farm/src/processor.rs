use crate::account_structs::*;
use crate::error::*;
use crate::events::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

pub fn initialize_pool(
    ctx: Context<InitializePool>,
    pool_id: u64,
    reward_per_slot: u64,
) -> Result<()> {
    require!(
        ctx.accounts.stake_mint.key() != ctx.accounts.reward_mint.key(),
        FarmErrorCode::StakeAndRewardCannotBeSame
    );

    let farm_pool = &mut ctx.accounts.farm_pool;
    farm_pool.admin = ctx.accounts.admin.key();
    farm_pool.pool_id = pool_id;
    farm_pool.stake_mint = ctx.accounts.stake_mint.key();
    farm_pool.reward_mint = ctx.accounts.reward_mint.key();
    farm_pool.stake_vault = ctx.accounts.stake_vault.key();
    farm_pool.reward_vault = ctx.accounts.reward_vault.key();
    farm_pool.reward_per_slot = reward_per_slot;
    farm_pool.acc_reward_per_share = 0;
    farm_pool.last_reward_slot = Clock::get()?.slot;
    farm_pool.total_staked = 0;
    farm_pool.bump = ctx.bumps.farm_pool;
    farm_pool.authority_bump = ctx.bumps.farm_authority;

    emit!(FarmPoolInitialized {
        admin: farm_pool.admin,
        pool_id,
        stake_mint: farm_pool.stake_mint,
        reward_mint: farm_pool.reward_mint,
        reward_per_slot,
    });

    Ok(())
}

// Pull `amount` of the stake token from the depositor's account. The farm
// authority moves the tokens as SPL delegate, so the depositor must have
// approved it beforehand; otherwise the token program rejects the transfer.
pub fn deposit_for_pool(ctx: Context<DepositForPool>, pool_id: u64, amount: u64) -> Result<()> {
    require!(amount > 0, FarmErrorCode::InvalidAmount);
    let slot = Clock::get()?.slot;

    let farm_pool_key = ctx.accounts.farm_pool.key();
    let seeds: &[&[u8]] = &[
        b"farm_authority",
        farm_pool_key.as_ref(),
        &[ctx.accounts.farm_pool.authority_bump],
    ];
    let signer = &[&seeds[..]];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.depositor_token_account.to_account_info(),
                to: ctx.accounts.stake_vault.to_account_info(),
                authority: ctx.accounts.farm_authority.to_account_info(),
            },
            signer,
        ),
        amount,
    )?;

    let position = &mut ctx.accounts.position;
    if position.owner == Pubkey::default() {
        position.pool = farm_pool_key;
        position.owner = ctx.accounts.depositor.key();
        position.bump = ctx.bumps.position;
    }

    let farm_pool = &mut ctx.accounts.farm_pool;
    farm_pool.stake(position, amount, slot)?;

    msg!("Farm pool {} deposit {} total staked {}", pool_id, amount, farm_pool.total_staked);
    emit!(FarmDeposited {
        pool_id,
        depositor: position.owner,
        amount,
        position_amount: position.amount,
        total_staked: farm_pool.total_staked,
        slot,
    });

    Ok(())
}

pub fn withdraw_all_and_claim(ctx: Context<WithdrawAllAndClaim>, pool_id: u64) -> Result<()> {
    let slot = Clock::get()?.slot;
    let reward_available = ctx.accounts.reward_vault.amount;

    let (staked, reward) = ctx.accounts.farm_pool.unstake_all(
        &mut ctx.accounts.position,
        slot,
        reward_available,
    )?;

    let farm_pool_key = ctx.accounts.farm_pool.key();
    let seeds: &[&[u8]] = &[
        b"farm_authority",
        farm_pool_key.as_ref(),
        &[ctx.accounts.farm_pool.authority_bump],
    ];
    let signer = &[&seeds[..]];

    // zero when only a reward shortfall is being claimed
    if staked > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.stake_vault.to_account_info(),
                    to: ctx.accounts.depositor_stake_account.to_account_info(),
                    authority: ctx.accounts.farm_authority.to_account_info(),
                },
                signer,
            ),
            staked,
        )?;
    }

    if reward > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.reward_vault.to_account_info(),
                    to: ctx.accounts.depositor_reward_account.to_account_info(),
                    authority: ctx.accounts.farm_authority.to_account_info(),
                },
                signer,
            ),
            reward,
        )?;
    }

    msg!("Farm pool {} withdraw {} reward {}", pool_id, staked, reward);
    emit!(FarmWithdrawn {
        pool_id,
        depositor: ctx.accounts.depositor.key(),
        staked_amount: staked,
        reward_amount: reward,
        total_staked: ctx.accounts.farm_pool.total_staked,
        slot,
    });

    Ok(())
}
