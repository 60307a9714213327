use crate::error::*;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct InitializePool<'info> {
    #[account(
        init,
        payer = admin,
        space = FarmPool::LEN,
        seeds = [b"farm_pool", pool_id.to_le_bytes().as_ref()],
        bump
    )]
    pub farm_pool: Account<'info, FarmPool>,

    /// CHECK: PDA that owns both farm vaults and acts as SPL delegate on
    /// depositor accounts, validated by seeds constraint
    #[account(
        seeds = [b"farm_authority", farm_pool.key().as_ref()],
        bump
    )]
    pub farm_authority: UncheckedAccount<'info>,

    pub stake_mint: Account<'info, Mint>,
    pub reward_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = admin,
        seeds = [b"stake_vault", farm_pool.key().as_ref()],
        bump,
        token::mint = stake_mint,
        token::authority = farm_authority,
    )]
    pub stake_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = admin,
        seeds = [b"reward_vault", farm_pool.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = farm_authority,
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct DepositForPool<'info> {
    #[account(
        mut,
        seeds = [b"farm_pool", pool_id.to_le_bytes().as_ref()],
        bump = farm_pool.bump
    )]
    pub farm_pool: Account<'info, FarmPool>,

    /// CHECK: PDA farm authority, validated by seeds constraint
    #[account(
        seeds = [b"farm_authority", farm_pool.key().as_ref()],
        bump = farm_pool.authority_bump
    )]
    pub farm_authority: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = payer,
        space = FarmPosition::LEN,
        seeds = [b"position", farm_pool.key().as_ref(), depositor.key().as_ref()],
        bump
    )]
    pub position: Account<'info, FarmPosition>,

    /// Owner of the staked position. For the IFO this is its vault authority PDA.
    pub depositor: Signer<'info>,

    // Must have delegated to farm_authority before the farm can pull from it
    #[account(
        mut,
        constraint = depositor_token_account.mint == farm_pool.stake_mint @ FarmErrorCode::InvalidMint,
        constraint = depositor_token_account.owner == depositor.key() @ FarmErrorCode::InvalidTokenOwner
    )]
    pub depositor_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = farm_pool.stake_vault @ FarmErrorCode::InvalidVault
    )]
    pub stake_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct WithdrawAllAndClaim<'info> {
    #[account(
        mut,
        seeds = [b"farm_pool", pool_id.to_le_bytes().as_ref()],
        bump = farm_pool.bump
    )]
    pub farm_pool: Account<'info, FarmPool>,

    /// CHECK: PDA farm authority, validated by seeds constraint
    #[account(
        seeds = [b"farm_authority", farm_pool.key().as_ref()],
        bump = farm_pool.authority_bump
    )]
    pub farm_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [b"position", farm_pool.key().as_ref(), depositor.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == depositor.key() @ FarmErrorCode::InvalidPositionOwner
    )]
    pub position: Account<'info, FarmPosition>,

    pub depositor: Signer<'info>,

    #[account(
        mut,
        constraint = depositor_stake_account.mint == farm_pool.stake_mint @ FarmErrorCode::InvalidMint,
        constraint = depositor_stake_account.owner == depositor.key() @ FarmErrorCode::InvalidTokenOwner
    )]
    pub depositor_stake_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = depositor_reward_account.mint == farm_pool.reward_mint @ FarmErrorCode::InvalidMint,
        constraint = depositor_reward_account.owner == depositor.key() @ FarmErrorCode::InvalidTokenOwner
    )]
    pub depositor_reward_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = farm_pool.stake_vault @ FarmErrorCode::InvalidVault
    )]
    pub stake_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = farm_pool.reward_vault @ FarmErrorCode::InvalidVault
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}
