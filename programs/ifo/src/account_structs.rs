use crate::error::*;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use yield_farm::program::YieldFarm;
use yield_farm::state::FarmPool;

#[allow(deprecated)]
use anchor_lang::solana_program::bpf_loader_upgradeable::{self};

#[derive(Accounts)]
#[instruction(params: InitializeParams)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = signer,
        space = IfoPool::LEN,
        seeds = [IFO_POOL_SEED],
        bump
    )]
    pub ifo_pool: Account<'info, IfoPool>,

    /// CHECK: This is a PDA that acts as vault authority, validated by seeds constraint
    /// It owns the three vaults and the farm position, so only this program
    /// can move contributed LP, offering tokens or farm yield.
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    pub lp_mint: Account<'info, Mint>,
    pub offering_mint: Account<'info, Mint>,
    pub yield_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = signer,
        seeds = [LP_VAULT_SEED],
        bump,
        token::mint = lp_mint,
        token::authority = vault_authority,
    )]
    pub lp_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = signer,
        seeds = [OFFERING_VAULT_SEED],
        bump,
        token::mint = offering_mint,
        token::authority = vault_authority,
    )]
    pub offering_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = signer,
        seeds = [YIELD_VAULT_SEED],
        bump,
        token::mint = yield_mint,
        token::authority = vault_authority,
    )]
    pub yield_vault: Account<'info, TokenAccount>,

    pub farm_program: Program<'info, YieldFarm>,

    // The farm pool must stake the LP mint and pay out the yield mint
    #[account(
        constraint = farm_pool.pool_id == params.pool_id @ IfoErrorCode::InvalidFarmPool,
        constraint = farm_pool.stake_mint == lp_mint.key() @ IfoErrorCode::InvalidFarmPool,
        constraint = farm_pool.reward_mint == yield_mint.key() @ IfoErrorCode::InvalidFarmPool
    )]
    pub farm_pool: Account<'info, FarmPool>,

    #[account(mut)]
    pub signer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,

    /// CHECK: This is the program data account that contains the update authority
    #[account(
        constraint = program_data.key() == get_program_data_address(&crate::id()) @ IfoErrorCode::InvalidProgramData
    )]
    pub program_data: UncheckedAccount<'info>,
}

fn get_program_data_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id()).0
}

#[derive(Accounts)]
pub struct Approve<'info> {
    #[account(
        seeds = [IFO_POOL_SEED],
        bump = ifo_pool.bump
    )]
    pub ifo_pool: Account<'info, IfoPool>,

    /// CHECK: This is a PDA that acts as vault authority, validated by seeds constraint
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump = ifo_pool.vault_authority_bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        address = ifo_pool.lp_vault @ IfoErrorCode::InvalidVault
    )]
    pub lp_vault: Account<'info, TokenAccount>,

    /// CHECK: farm pool recorded at initialize
    #[account(address = ifo_pool.farm_pool @ IfoErrorCode::InvalidFarmPool)]
    pub farm_pool: UncheckedAccount<'info>,

    /// CHECK: the farm's authority PDA, derived under the farm program
    #[account(
        seeds = [b"farm_authority", farm_pool.key().as_ref()],
        seeds::program = ifo_pool.farm_program,
        bump
    )]
    pub farm_authority: UncheckedAccount<'info>,

    pub signer: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(
        mut,
        seeds = [IFO_POOL_SEED],
        bump = ifo_pool.bump
    )]
    pub ifo_pool: Account<'info, IfoPool>,

    #[account(
        init_if_needed,
        payer = signer,
        space = UserInfo::LEN,
        seeds = [USER_INFO_SEED, ifo_pool.key().as_ref(), signer.key().as_ref()],
        bump
    )]
    pub user_info: Account<'info, UserInfo>,

    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        mut,
        constraint = user_lp_account.mint == ifo_pool.lp_mint @ IfoErrorCode::InvalidMint,
        constraint = user_lp_account.owner == signer.key() @ IfoErrorCode::InvalidTokenOwner
    )]
    pub user_lp_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = ifo_pool.lp_vault @ IfoErrorCode::InvalidVault
    )]
    pub lp_vault: Account<'info, TokenAccount>,

    /// CHECK: This is a PDA that acts as vault authority, validated by seeds constraint
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump = ifo_pool.vault_authority_bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(address = ifo_pool.farm_program @ IfoErrorCode::InvalidFarmPool)]
    pub farm_program: Program<'info, YieldFarm>,

    /// CHECK: validated by the farm program
    #[account(
        mut,
        address = ifo_pool.farm_pool @ IfoErrorCode::InvalidFarmPool
    )]
    pub farm_pool: UncheckedAccount<'info>,

    /// CHECK: validated by the farm program
    pub farm_authority: UncheckedAccount<'info>,

    /// CHECK: position of the vault authority, created by the farm on first deposit
    #[account(mut)]
    pub farm_position: UncheckedAccount<'info>,

    /// CHECK: validated by the farm program
    #[account(mut)]
    pub farm_stake_vault: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct EndRound<'info> {
    #[account(
        mut,
        seeds = [IFO_POOL_SEED],
        bump = ifo_pool.bump
    )]
    pub ifo_pool: Account<'info, IfoPool>,

    pub signer: Signer<'info>,

    /// CHECK: This is a PDA that acts as vault authority, validated by seeds constraint
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump = ifo_pool.vault_authority_bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        address = ifo_pool.lp_vault @ IfoErrorCode::InvalidVault
    )]
    pub lp_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = ifo_pool.yield_vault @ IfoErrorCode::InvalidVault
    )]
    pub yield_vault: Account<'info, TokenAccount>,

    #[account(address = ifo_pool.farm_program @ IfoErrorCode::InvalidFarmPool)]
    pub farm_program: Program<'info, YieldFarm>,

    /// CHECK: validated by the farm program
    #[account(
        mut,
        address = ifo_pool.farm_pool @ IfoErrorCode::InvalidFarmPool
    )]
    pub farm_pool: UncheckedAccount<'info>,

    /// CHECK: validated by the farm program
    pub farm_authority: UncheckedAccount<'info>,

    /// CHECK: validated by the farm program
    #[account(mut)]
    pub farm_position: UncheckedAccount<'info>,

    /// CHECK: validated by the farm program
    #[account(mut)]
    pub farm_stake_vault: UncheckedAccount<'info>,

    /// CHECK: validated by the farm program
    #[account(mut)]
    pub farm_reward_vault: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct Harvest<'info> {
    #[account(
        seeds = [IFO_POOL_SEED],
        bump = ifo_pool.bump
    )]
    pub ifo_pool: Account<'info, IfoPool>,

    #[account(
        mut,
        seeds = [USER_INFO_SEED, ifo_pool.key().as_ref(), signer.key().as_ref()],
        bump = user_info.bump
    )]
    pub user_info: Account<'info, UserInfo>,

    pub signer: Signer<'info>,

    /// CHECK: This is a PDA that acts as vault authority, validated by seeds constraint
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump = ifo_pool.vault_authority_bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        address = ifo_pool.lp_vault @ IfoErrorCode::InvalidVault
    )]
    pub lp_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = ifo_pool.offering_vault @ IfoErrorCode::InvalidVault
    )]
    pub offering_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = ifo_pool.yield_vault @ IfoErrorCode::InvalidVault
    )]
    pub yield_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = user_lp_account.mint == ifo_pool.lp_mint @ IfoErrorCode::InvalidMint,
        constraint = user_lp_account.owner == signer.key() @ IfoErrorCode::InvalidTokenOwner
    )]
    pub user_lp_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = user_offering_account.mint == ifo_pool.offering_mint @ IfoErrorCode::InvalidMint,
        constraint = user_offering_account.owner == signer.key() @ IfoErrorCode::InvalidTokenOwner
    )]
    pub user_offering_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = user_yield_account.mint == ifo_pool.yield_mint @ IfoErrorCode::InvalidMint,
        constraint = user_yield_account.owner == signer.key() @ IfoErrorCode::InvalidTokenOwner
    )]
    pub user_yield_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

// Admin sweep of either the LP vault or the offering vault. The processor
// checks which vault it was handed.
#[derive(Accounts)]
pub struct FinalWithdraw<'info> {
    #[account(
        seeds = [IFO_POOL_SEED],
        bump = ifo_pool.bump
    )]
    pub ifo_pool: Account<'info, IfoPool>,

    pub signer: Signer<'info>,

    /// CHECK: This is a PDA that acts as vault authority, validated by seeds constraint
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump = ifo_pool.vault_authority_bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(mut)]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = admin_token_account.mint == vault.mint @ IfoErrorCode::InvalidMint,
        constraint = admin_token_account.owner == signer.key() @ IfoErrorCode::InvalidTokenOwner
    )]
    pub admin_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct PoolView<'info> {
    #[account(
        seeds = [IFO_POOL_SEED],
        bump = ifo_pool.bump
    )]
    pub ifo_pool: Account<'info, IfoPool>,
}

// user_info is omitted for addresses that never deposited
#[derive(Accounts)]
#[instruction(user: Pubkey)]
pub struct UserView<'info> {
    #[account(
        seeds = [IFO_POOL_SEED],
        bump = ifo_pool.bump
    )]
    pub ifo_pool: Account<'info, IfoPool>,

    #[account(
        seeds = [USER_INFO_SEED, ifo_pool.key().as_ref(), user.as_ref()],
        bump
    )]
    pub user_info: Option<Account<'info, UserInfo>>,
}

impl<'info> UserView<'info> {
    pub fn user_amount(&self) -> u64 {
        self.user_info.as_ref().map(|u| u.amount).unwrap_or(0)
    }

    pub fn has_harvest(&self) -> bool {
        self.user_info.as_ref().map(|u| u.claimed).unwrap_or(false)
    }
}
