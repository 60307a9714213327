//! CPI proxy to the yield farm. Every call is signed by the vault authority
//! PDA, which owns the LP vault and the farm position.

use crate::account_structs::{Approve, Deposit, EndRound};
use crate::state::VAULT_AUTHORITY_SEED;
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Approve as TokenApprove};

/// Lets the farm authority pull LP out of the vault. Safe to repeat; a vault
/// that was never approved makes every farm deposit fail.
pub fn approve_farm(accounts: &Approve) -> Result<()> {
    let seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        &[accounts.ifo_pool.vault_authority_bump],
    ];
    let signer = &[&seeds[..]];

    token::approve(
        CpiContext::new_with_signer(
            accounts.token_program.to_account_info(),
            TokenApprove {
                to: accounts.lp_vault.to_account_info(),
                delegate: accounts.farm_authority.to_account_info(),
                authority: accounts.vault_authority.to_account_info(),
            },
            signer,
        ),
        u64::MAX,
    )
}

/// Stakes `amount` LP that was just moved into the vault.
pub fn deposit_for_pool(accounts: &Deposit, amount: u64) -> Result<()> {
    let seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        &[accounts.ifo_pool.vault_authority_bump],
    ];
    let signer = &[&seeds[..]];

    let cpi_accounts = yield_farm::cpi::accounts::DepositForPool {
        farm_pool: accounts.farm_pool.to_account_info(),
        farm_authority: accounts.farm_authority.to_account_info(),
        position: accounts.farm_position.to_account_info(),
        depositor: accounts.vault_authority.to_account_info(),
        depositor_token_account: accounts.lp_vault.to_account_info(),
        stake_vault: accounts.farm_stake_vault.to_account_info(),
        payer: accounts.signer.to_account_info(),
        token_program: accounts.token_program.to_account_info(),
        system_program: accounts.system_program.to_account_info(),
    };
    yield_farm::cpi::deposit_for_pool(
        CpiContext::new_with_signer(
            accounts.farm_program.to_account_info(),
            cpi_accounts,
            signer,
        ),
        accounts.ifo_pool.pool_id,
        amount,
    )
}

/// Pulls the whole position back into the LP vault and the accrued rewards
/// into the yield vault.
pub fn withdraw_all_and_claim(accounts: &EndRound) -> Result<()> {
    let seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        &[accounts.ifo_pool.vault_authority_bump],
    ];
    let signer = &[&seeds[..]];

    let cpi_accounts = yield_farm::cpi::accounts::WithdrawAllAndClaim {
        farm_pool: accounts.farm_pool.to_account_info(),
        farm_authority: accounts.farm_authority.to_account_info(),
        position: accounts.farm_position.to_account_info(),
        depositor: accounts.vault_authority.to_account_info(),
        depositor_stake_account: accounts.lp_vault.to_account_info(),
        depositor_reward_account: accounts.yield_vault.to_account_info(),
        stake_vault: accounts.farm_stake_vault.to_account_info(),
        reward_vault: accounts.farm_reward_vault.to_account_info(),
        token_program: accounts.token_program.to_account_info(),
    };
    yield_farm::cpi::withdraw_all_and_claim(
        CpiContext::new_with_signer(
            accounts.farm_program.to_account_info(),
            cpi_accounts,
            signer,
        ),
        accounts.ifo_pool.pool_id,
    )
}
