use anchor_lang::prelude::*;

#[event]
pub struct FarmPoolInitialized {
    pub admin: Pubkey,
    pub pool_id: u64,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub reward_per_slot: u64,
}

#[event]
pub struct FarmDeposited {
    pub pool_id: u64,
    pub depositor: Pubkey,
    pub amount: u64,
    pub position_amount: u64,
    pub total_staked: u64,
    pub slot: u64,
}

#[event]
pub struct FarmWithdrawn {
    pub pool_id: u64,
    pub depositor: Pubkey,
    pub staked_amount: u64,
    pub reward_amount: u64,
    pub total_staked: u64,
    pub slot: u64,
}
