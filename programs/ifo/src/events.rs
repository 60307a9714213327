use anchor_lang::prelude::*;

#[event]
pub struct IfoInitialized {
    pub admin: Pubkey,
    pub lp_mint: Pubkey,
    pub offering_mint: Pubkey,
    pub yield_mint: Pubkey,
    pub start_slot: u64,
    pub end_slot: u64,
    pub offering_amount: u64,
    pub raising_amount: u64,
    pub farm_pool: Pubkey,
    pub pool_id: u64,
}

#[event]
pub struct ApproveEvent {
    pub admin: Pubkey,
    pub lp_vault: Pubkey,
    pub delegate: Pubkey,
    pub slot: u64,
}

#[event]
pub struct DepositEvent {
    pub user: Pubkey,
    pub deposit_amount: u64,
    pub user_amount: u64,
    pub total_amount: u64,
    pub address_count: u64,
    pub slot: u64,
}

#[event]
pub struct RoundEndedEvent {
    pub admin: Pubkey,
    pub total_amount: u64,
    pub lp_vault_balance: u64,
    pub yield_snapshot: u64,
    pub slot: u64,
}

#[event]
pub struct HarvestEvent {
    pub user: Pubkey,
    pub offering_amount: u64,
    pub refunding_amount: u64,
    pub yield_amount: u64,
    pub slot: u64,
}

#[event]
pub struct FinalWithdrawEvent {
    pub admin: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    pub vault_balance: u64,
    pub slot: u64,
}
