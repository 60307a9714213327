use anchor_lang::prelude::*;

#[error_code]
pub enum FarmErrorCode {
    #[msg("Invalid amount")]
    InvalidAmount = 1,
    #[msg("Invalid mint provided")]
    InvalidMint = 2,
    #[msg("Invalid token owner")]
    InvalidTokenOwner = 3,
    #[msg("Invalid farm vault")]
    InvalidVault = 4,
    #[msg("Invalid position owner")]
    InvalidPositionOwner = 5,
    #[msg("Stake and reward mint cannot be the same")]
    StakeAndRewardCannotBeSame = 6,
    #[msg("Nothing staked in this position")]
    NothingStaked = 7,
    #[msg("Overflow")]
    Overflow = 8,
    #[msg("Division by zero error")]
    DivisionByZero = 9,
}
