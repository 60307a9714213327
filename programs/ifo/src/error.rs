use anchor_lang::prelude::*;

#[error_code]
pub enum IfoErrorCode {
    #[msg("Invalid amount")]
    InvalidAmount = 1,
    #[msg("not ifo time")]
    NotIfoTime = 2,
    #[msg("not harvest time")]
    NotHarvestTime = 3,
    #[msg("IFO not end")]
    IfoNotEnd = 4,
    #[msg("admin: wut?")]
    Unauthorized = 5,
    #[msg("nothing to harvest")]
    NothingToHarvest = 6,
    #[msg("Farming not end")]
    FarmingNotEnd = 7,
    #[msg("not after 2 days of IFO ended")]
    WithdrawTimeLocked = 8,
    #[msg("Farm staking already ended")]
    AlreadyEnded = 9,
    #[msg("Staking facility returned less than was staked")]
    ExternalFacility = 10,
    #[msg("have you participated?")]
    NotParticipant = 11,

    #[msg("Start slot must be before end slot")]
    InvalidRoundWindow = 12,
    #[msg("Offering and raising amounts must be greater than zero")]
    InvalidCap = 13,
    #[msg("LP, offering and yield mints must all differ")]
    MintsMustDiffer = 14,
    #[msg("Invalid mint provided")]
    InvalidMint = 15,
    #[msg("Invalid vault")]
    InvalidVault = 16,
    #[msg("Invalid farm pool")]
    InvalidFarmPool = 17,
    #[msg("Invalid token owner")]
    InvalidTokenOwner = 18,
    #[msg("Insufficient vault balance")]
    InsufficientVaultBalance = 19,
    #[msg("Overflow")]
    Overflow = 20,
    #[msg("Division by zero error")]
    DivisionByZero = 21,

    #[msg("ProgramData account did not match expected PDA.")]
    InvalidProgramData = 22,
    #[msg("Program has no upgrade authority (set to None).")]
    NoUpgradeAuthority = 23,
    #[msg("Signer is not the upgrade authority.")]
    InvalidUpgradeAuthority = 24,
}
