use crate::error::IfoErrorCode;
use anchor_lang::prelude::*;

#[allow(deprecated)]
use anchor_lang::solana_program::bpf_loader_upgradeable::UpgradeableLoaderState;

/// Only the program's upgrade authority may pass. `program_data` must already
/// be pinned to this program's ProgramData address by the accounts context.
pub fn validate_program_update_authority(
    program_data: &AccountInfo,
    signer: &Signer,
) -> Result<()> {
    let data = program_data.try_borrow_data()?;
    let state: UpgradeableLoaderState =
        bincode::deserialize(&data).map_err(|_| IfoErrorCode::InvalidProgramData)?;

    check_upgrade_authority(&state, &signer.key())
}

fn check_upgrade_authority(state: &UpgradeableLoaderState, signer: &Pubkey) -> Result<()> {
    match state {
        UpgradeableLoaderState::ProgramData {
            upgrade_authority_address,
            ..
        } => {
            let authority = (*upgrade_authority_address).ok_or(IfoErrorCode::NoUpgradeAuthority)?;
            require_keys_eq!(authority, *signer, IfoErrorCode::InvalidUpgradeAuthority);
            Ok(())
        }
        _ => err!(IfoErrorCode::InvalidProgramData),
    }
}
