use crate::error::IfoErrorCode;
use anchor_lang::prelude::*;
use num_traits::ToPrimitive;

/// Fixed-point scale for allocations: 1_000_000 == 100% of all contributions.
pub const PRECISION: u128 = 1_000_000;

// All divisions below truncate. The pool never pays out more offering tokens,
// refunds or yield than it holds; the remainders stay in the vaults.

fn to_u64(value: u128) -> Result<u64> {
    Ok(value.to_u64().ok_or(IfoErrorCode::Overflow)?)
}

/// Share of all contributions owned by `user_amount`, scaled by `PRECISION`.
pub fn user_allocation(user_amount: u64, total_amount: u64) -> Result<u64> {
    if total_amount == 0 {
        return Ok(0);
    }

    to_u64(
        (user_amount as u128)
            .checked_mul(PRECISION)
            .ok_or(IfoErrorCode::Overflow)?
            .checked_div(total_amount as u128)
            .ok_or(IfoErrorCode::DivisionByZero)?,
    )
}

/// Offering tokens owed for `user_amount`.
///
/// Over-subscribed sales split the whole offering by allocation. Otherwise
/// every contributed unit buys at the fixed `offering_total / raising_amount`
/// price and the unsold remainder stays with the pool.
pub fn offering_amount(
    user_amount: u64,
    total_amount: u64,
    raising_amount: u64,
    offering_total: u64,
) -> Result<u64> {
    if total_amount > raising_amount {
        let allocation = user_allocation(user_amount, total_amount)?;
        return to_u64(
            (offering_total as u128)
                .checked_mul(allocation as u128)
                .ok_or(IfoErrorCode::Overflow)?
                / PRECISION,
        );
    }

    to_u64(
        (user_amount as u128)
            .checked_mul(offering_total as u128)
            .ok_or(IfoErrorCode::Overflow)?
            .checked_div(raising_amount as u128)
            .ok_or(IfoErrorCode::DivisionByZero)?,
    )
}

/// Contribution returned to the user: only the part above their pro-rata
/// share of `raising_amount`, and only when the sale is over-subscribed.
pub fn refunding_amount(user_amount: u64, total_amount: u64, raising_amount: u64) -> Result<u64> {
    if total_amount <= raising_amount {
        return Ok(0);
    }

    let pay_amount = to_u64(
        (user_amount as u128)
            .checked_mul(raising_amount as u128)
            .ok_or(IfoErrorCode::Overflow)?
            .checked_div(total_amount as u128)
            .ok_or(IfoErrorCode::DivisionByZero)?,
    )?;

    Ok(user_amount
        .checked_sub(pay_amount)
        .ok_or(IfoErrorCode::Overflow)?)
}

/// Farm yield owed to an allocation out of the balance snapshotted at round end.
pub fn yield_share(allocation: u64, yield_snapshot: u64) -> Result<u64> {
    to_u64(
        (allocation as u128)
            .checked_mul(yield_snapshot as u128)
            .ok_or(IfoErrorCode::Overflow)?
            / PRECISION,
    )
}
