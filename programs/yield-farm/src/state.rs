use crate::error::FarmErrorCode;
use anchor_lang::prelude::*;
use num_traits::ToPrimitive;

pub const ACC_REWARD_PRECISION: u128 = 1_000_000_000_000; // 1e12 scale for reward per share

#[account]
pub struct FarmPool {
    pub admin: Pubkey,
    pub pool_id: u64,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub stake_vault: Pubkey,
    pub reward_vault: Pubkey,
    pub reward_per_slot: u64,
    pub acc_reward_per_share: u128,
    pub last_reward_slot: u64,
    pub total_staked: u64,
    pub bump: u8,
    pub authority_bump: u8,
}

impl FarmPool {
    pub const LEN: usize = 8 +  // discriminator
        32 +    // admin
        8 +     // pool_id
        32 +    // stake_mint
        32 +    // reward_mint
        32 +    // stake_vault
        32 +    // reward_vault
        8 +     // reward_per_slot
        16 +    // acc_reward_per_share
        8 +     // last_reward_slot
        8 +     // total_staked
        1 +     // bump
        1;      // authority_bump

    /// Rolls `acc_reward_per_share` forward to `slot`. Slots with nothing
    /// staked earn nothing.
    pub fn update(&mut self, slot: u64) -> Result<()> {
        if slot <= self.last_reward_slot {
            return Ok(());
        }
        if self.total_staked == 0 {
            self.last_reward_slot = slot;
            return Ok(());
        }

        let elapsed = slot - self.last_reward_slot;
        let reward = (elapsed as u128)
            .checked_mul(self.reward_per_slot as u128)
            .ok_or(FarmErrorCode::Overflow)?;
        let increment = reward
            .checked_mul(ACC_REWARD_PRECISION)
            .ok_or(FarmErrorCode::Overflow)?
            .checked_div(self.total_staked as u128)
            .ok_or(FarmErrorCode::DivisionByZero)?;

        self.acc_reward_per_share = self
            .acc_reward_per_share
            .checked_add(increment)
            .ok_or(FarmErrorCode::Overflow)?;
        self.last_reward_slot = slot;
        Ok(())
    }

    fn accrued(&self, amount: u64) -> Result<u128> {
        Ok((amount as u128)
            .checked_mul(self.acc_reward_per_share)
            .ok_or(FarmErrorCode::Overflow)?
            / ACC_REWARD_PRECISION)
    }

    fn settle_pending(&self, position: &mut FarmPosition) -> Result<()> {
        let accrued = self.accrued(position.amount)?;
        let owed = accrued
            .checked_sub(position.reward_debt)
            .ok_or(FarmErrorCode::Overflow)?
            .to_u64()
            .ok_or(FarmErrorCode::Overflow)?;
        position.pending_rewards = position
            .pending_rewards
            .checked_add(owed)
            .ok_or(FarmErrorCode::Overflow)?;
        Ok(())
    }

    pub fn stake(&mut self, position: &mut FarmPosition, amount: u64, slot: u64) -> Result<()> {
        require!(amount > 0, FarmErrorCode::InvalidAmount);
        self.update(slot)?;
        self.settle_pending(position)?;

        position.amount = position
            .amount
            .checked_add(amount)
            .ok_or(FarmErrorCode::Overflow)?;
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(FarmErrorCode::Overflow)?;
        position.reward_debt = self.accrued(position.amount)?;
        Ok(())
    }

    /// Closes out the whole position. Returns `(staked, reward)` where the
    /// reward is capped at `reward_available`; any shortfall stays in
    /// `pending_rewards` and can be claimed by calling this again once the
    /// reward vault is topped up.
    pub fn unstake_all(
        &mut self,
        position: &mut FarmPosition,
        slot: u64,
        reward_available: u64,
    ) -> Result<(u64, u64)> {
        require!(
            position.amount > 0 || position.pending_rewards > 0,
            FarmErrorCode::NothingStaked
        );
        self.update(slot)?;
        self.settle_pending(position)?;

        let staked = position.amount;
        let reward = position.pending_rewards.min(reward_available);

        self.total_staked = self
            .total_staked
            .checked_sub(staked)
            .ok_or(FarmErrorCode::Overflow)?;
        position.amount = 0;
        position.reward_debt = 0;
        position.pending_rewards -= reward;

        Ok((staked, reward))
    }
}

#[account]
pub struct FarmPosition {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub reward_debt: u128,
    pub pending_rewards: u64,
    pub bump: u8,
}

impl FarmPosition {
    pub const LEN: usize = 8 + 32 + 32 + 8 + 16 + 8 + 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(reward_per_slot: u64) -> FarmPool {
        FarmPool {
            admin: Pubkey::new_unique(),
            pool_id: 1,
            stake_mint: Pubkey::new_unique(),
            reward_mint: Pubkey::new_unique(),
            stake_vault: Pubkey::new_unique(),
            reward_vault: Pubkey::new_unique(),
            reward_per_slot,
            acc_reward_per_share: 0,
            last_reward_slot: 0,
            total_staked: 0,
            bump: 255,
            authority_bump: 254,
        }
    }

    fn position() -> FarmPosition {
        FarmPosition {
            pool: Pubkey::new_unique(),
            owner: Pubkey::new_unique(),
            amount: 0,
            reward_debt: 0,
            pending_rewards: 0,
            bump: 255,
        }
    }

    #[test]
    fn test_single_staker_earns_every_slot() {
        let mut farm = pool(10);
        let mut pos = position();
        farm.stake(&mut pos, 5, 20).unwrap();
        farm.stake(&mut pos, 15, 25).unwrap();
        assert_eq!(pos.pending_rewards, 50);

        let (staked, reward) = farm.unstake_all(&mut pos, 30, u64::MAX).unwrap();
        assert_eq!(staked, 20);
        assert_eq!(reward, 100);
        assert_eq!(farm.total_staked, 0);
        assert_eq!(pos.amount, 0);
    }

    #[test]
    fn test_idle_slots_do_not_accrue() {
        let mut farm = pool(10);
        farm.update(100).unwrap();
        assert_eq!(farm.acc_reward_per_share, 0);
        assert_eq!(farm.last_reward_slot, 100);

        let mut pos = position();
        farm.stake(&mut pos, 1, 100).unwrap();
        let (_, reward) = farm.unstake_all(&mut pos, 101, u64::MAX).unwrap();
        assert_eq!(reward, 10);
    }

    #[test]
    fn test_two_stakers_split_by_share() {
        let mut farm = pool(100);
        let mut alice = position();
        let mut bob = position();
        farm.stake(&mut alice, 1, 0).unwrap();
        farm.stake(&mut bob, 3, 0).unwrap();

        let (_, a) = farm.unstake_all(&mut alice, 10, u64::MAX).unwrap();
        assert_eq!(a, 250);
        let (_, b) = farm.unstake_all(&mut bob, 10, u64::MAX).unwrap();
        assert_eq!(b, 750);
    }

    #[test]
    fn test_reward_capped_by_vault_balance() {
        let mut farm = pool(10);
        let mut pos = position();
        farm.stake(&mut pos, 5, 0).unwrap();
        let (staked, reward) = farm.unstake_all(&mut pos, 10, 40).unwrap();
        assert_eq!(staked, 5);
        assert_eq!(reward, 40);
        assert_eq!(pos.pending_rewards, 60);
    }

    #[test]
    fn test_reward_shortfall_claimable_after_top_up() {
        let mut farm = pool(10);
        let mut pos = position();
        farm.stake(&mut pos, 5, 0).unwrap();
        farm.unstake_all(&mut pos, 10, 40).unwrap();

        let (staked, reward) = farm.unstake_all(&mut pos, 20, 100).unwrap();
        assert_eq!(staked, 0);
        assert_eq!(reward, 60);
        assert_eq!(pos.pending_rewards, 0);
        assert_eq!(farm.total_staked, 0);

        assert!(farm.unstake_all(&mut pos, 30, 100).is_err());
    }

    #[test]
    fn test_unstake_empty_position_fails() {
        let mut farm = pool(10);
        let mut pos = position();
        assert!(farm.unstake_all(&mut pos, 10, 0).is_err());
        assert!(farm.stake(&mut pos, 0, 10).is_err());
    }
}
