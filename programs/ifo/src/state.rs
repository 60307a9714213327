use crate::allocation::{offering_amount, refunding_amount, user_allocation, yield_share};
use crate::error::IfoErrorCode;
use anchor_lang::prelude::*;

pub const FINAL_WITHDRAW_DELAY_SLOTS: u64 = 432_000; // 2 days of 400ms slots

pub const IFO_POOL_SEED: &[u8] = b"ifo_pool";
pub const USER_INFO_SEED: &[u8] = b"user_info";
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";
pub const LP_VAULT_SEED: &[u8] = b"lp_vault";
pub const OFFERING_VAULT_SEED: &[u8] = b"offering_vault";
pub const YIELD_VAULT_SEED: &[u8] = b"yield_vault";

/// Round configuration and global ledger. Everything up to `pool_id` is fixed
/// at `initialize`.
#[account]
pub struct IfoPool {
    pub admin: Pubkey,
    pub lp_mint: Pubkey,
    pub offering_mint: Pubkey,
    pub yield_mint: Pubkey,
    pub lp_vault: Pubkey,
    pub offering_vault: Pubkey,
    pub yield_vault: Pubkey,
    pub start_slot: u64,
    pub end_slot: u64,
    pub offering_amount: u64, // offering tokens for sale
    pub raising_amount: u64,  // LP the sale aims to raise
    pub farm_program: Pubkey,
    pub farm_pool: Pubkey,
    pub pool_id: u64,

    pub total_amount: u64,   // sum of every UserInfo.amount
    pub address_count: u64,  // participants, also the next UserInfo.index
    pub farm_ended: bool,
    pub yield_snapshot: u64, // yield vault balance right after the farm withdrawal
    pub ended_at_slot: u64,
    pub bump: u8,
    pub vault_authority_bump: u8,
}

impl IfoPool {
    pub const LEN: usize = 8 +  // discriminator
        32 * 7 +    // admin, mints, vaults
        8 +         // start_slot
        8 +         // end_slot
        8 +         // offering_amount
        8 +         // raising_amount
        32 +        // farm_program
        32 +        // farm_pool
        8 +         // pool_id
        8 +         // total_amount
        8 +         // address_count
        1 +         // farm_ended
        8 +         // yield_snapshot
        8 +         // ended_at_slot
        1 +         // bump
        1;          // vault_authority_bump

    pub fn require_admin(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(*signer, self.admin, IfoErrorCode::Unauthorized);
        Ok(())
    }

    pub fn check_deposit_window(&self, slot: u64) -> Result<()> {
        require!(
            slot >= self.start_slot && slot < self.end_slot,
            IfoErrorCode::NotIfoTime
        );
        Ok(())
    }

    /// Books `amount` for `owner`. Returns true when this is the user's first
    /// contribution, in which case they are appended to the registry.
    pub fn record_deposit(
        &mut self,
        user: &mut UserInfo,
        owner: Pubkey,
        amount: u64,
        slot: u64,
    ) -> Result<bool> {
        require!(amount > 0, IfoErrorCode::InvalidAmount);
        self.check_deposit_window(slot)?;

        let user_amount = user
            .amount
            .checked_add(amount)
            .ok_or(IfoErrorCode::InvalidAmount)?;
        let total_amount = self
            .total_amount
            .checked_add(amount)
            .ok_or(IfoErrorCode::InvalidAmount)?;

        let first_deposit = user.amount == 0;
        if first_deposit {
            let address_count = self
                .address_count
                .checked_add(1)
                .ok_or(IfoErrorCode::Overflow)?;
            user.owner = owner;
            user.index = self.address_count;
            self.address_count = address_count;
        }

        user.amount = user_amount;
        self.total_amount = total_amount;
        Ok(first_deposit)
    }

    pub fn check_end_round(&self, slot: u64) -> Result<()> {
        require!(slot >= self.end_slot, IfoErrorCode::IfoNotEnd);
        require!(!self.farm_ended, IfoErrorCode::AlreadyEnded);
        Ok(())
    }

    /// Closes the farming leg once the facility has paid everything back.
    /// `lp_balance` and `yield_balance` are the vault balances read after the
    /// withdrawal; the yield balance is frozen as the harvest snapshot.
    pub fn record_round_end(&mut self, lp_balance: u64, yield_balance: u64, slot: u64) -> Result<()> {
        self.check_end_round(slot)?;
        require!(
            lp_balance >= self.total_amount,
            IfoErrorCode::ExternalFacility
        );

        self.farm_ended = true;
        self.yield_snapshot = yield_balance;
        self.ended_at_slot = slot;
        Ok(())
    }

    pub fn user_allocation(&self, user_amount: u64) -> Result<u64> {
        user_allocation(user_amount, self.total_amount)
    }

    pub fn user_offering_amount(&self, user_amount: u64) -> Result<u64> {
        offering_amount(
            user_amount,
            self.total_amount,
            self.raising_amount,
            self.offering_amount,
        )
    }

    pub fn user_refunding_amount(&self, user_amount: u64) -> Result<u64> {
        refunding_amount(user_amount, self.total_amount, self.raising_amount)
    }

    /// Validates a harvest and computes the payout. Does not touch `user`;
    /// the caller flips the flag with `UserInfo::mark_harvested` once the
    /// transfers are issued.
    pub fn settle_harvest(&self, user: &UserInfo, slot: u64) -> Result<HarvestSettlement> {
        require!(slot >= self.end_slot, IfoErrorCode::NotHarvestTime);
        require!(self.farm_ended, IfoErrorCode::FarmingNotEnd);
        require!(user.amount > 0, IfoErrorCode::NotParticipant);
        require!(!user.claimed, IfoErrorCode::NothingToHarvest);

        let allocation = self.user_allocation(user.amount)?;
        Ok(HarvestSettlement {
            offering_amount: self.user_offering_amount(user.amount)?,
            refunding_amount: self.user_refunding_amount(user.amount)?,
            yield_amount: yield_share(allocation, self.yield_snapshot)?,
        })
    }

    pub fn check_final_withdraw_lp(&self, signer: &Pubkey, slot: u64) -> Result<()> {
        self.require_admin(signer)?;
        require!(slot >= self.end_slot, IfoErrorCode::IfoNotEnd);
        Ok(())
    }

    pub fn check_final_withdraw_offering(&self, signer: &Pubkey, slot: u64) -> Result<()> {
        self.check_final_withdraw_lp(signer, slot)?;
        let unlock_slot = self
            .end_slot
            .checked_add(FINAL_WITHDRAW_DELAY_SLOTS)
            .ok_or(IfoErrorCode::Overflow)?;
        require!(slot >= unlock_slot, IfoErrorCode::WithdrawTimeLocked);
        Ok(())
    }

    /// Checks an admin sweep of `amount` out of `vault`, which must be the
    /// pool's vault for `which` and hold at least `amount`.
    pub fn check_sweep(
        &self,
        which: SweepVault,
        vault: &Pubkey,
        vault_balance: u64,
        amount: u64,
    ) -> Result<()> {
        let expected = match which {
            SweepVault::Lp => self.lp_vault,
            SweepVault::Offering => self.offering_vault,
        };
        require_keys_eq!(*vault, expected, IfoErrorCode::InvalidVault);
        require!(amount > 0, IfoErrorCode::InvalidAmount);
        require!(
            vault_balance >= amount,
            IfoErrorCode::InsufficientVaultBalance
        );
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepVault {
    Lp,
    Offering,
}

#[account]
pub struct UserInfo {
    pub owner: Pubkey,
    pub amount: u64,  // LP contributed
    pub claimed: bool,
    pub index: u64,   // position in the participant registry
    pub bump: u8,
}

impl UserInfo {
    pub const LEN: usize = 8 + 32 + 8 + 1 + 8 + 1;

    pub fn mark_harvested(&mut self) -> Result<()> {
        require!(!self.claimed, IfoErrorCode::NothingToHarvest);
        self.claimed = true;
        Ok(())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitializeParams {
    pub admin: Pubkey,
    pub start_slot: u64,
    pub end_slot: u64,
    pub offering_amount: u64,
    pub raising_amount: u64,
    pub pool_id: u64,
}

impl InitializeParams {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.start_slot < self.end_slot,
            IfoErrorCode::InvalidRoundWindow
        );
        require!(
            self.offering_amount > 0 && self.raising_amount > 0,
            IfoErrorCode::InvalidCap
        );
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HarvestSettlement {
    pub offering_amount: u64,
    pub refunding_amount: u64,
    pub yield_amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const START: u64 = 100;
    const END: u64 = 150;

    fn pool(raising_amount: u64, offering_amount: u64) -> IfoPool {
        IfoPool {
            admin: Pubkey::new_unique(),
            lp_mint: Pubkey::new_unique(),
            offering_mint: Pubkey::new_unique(),
            yield_mint: Pubkey::new_unique(),
            lp_vault: Pubkey::new_unique(),
            offering_vault: Pubkey::new_unique(),
            yield_vault: Pubkey::new_unique(),
            start_slot: START,
            end_slot: END,
            offering_amount,
            raising_amount,
            farm_program: Pubkey::new_unique(),
            farm_pool: Pubkey::new_unique(),
            pool_id: 1,
            total_amount: 0,
            address_count: 0,
            farm_ended: false,
            yield_snapshot: 0,
            ended_at_slot: 0,
            bump: 255,
            vault_authority_bump: 254,
        }
    }

    fn empty_user() -> UserInfo {
        UserInfo {
            owner: Pubkey::default(),
            amount: 0,
            claimed: false,
            index: 0,
            bump: 255,
        }
    }

    struct Sale {
        pool: IfoPool,
        users: BTreeMap<Pubkey, UserInfo>,
    }

    impl Sale {
        fn new(raising_amount: u64, offering_amount: u64) -> Self {
            Sale {
                pool: pool(raising_amount, offering_amount),
                users: BTreeMap::new(),
            }
        }

        fn deposit(&mut self, who: Pubkey, amount: u64, slot: u64) -> Result<bool> {
            let user = self.users.entry(who).or_insert_with(empty_user);
            self.pool.record_deposit(user, who, amount, slot)
        }

        fn user(&self, who: &Pubkey) -> &UserInfo {
            &self.users[who]
        }

        fn ledger_sum(&self) -> u64 {
            self.users.values().map(|u| u.amount).sum()
        }
    }

    fn error_is<T>(result: Result<T>, code: IfoErrorCode) -> bool {
        match result {
            Err(Error::AnchorError(e)) => e.error_code_number == u32::from(code),
            _ => false,
        }
    }

    #[test]
    fn test_deposit_outside_window_fails_without_mutation() {
        let mut sale = Sale::new(10, 100);
        let bob = Pubkey::new_unique();

        for slot in [0, START - 1, END, END + 1] {
            assert!(error_is(sale.deposit(bob, 1, slot), IfoErrorCode::NotIfoTime));
        }
        assert_eq!(sale.pool.total_amount, 0);
        assert_eq!(sale.pool.address_count, 0);
        assert_eq!(sale.user(&bob).amount, 0);

        assert!(sale.deposit(bob, 1, START).unwrap());
        assert!(!sale.deposit(bob, 1, END - 1).unwrap());
        assert_eq!(sale.pool.total_amount, 2);
    }

    #[test]
    fn test_zero_and_overflowing_deposits_rejected() {
        let mut sale = Sale::new(10, 100);
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();

        assert!(error_is(sale.deposit(alice, 0, START), IfoErrorCode::InvalidAmount));
        sale.deposit(alice, u64::MAX, START).unwrap();
        assert!(error_is(sale.deposit(bob, 1, START), IfoErrorCode::InvalidAmount));
        assert_eq!(sale.pool.total_amount, u64::MAX);
        assert_eq!(sale.pool.address_count, 1);
        assert_eq!(sale.user(&bob).amount, 0);
    }

    #[test]
    fn test_total_matches_ledger_and_registry_keeps_order() {
        let mut sale = Sale::new(10, 100);
        let bob = Pubkey::new_unique();
        let alice = Pubkey::new_unique();
        let carol = Pubkey::new_unique();

        for _ in 0..3 {
            sale.deposit(bob, 1, START).unwrap();
            sale.deposit(alice, 2, START + 1).unwrap();
            sale.deposit(carol, 3, START + 2).unwrap();
            assert_eq!(sale.pool.total_amount, sale.ledger_sum());
        }

        assert_eq!(sale.pool.total_amount, 18);
        assert_eq!(sale.pool.address_count, 3);
        assert_eq!(sale.user(&bob).index, 0);
        assert_eq!(sale.user(&alice).index, 1);
        assert_eq!(sale.user(&carol).index, 2);
        assert_eq!(sale.user(&carol).owner, carol);
    }

    #[test]
    fn test_end_round_once_after_end() {
        let mut sale = Sale::new(10, 100);
        sale.deposit(Pubkey::new_unique(), 6, START).unwrap();

        assert!(error_is(sale.pool.record_round_end(6, 40, END - 1), IfoErrorCode::IfoNotEnd));
        assert!(!sale.pool.farm_ended);

        sale.pool.record_round_end(6, 40, END).unwrap();
        assert!(sale.pool.farm_ended);
        assert_eq!(sale.pool.yield_snapshot, 40);
        assert_eq!(sale.pool.ended_at_slot, END);

        assert!(error_is(sale.pool.record_round_end(6, 80, END + 1), IfoErrorCode::AlreadyEnded));
        assert_eq!(sale.pool.yield_snapshot, 40);
    }

    #[test]
    fn test_end_round_rejects_short_lp_return() {
        let mut sale = Sale::new(10, 100);
        sale.deposit(Pubkey::new_unique(), 6, START).unwrap();

        assert!(error_is(sale.pool.record_round_end(5, 40, END), IfoErrorCode::ExternalFacility));
        assert!(!sale.pool.farm_ended);
        assert_eq!(sale.pool.yield_snapshot, 0);
    }

    #[test]
    fn test_harvest_gates() {
        let mut sale = Sale::new(10, 100);
        let carol = Pubkey::new_unique();
        sale.deposit(carol, 3, START).unwrap();

        let stranger = empty_user();
        assert!(error_is(
            sale.pool.settle_harvest(sale.user(&carol), END - 1),
            IfoErrorCode::NotHarvestTime
        ));
        assert!(error_is(
            sale.pool.settle_harvest(sale.user(&carol), END + 1),
            IfoErrorCode::FarmingNotEnd
        ));

        sale.pool.record_round_end(3, 10, END + 1).unwrap();
        assert!(error_is(
            sale.pool.settle_harvest(&stranger, END + 1),
            IfoErrorCode::NotParticipant
        ));
        assert!(sale.pool.settle_harvest(sale.user(&carol), END + 1).is_ok());
    }

    #[test]
    fn test_harvest_only_once() {
        let mut sale = Sale::new(10, 100);
        let carol = Pubkey::new_unique();
        sale.deposit(carol, 3, START).unwrap();
        sale.pool.record_round_end(3, 10, END).unwrap();

        let settlement = sale.pool.settle_harvest(sale.user(&carol), END).unwrap();
        assert_eq!(settlement.offering_amount, 30);
        assert_eq!(settlement.yield_amount, 10);

        let user = sale.users.get_mut(&carol).unwrap();
        user.mark_harvested().unwrap();
        assert!(error_is(user.mark_harvested(), IfoErrorCode::NothingToHarvest));
        assert!(error_is(
            sale.pool.settle_harvest(sale.user(&carol), END),
            IfoErrorCode::NothingToHarvest
        ));
    }

    #[test]
    fn test_over_subscribed_settlement() {
        // 10 LP raising, 100 offered, 18 LP deposited
        let mut sale = Sale::new(10, 100);
        let bob = Pubkey::new_unique();
        let alice = Pubkey::new_unique();
        let carol = Pubkey::new_unique();
        for _ in 0..3 {
            sale.deposit(bob, 1, START).unwrap();
            sale.deposit(alice, 2, START).unwrap();
            sale.deposit(carol, 3, START).unwrap();
        }
        sale.pool.record_round_end(18, 1_000, END).unwrap();

        let carol_share = sale.pool.settle_harvest(sale.user(&carol), END).unwrap();
        assert_eq!(
            carol_share,
            HarvestSettlement {
                offering_amount: 50,
                refunding_amount: 4,
                yield_amount: 500,
            }
        );
        let bob_share = sale.pool.settle_harvest(sale.user(&bob), END).unwrap();
        assert_eq!(bob_share.offering_amount, 16);
        assert_eq!(bob_share.refunding_amount, 2);
        assert_eq!(bob_share.yield_amount, 166);

        let alice_share = sale.pool.settle_harvest(sale.user(&alice), END).unwrap();
        let yield_paid =
            carol_share.yield_amount + bob_share.yield_amount + alice_share.yield_amount;
        assert!(yield_paid <= sale.pool.yield_snapshot);

        let lp_out = [carol_share, bob_share, alice_share]
            .iter()
            .map(|s| s.refunding_amount)
            .sum::<u64>();
        assert!(lp_out <= sale.pool.total_amount);
    }

    #[test]
    fn test_exactly_subscribed_settlement() {
        let mut sale = Sale::new(18, 18);
        let bob = Pubkey::new_unique();
        let carol = Pubkey::new_unique();
        sale.deposit(bob, 3, START).unwrap();
        sale.deposit(carol, 9, START).unwrap();
        sale.deposit(Pubkey::new_unique(), 6, START).unwrap();
        sale.pool.record_round_end(18, 0, END).unwrap();

        let carol_share = sale.pool.settle_harvest(sale.user(&carol), END).unwrap();
        assert_eq!(carol_share.offering_amount, 9);
        assert_eq!(carol_share.refunding_amount, 0);
        assert_eq!(carol_share.yield_amount, 0);
        assert_eq!(sale.pool.user_offering_amount(sale.user(&bob).amount).unwrap(), 3);
        assert_eq!(sale.pool.user_offering_amount(0).unwrap(), 0);
    }

    #[test]
    fn test_final_withdraw_gates() {
        let sale = Sale::new(10, 100);
        let admin = sale.pool.admin;
        let bob = Pubkey::new_unique();
        let unlock = END + FINAL_WITHDRAW_DELAY_SLOTS;

        assert!(error_is(sale.pool.check_final_withdraw_lp(&bob, END), IfoErrorCode::Unauthorized));
        assert!(error_is(sale.pool.check_final_withdraw_lp(&admin, END - 1), IfoErrorCode::IfoNotEnd));
        assert!(sale.pool.check_final_withdraw_lp(&admin, END).is_ok());

        assert!(error_is(
            sale.pool.check_final_withdraw_offering(&bob, unlock),
            IfoErrorCode::Unauthorized
        ));
        assert!(error_is(
            sale.pool.check_final_withdraw_offering(&admin, END - 1),
            IfoErrorCode::IfoNotEnd
        ));
        assert!(error_is(
            sale.pool.check_final_withdraw_offering(&admin, END),
            IfoErrorCode::WithdrawTimeLocked
        ));
        assert!(error_is(
            sale.pool.check_final_withdraw_offering(&admin, unlock - 1),
            IfoErrorCode::WithdrawTimeLocked
        ));
        assert!(sale.pool.check_final_withdraw_offering(&admin, unlock).is_ok());
    }

    #[test]
    fn test_sweep_checks_vault_amount_and_balance() {
        let sale = Sale::new(10, 100);
        let lp_vault = sale.pool.lp_vault;
        let offering_vault = sale.pool.offering_vault;

        assert!(sale.pool.check_sweep(SweepVault::Lp, &lp_vault, 5, 5).is_ok());
        assert!(sale.pool.check_sweep(SweepVault::Offering, &offering_vault, 100, 1).is_ok());

        assert!(error_is(
            sale.pool.check_sweep(SweepVault::Lp, &offering_vault, 5, 5),
            IfoErrorCode::InvalidVault
        ));
        assert!(error_is(
            sale.pool.check_sweep(SweepVault::Offering, &lp_vault, 5, 5),
            IfoErrorCode::InvalidVault
        ));
        assert!(error_is(
            sale.pool.check_sweep(SweepVault::Offering, &sale.pool.yield_vault, 5, 5),
            IfoErrorCode::InvalidVault
        ));
        assert!(error_is(
            sale.pool.check_sweep(SweepVault::Lp, &lp_vault, 5, 0),
            IfoErrorCode::InvalidAmount
        ));
        assert!(error_is(
            sale.pool.check_sweep(SweepVault::Lp, &lp_vault, 5, 6),
            IfoErrorCode::InsufficientVaultBalance
        ));
        assert!(error_is(
            sale.pool.check_sweep(SweepVault::Offering, &offering_vault, 0, 1),
            IfoErrorCode::InsufficientVaultBalance
        ));
    }

    #[test]
    fn test_end_round_with_no_participants() {
        let mut sale = Sale::new(10, 100);
        assert_eq!(sale.pool.total_amount, 0);

        sale.pool.record_round_end(0, 7, END).unwrap();
        assert!(sale.pool.farm_ended);
        assert_eq!(sale.pool.yield_snapshot, 7);
        assert_eq!(sale.pool.ended_at_slot, END);

        assert!(error_is(
            sale.pool.settle_harvest(&empty_user(), END),
            IfoErrorCode::NotParticipant
        ));
        assert_eq!(sale.pool.user_offering_amount(0).unwrap(), 0);
        assert_eq!(sale.pool.user_refunding_amount(0).unwrap(), 0);
    }

    #[test]
    fn test_initialize_params_validation() {
        let params = InitializeParams {
            admin: Pubkey::new_unique(),
            start_slot: 20,
            end_slot: 30,
            offering_amount: 100,
            raising_amount: 10,
            pool_id: 1,
        };
        assert!(params.validate().is_ok());

        let same_slot = InitializeParams { end_slot: 20, ..params.clone() };
        assert!(error_is(same_slot.validate(), IfoErrorCode::InvalidRoundWindow));

        let no_offering = InitializeParams { offering_amount: 0, ..params.clone() };
        assert!(error_is(no_offering.validate(), IfoErrorCode::InvalidCap));

        let no_raising = InitializeParams { raising_amount: 0, ..params };
        assert!(error_is(no_raising.validate(), IfoErrorCode::InvalidCap));
    }
}
