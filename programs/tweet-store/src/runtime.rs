//! Runtime capabilities used by the tweet processor, with adapters for the
//! Solana runtime. Tests plug in their own implementations.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::clock::Clock as ClockSysvar;
use anchor_lang::system_program::{self, Allocate, Assign, CreateAccount, Transfer};

use crate::error::ErrorCode;

/// Source of the creation timestamp.
pub trait Clock {
    fn unix_timestamp(&self) -> Result<i64>;
}

/// Answers whether an identity signed the current request.
pub trait Authorizer {
    fn has_signed(&self, identity: &Pubkey) -> bool;
}

/// Allocates a slot and stores its initial data in one step.
pub trait Allocator {
    /// True when nothing has been created at `slot` yet.
    fn is_vacant(&self, slot: &Pubkey) -> bool;

    /// Creates `slot` with exactly `data.len()` bytes and writes `data`.
    fn allocate(&mut self, slot: &Pubkey, data: &[u8]) -> Result<()>;
}

/// Reads the cluster clock sysvar.
pub struct SysvarClock;

impl Clock for SysvarClock {
    fn unix_timestamp(&self) -> Result<i64> {
        Ok(ClockSysvar::get()?.unix_timestamp)
    }
}

/// Signature flags of the accounts passed to the instruction.
pub struct SignerSet<'a, 'info> {
    accounts: &'a [AccountInfo<'info>],
}

impl<'a, 'info> SignerSet<'a, 'info> {
    pub fn new(accounts: &'a [AccountInfo<'info>]) -> Self {
        Self { accounts }
    }
}

impl Authorizer for SignerSet<'_, '_> {
    fn has_signed(&self, identity: &Pubkey) -> bool {
        self.accounts
            .iter()
            .any(|account| account.is_signer && account.key == identity)
    }
}

/// Creates the slot through the system program, funded by `payer` and owned
/// by this program. Handles slots that already hold lamports the same way
/// Anchor's `init` constraint does, including refusing the payer as the slot.
pub struct SystemAllocator<'a, 'info> {
    pub payer: &'a AccountInfo<'info>,
    pub slot: &'a AccountInfo<'info>,
    pub system_program: &'a AccountInfo<'info>,
    pub owner: &'a Pubkey,
}

impl<'info> SystemAllocator<'_, 'info> {
    fn cpi<T>(&self, accounts: T) -> CpiContext<'_, '_, '_, 'info, T>
    where
        T: ToAccountMetas + ToAccountInfos<'info>,
    {
        CpiContext::new(self.system_program.clone(), accounts)
    }
}

impl Allocator for SystemAllocator<'_, '_> {
    fn is_vacant(&self, slot: &Pubkey) -> bool {
        self.slot.key == slot
            && self.slot.key != self.payer.key
            && self.slot.owner == &System::id()
            && self.slot.data_is_empty()
    }

    fn allocate(&mut self, slot: &Pubkey, data: &[u8]) -> Result<()> {
        require_keys_eq!(*self.slot.key, *slot);
        require_keys_neq!(*self.slot.key, *self.payer.key, ErrorCode::AlreadyInitialized);

        let space = data.len() as u64;
        let rent = Rent::get()?.minimum_balance(data.len());
        let current = self.slot.lamports();

        if current == 0 {
            system_program::create_account(
                self.cpi(CreateAccount {
                    from: self.payer.clone(),
                    to: self.slot.clone(),
                }),
                rent,
                space,
                self.owner,
            )?;
        } else {
            let top_up = rent.saturating_sub(current);
            if top_up > 0 {
                system_program::transfer(
                    self.cpi(Transfer {
                        from: self.payer.clone(),
                        to: self.slot.clone(),
                    }),
                    top_up,
                )?;
            }
            system_program::allocate(
                self.cpi(Allocate {
                    account_to_allocate: self.slot.clone(),
                }),
                space,
            )?;
            system_program::assign(
                self.cpi(Assign {
                    account_to_assign: self.slot.clone(),
                }),
                self.owner,
            )?;
        }

        let mut account_data = self.slot.try_borrow_mut_data()?;
        account_data.copy_from_slice(data);
        Ok(())
    }
}
