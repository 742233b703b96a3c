#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub use self::token::{Token, TokenRef};

/// Plain ERC-20 ledger used as the flash loan currency.
#[ink::contract]
mod token {
    use ierc20::{Approval, Error, Result, Transfer, IERC20};
    use ink::storage::Mapping;

    #[ink(storage)]
    pub struct Token {
        total_supply: u128,
        balances: Mapping<AccountId, u128>,
        /// Keyed by `(owner, spender)`.
        allowances: Mapping<(AccountId, AccountId), u128>,
    }

    impl IERC20 for Token {
        #[ink(message)]
        fn total_supply(&self) -> u128 {
            self.total_supply
        }

        #[ink(message)]
        fn balance_of(&self, account: AccountId) -> u128 {
            self.balances.get(account).unwrap_or_default()
        }

        #[ink(message)]
        fn transfer(&mut self, to: AccountId, value: u128) -> Result<bool> {
            let from = self.env().caller();
            self.transfer_from_to(from, to, value)?;
            Ok(true)
        }

        #[ink(message)]
        fn allowance(&self, owner: AccountId, spender: AccountId) -> u128 {
            self.allowances.get((owner, spender)).unwrap_or_default()
        }

        #[ink(message)]
        fn approve(&mut self, spender: AccountId, value: u128) -> Result<bool> {
            if spender == zero_account() {
                return Err(Error::InvalidSpender { spender });
            }
            let owner = self.env().caller();
            self.allowances.insert((owner, spender), &value);
            self.env().emit_event(Approval {
                owner,
                spender,
                value,
            });
            Ok(true)
        }

        #[ink(message)]
        fn transfer_from(&mut self, from: AccountId, to: AccountId, value: u128) -> Result<bool> {
            let spender = self.env().caller();
            let allowance = self.allowance(from, spender);
            let remaining = allowance
                .checked_sub(value)
                .ok_or(Error::InsufficientAllowance {
                    spender,
                    allowance,
                    needed: value,
                })?;
            self.transfer_from_to(from, to, value)?;
            self.allowances.insert((from, spender), &remaining);
            Ok(true)
        }
    }

    impl Token {
        /// Creates a new [`Token`] and credits the whole `total_supply` to the deployer.
        #[ink(constructor)]
        pub fn new(total_supply: u128) -> Self {
            let caller = Self::env().caller();
            let mut balances = Mapping::default();
            balances.insert(caller, &total_supply);
            Self::env().emit_event(Transfer {
                from: None,
                to: Some(caller),
                value: total_supply,
            });
            Self {
                total_supply,
                balances,
                allowances: Mapping::default(),
            }
        }

        /// Moves `value` tokens between two accounts and emits a [`Transfer`].
        fn transfer_from_to(&mut self, from: AccountId, to: AccountId, value: u128) -> Result<()> {
            if to == zero_account() {
                return Err(Error::InvalidReceiver { receiver: to });
            }
            let balance = self.balance_of(from);
            let remaining = balance
                .checked_sub(value)
                .ok_or(Error::InsufficientBalance {
                    sender: from,
                    balance,
                    needed: value,
                })?;
            self.balances.insert(from, &remaining);
            let credited = self
                .balance_of(to)
                .checked_add(value)
                .ok_or(Error::Overflow)?;
            self.balances.insert(to, &credited);
            self.env().emit_event(Transfer {
                from: Some(from),
                to: Some(to),
                value,
            });
            Ok(())
        }
    }

    fn zero_account() -> AccountId {
        AccountId::from([0u8; 32])
    }

}
