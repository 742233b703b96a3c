#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub use self::flash_lender::{FlashLender, FlashLenderRef};

#[ink::contract]
mod flash_lender {
    use ierc3156::{
        callback_success,
        ierc3156_flash_borrower::Result as BorrowerResult,
        ierc3156_flash_lender::{Error, IERC3156FlashLender, Result},
    };
    use ink::{
        env::{
            call::{build_call, ExecutionInput, Selector},
            DefaultEnvironment,
        },
        prelude::vec::Vec,
        storage::Mapping,
    };

    /// Basis points in a whole: a `fee` of 1 is 0.01%.
    const FEE_DENOMINATOR: u128 = 10_000;

    /// Emitted once a loan has been repaid with its fee.
    #[ink(event)]
    pub struct FlashLoan {
        #[ink(topic)]
        initiator: AccountId,
        #[ink(topic)]
        receiver: AccountId,
        #[ink(topic)]
        token: AccountId,
        amount: u128,
        fee: u128,
    }

    #[ink(storage)]
    pub struct FlashLender {
        supported_tokens: Mapping<AccountId, bool>,
        fee: u128, // 1 = 0.01%
    }

    impl IERC3156FlashLender for FlashLender {
        /// Loan `amount` tokens to `receiver`, and take them back plus a `flash_fee` after the callback.
        ///
        /// Any receiver and any amount, zero included, is accepted: the receiver
        /// decides whether to honour a loan it did not ask for.
        ///
        /// ## Params:
        /// - `receiver`: The contract receiving the tokens.
        ///   Must implement `IERC3156FlashBorrower::on_flash_loan`.
        /// - `token`: The loan currency.
        /// - `amount`: The amount of tokens lent.
        /// - `data`: A data parameter to be passed on to the `receiver` for any custom use.
        ///
        /// ## Returns:
        /// - `bool`: True if the flash loan succeeds.
        #[ink(message)]
        fn flash_loan(
            &self,
            receiver: AccountId,
            token: AccountId,
            amount: u128,
            data: Vec<u8>,
        ) -> Result<bool> {
            self._ensure_supported(token)?;
            let fee = _flash_fee(self.fee, amount)?;
            let repayment = amount.checked_add(fee).ok_or(Error::Overflow)?;
            let this = self.env().account_id();
            if amount > _liquidity(self._call_erc20_balance_of(token, this))? {
                return Err(Error::InsufficientLiquidity);
            }
            if !self._call_erc20_transfer(receiver, token, amount) {
                return Err(Error::TransferFailed);
            }
            let initiator = self.env().caller();
            if !self._call_ierc3156_flash_borrower_callback(
                initiator, receiver, token, amount, fee, data,
            ) {
                ink::env::debug_println!(
                    "flash loan refused by receiver {:?} (initiator {:?})",
                    receiver,
                    initiator
                );
                return Err(Error::CallbackFailed);
            }
            if !self._call_erc20_transfer_from(this, receiver, token, repayment) {
                return Err(Error::RepayFailed);
            }
            self.env().emit_event(FlashLoan {
                initiator,
                receiver,
                token,
                amount,
                fee,
            });
            Ok(true)
        }

        /// The fee to be charged for a given loan.
        ///
        /// ## Params:
        /// - `token`: The loan currency.
        /// - `amount`: The amount of tokens lent.
        ///
        /// ## Returns:
        /// - `u128`: The fee to be charged on top of the returned principal.
        #[ink(message)]
        fn flash_fee(&self, token: AccountId, amount: u128) -> Result<u128> {
            self._ensure_supported(token)?;
            _flash_fee(self.fee, amount)
        }

        /// The amount of currency available to be lent.
        ///
        /// ## Params:
        /// - `token`: The loan currency.
        ///
        /// ## Returns:
        /// - `u128`: The amount of `token` that can be borrowed.
        #[ink(message)]
        fn max_flash_loan(&self, token: AccountId) -> Result<u128> {
            self._ensure_supported(token)?;
            _liquidity(self._call_erc20_balance_of(token, self.env().account_id()))
        }
    }

    impl FlashLender {
        /// Creates a new [`FlashLender`].
        ///
        /// ## Params:
        /// - `supported_tokens`: Token contracts supported for flash lending.
        /// - `fee`: The percentage of the loan `amount` that needs to be repaid,
        ///   in addition to `amount`. (1 == 0.01%).
        #[ink(constructor)]
        pub fn new(supported_tokens: Vec<AccountId>, fee: u128) -> Self {
            let mut tokens = Mapping::default();
            for token in supported_tokens {
                tokens.insert(token, &true);
            }
            Self {
                supported_tokens: tokens,
                fee,
            }
        }

        /// The configured fee in basis points.
        #[ink(message)]
        pub fn fee(&self) -> u128 {
            self.fee
        }

        /// Whether `token` can be borrowed from this lender.
        #[ink(message)]
        pub fn is_supported(&self, token: AccountId) -> bool {
            self.supported_tokens.get(token).unwrap_or(false)
        }

        fn _ensure_supported(&self, token: AccountId) -> Result<()> {
            if self.is_supported(token) {
                Ok(())
            } else {
                Err(Error::UnsupportedCurrency)
            }
        }

        /// Calls the ERC20 `balance_of` function on a given token contract.
        ///
        /// ## Returns:
        /// - The balance of `account`, or `None` if the call failed.
        fn _call_erc20_balance_of(&self, token: AccountId, account: AccountId) -> Option<u128> {
            build_call::<DefaultEnvironment>()
                .call(token)
                .call_v1()
                .gas_limit(0)
                .exec_input(
                    ExecutionInput::new(Selector::new(ink::selector_bytes!("IERC20::balance_of")))
                        .push_arg(account),
                )
                .returns::<u128>()
                .try_invoke()
                .ok()?
                .ok()
        }

        /// Calls the ERC20 `transfer` function on a given token contract.
        ///
        /// ## Params:
        /// - `receiver`: AccountId that will receive the tokens.
        /// - `token`: AccountId of the ERC20 contract.
        /// - `amount`: Amount of tokens to transfer.
        ///
        /// ## Returns:
        /// - A boolean indicating whether the transfer succeeded.
        fn _call_erc20_transfer(&self, receiver: AccountId, token: AccountId, amount: u128) -> bool {
            matches!(
                build_call::<DefaultEnvironment>()
                    .call(token)
                    .call_v1()
                    .gas_limit(0)
                    .exec_input(
                        ExecutionInput::new(Selector::new(ink::selector_bytes!("IERC20::transfer")))
                            .push_arg(receiver)
                            .push_arg(amount),
                    )
                    .returns::<ierc20::Result<bool>>()
                    .try_invoke(),
                Ok(Ok(Ok(true)))
            )
        }

        /// Calls the ERC20 `transfer_from` function on a given token contract.
        ///
        /// Pulls `repayment` tokens back from `receiver` into this contract,
        /// spending the allowance the receiver granted during the callback.
        ///
        /// ## Params:
        /// - `this_address`: address of the smart contract executing this.
        /// - `receiver`: AccountId the tokens are taken from.
        /// - `token`: AccountId of the ERC20 contract.
        /// - `repayment`: Principal plus fee.
        ///
        /// ## Returns:
        /// - A boolean indicating whether the transfer succeeded.
        fn _call_erc20_transfer_from(
            &self,
            this_address: AccountId,
            receiver: AccountId,
            token: AccountId,
            repayment: u128,
        ) -> bool {
            matches!(
                build_call::<DefaultEnvironment>()
                    .call(token)
                    .call_v1()
                    .gas_limit(0)
                    .exec_input(
                        ExecutionInput::new(Selector::new(ink::selector_bytes!(
                            "IERC20::transfer_from"
                        )))
                        .push_arg(receiver)
                        .push_arg(this_address)
                        .push_arg(repayment),
                    )
                    .returns::<ierc20::Result<bool>>()
                    .try_invoke(),
                Ok(Ok(Ok(true)))
            )
        }

        /// Calls the `on_flash_loan` callback on an `IERC3156FlashBorrower` contract.
        ///
        /// ## Params:
        /// - `initiator`: who requested the loan.
        /// - `receiver`: AccountId of the flash borrower contract.
        /// - `token`: AccountId of the ERC20 token contract used in the loan.
        /// - `amount`: Principal amount borrowed.
        /// - `fee`: Additional fee required for repayment.
        /// - `data`: Arbitrary bytes data passed through to the borrower.
        ///
        /// ## Returns:
        /// - `true` only if the borrower answered with [`callback_success`].
        fn _call_ierc3156_flash_borrower_callback(
            &self,
            initiator: AccountId,
            receiver: AccountId,
            token: AccountId,
            amount: u128,
            fee: u128,
            data: Vec<u8>,
        ) -> bool {
            let result = build_call::<DefaultEnvironment>()
                .call(receiver)
                .call_v1()
                .gas_limit(0)
                .exec_input(
                    ExecutionInput::new(Selector::new(ink::selector_bytes!(
                        "IERC3156FlashBorrower::on_flash_loan"
                    )))
                    .push_arg(initiator)
                    .push_arg(token)
                    .push_arg(amount)
                    .push_arg(fee)
                    .push_arg(data),
                )
                .returns::<BorrowerResult<[u8; 32]>>()
                .try_invoke();
            matches!(result, Ok(Ok(Ok(hash))) if hash == callback_success())
        }
    }

    /// Fee charged on `amount` at `fee` basis points, rounded down.
    fn _flash_fee(fee: u128, amount: u128) -> Result<u128> {
        amount
            .checked_mul(fee)
            .map(|scaled| scaled / FEE_DENOMINATOR)
            .ok_or(Error::Overflow)
    }

    /// Liquidity from a `balance_of` answer; a failed query is an error, not zero.
    fn _liquidity(balance: Option<u128>) -> Result<u128> {
        balance.ok_or(Error::BalanceQueryFailed)
    }

}
