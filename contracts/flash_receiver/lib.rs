#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub use self::flash_receiver::{FlashReceiver, FlashReceiverRef};

/// Flash loan receiver that only honours loans it requested itself.
///
/// A receiver that trusts every `on_flash_loan` coming from its lender can be
/// drained by anyone: ERC-3156 lets a third party request a loan on the
/// receiver's behalf, and the receiver pays the fee each time, even for
/// zero-amount loans. Every callback therefore goes through
/// [`ierc3156::authorization::authorize`] before anything is touched.
#[ink::contract]
mod flash_receiver {
    use ierc3156::{
        authorization::{authorize, LoanCallbackContext},
        callback_success,
        ierc3156_flash_borrower::{Action, Error, IERC3156FlashBorrower, Result},
        ierc3156_flash_lender::Result as LenderResult,
    };
    use ink::{
        env::{
            call::{build_call, ExecutionInput, Selector},
            CallFlags, DefaultEnvironment,
        },
        prelude::vec::Vec,
        scale::{DecodeAll, Encode},
    };

    /// Emitted when the receiver has acted on a loan it initiated.
    #[ink(event)]
    pub struct ActionPerformed {
        #[ink(topic)]
        token: AccountId,
        action: Action,
        amount: Balance,
        fee: Balance,
    }

    #[ink(storage)]
    pub struct FlashReceiver {
        /// Stores the trusted lender's AccountId.
        lender: AccountId,
        /// The only account allowed to request loans.
        owner: AccountId,
        /// Stores the last action performed.
        last_action: Option<Action>,
    }

    impl IERC3156FlashBorrower for FlashReceiver {
        /// See [`IERC3156FlashBorrower::on_flash_loan`].
        ///
        /// Rejects callbacks from anyone but the trusted lender, then loans
        /// this contract did not initiate. Both checks run before any state
        /// is written or any call is made.
        #[ink(message)]
        fn on_flash_loan(
            &mut self,
            initiator: AccountId,
            token: AccountId,
            amount: Balance,
            fee: Balance,
            data: Vec<u8>,
        ) -> Result<[u8; 32]> {
            let caller = self.env().caller();
            if caller != self.lender {
                ink::env::debug_println!("on_flash_loan: untrusted lender {:?}", caller);
                return Err(Error::UntrustedLender);
            }

            let context = LoanCallbackContext {
                initiator,
                receiver: self.env().account_id(),
                token,
                amount,
                fee,
                data: &data,
            };
            if let Err(rejection) = authorize(&context).into_result() {
                ink::env::debug_println!(
                    "on_flash_loan: {} {:?}",
                    rejection.reason(),
                    initiator
                );
                return Err(rejection.into());
            }

            let action = self.decode_action(&data)?;
            let repayment = amount.checked_add(fee).ok_or(Error::Overflow)?;

            // Profitable logic for `action` would go here.
            self.last_action = Some(action);
            self.env().emit_event(ActionPerformed {
                token,
                action,
                amount,
                fee,
            });

            if !self._call_erc20_approve(token, self.lender, repayment) {
                return Err(Error::ApprovalFailed);
            }
            Ok(callback_success())
        }

        /// See [`IERC3156FlashBorrower::flash_borrow`].
        #[ink(message)]
        fn flash_borrow(&self, token: AccountId, amount: Balance, action: Action) -> Result<()> {
            if self.env().caller() != self.owner {
                return Err(Error::NotOwner);
            }
            match self._call_ierc3156_flash_loan(token, amount, action.encode()) {
                Some(Ok(true)) => Ok(()),
                Some(Err(error)) => Err(error.into()),
                Some(Ok(false)) | None => Err(Error::LoanFailed),
            }
        }
    }

    impl FlashReceiver {
        /// Creates a new [`FlashReceiver`] owned by the deployer.
        ///
        /// ## Parameters:
        /// - `lender`: The trusted flash lender contract. Must not be the zero account.
        #[ink(constructor)]
        pub fn new(lender: AccountId) -> Result<Self> {
            if lender == AccountId::from([0u8; 32]) {
                return Err(Error::InvalidLender);
            }
            Ok(Self {
                lender,
                owner: Self::env().caller(),
                last_action: None,
            })
        }

        #[ink(message)]
        pub fn lender(&self) -> AccountId {
            self.lender
        }

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            self.owner
        }

        /// The action performed by the last accepted loan, if any.
        #[ink(message)]
        pub fn last_action(&self) -> Option<Action> {
            self.last_action
        }

        /// Decodes the data into an action. Trailing bytes are an error.
        fn decode_action(&self, data: &[u8]) -> Result<Action> {
            Action::decode_all(&mut &data[..]).map_err(|_| Error::ScaleDecodingErr)
        }

        /// Approves `spender` to pull `value` tokens back from this contract.
        fn _call_erc20_approve(&self, token: AccountId, spender: AccountId, value: Balance) -> bool {
            matches!(
                build_call::<DefaultEnvironment>()
                    .call(token)
                    .call_v1()
                    .gas_limit(0)
                    .exec_input(
                        ExecutionInput::new(Selector::new(ink::selector_bytes!("IERC20::approve")))
                            .push_arg(spender)
                            .push_arg(value),
                    )
                    .returns::<ierc20::Result<bool>>()
                    .try_invoke(),
                Ok(Ok(Ok(true)))
            )
        }

        /// Requests a flash loan of `amount` `token` for this contract from the lender.
        ///
        /// Re-entry is allowed so the lender can call `on_flash_loan` back.
        ///
        /// ## Returns:
        /// - The lender's answer, or `None` if the call itself failed.
        fn _call_ierc3156_flash_loan(
            &self,
            token: AccountId,
            amount: Balance,
            data: Vec<u8>,
        ) -> Option<LenderResult<bool>> {
            build_call::<DefaultEnvironment>()
                .call(self.lender)
                .call_v1()
                .gas_limit(0)
                .call_flags(CallFlags::ALLOW_REENTRY)
                .exec_input(
                    ExecutionInput::new(Selector::new(ink::selector_bytes!(
                        "IERC3156FlashLender::flash_loan"
                    )))
                    .push_arg(self.env().account_id())
                    .push_arg(token)
                    .push_arg(amount)
                    .push_arg(data),
                )
                .returns::<LenderResult<bool>>()
                .try_invoke()
                .ok()?
                .ok()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use ink::env::{test, DefaultEnvironment};

        fn accounts() -> test::DefaultAccounts<DefaultEnvironment> {
            test::default_accounts::<DefaultEnvironment>()
        }

        /// A receiver trusting `django` as its lender, deployed by `alice`.
        fn receiver() -> FlashReceiver {
            FlashReceiver::new(accounts().django).expect("lender is not the zero account")
        }

        fn this() -> AccountId {
            test::callee::<DefaultEnvironment>()
        }

        #[ink::test]
        fn new_records_lender_and_owner() {
            let accounts = accounts();
            let receiver = receiver();
            assert_eq!(receiver.lender(), accounts.django);
            assert_eq!(receiver.owner(), accounts.alice);
            assert_eq!(receiver.last_action(), None);
        }

        #[ink::test]
        fn new_rejects_zero_lender() {
            assert!(matches!(
                FlashReceiver::new(AccountId::from([0u8; 32])),
                Err(Error::InvalidLender)
            ));
        }

        #[ink::test]
        fn callback_from_untrusted_lender_is_rejected() {
            let accounts = accounts();
            let mut receiver = receiver();
            test::set_caller::<DefaultEnvironment>(accounts.eve);
            assert_eq!(
                receiver.on_flash_loan(this(), accounts.frank, 100, 0, Action::Other.encode()),
                Err(Error::UntrustedLender)
            );
        }

        #[ink::test]
        fn third_party_initiated_loan_is_rejected() {
            let accounts = accounts();
            let mut receiver = receiver();
            test::set_caller::<DefaultEnvironment>(accounts.django);
            assert_eq!(
                receiver.on_flash_loan(
                    accounts.bob,
                    accounts.frank,
                    100,
                    9,
                    Action::Arbitrage.encode()
                ),
                Err(Error::UnauthorizedInitiator)
            );
            assert_eq!(receiver.last_action(), None);
            assert_eq!(test::recorded_events().count(), 0);
        }

        #[ink::test]
        fn zero_amount_third_party_loan_is_rejected() {
            let accounts = accounts();
            let mut receiver = receiver();
            test::set_caller::<DefaultEnvironment>(accounts.django);
            assert_eq!(
                receiver.on_flash_loan(
                    accounts.bob,
                    accounts.frank,
                    0,
                    9,
                    Action::Arbitrage.encode()
                ),
                Err(Error::UnauthorizedInitiator)
            );
            assert_eq!(receiver.last_action(), None);
        }

        #[ink::test]
        fn lender_as_initiator_is_rejected() {
            let accounts = accounts();
            let mut receiver = receiver();
            test::set_caller::<DefaultEnvironment>(accounts.django);
            assert_eq!(
                receiver.on_flash_loan(accounts.django, accounts.frank, 1, 0, Vec::new()),
                Err(Error::UnauthorizedInitiator)
            );
        }

        #[ink::test]
        fn rejection_is_repeatable() {
            let accounts = accounts();
            let mut receiver = receiver();
            test::set_caller::<DefaultEnvironment>(accounts.django);
            for _ in 0..2 {
                assert_eq!(
                    receiver.on_flash_loan(accounts.bob, accounts.frank, 0, 1, Vec::new()),
                    Err(Error::UnauthorizedInitiator)
                );
            }
            assert_eq!(receiver.last_action(), None);
        }

        #[ink::test]
        fn self_initiated_loan_passes_the_gate() {
            let accounts = accounts();
            let mut receiver = receiver();
            test::set_caller::<DefaultEnvironment>(accounts.django);
            // Undecodable data fails right after the gate, before any call out.
            for amount in [0, 100] {
                assert_eq!(
                    receiver.on_flash_loan(this(), accounts.frank, amount, 9, vec![0xff]),
                    Err(Error::ScaleDecodingErr)
                );
            }
            assert_eq!(receiver.last_action(), None);
        }

        #[ink::test]
        fn payload_with_trailing_bytes_is_rejected() {
            let accounts = accounts();
            let mut receiver = receiver();
            test::set_caller::<DefaultEnvironment>(accounts.django);
            let mut data = Action::Arbitrage.encode();
            data.extend_from_slice(&[0xff, 0xff]);
            assert_eq!(
                receiver.on_flash_loan(this(), accounts.frank, 100, 9, data),
                Err(Error::ScaleDecodingErr)
            );
            assert_eq!(receiver.last_action(), None);
        }

        #[ink::test]
        fn flash_borrow_is_owner_only() {
            let accounts = accounts();
            let receiver = receiver();
            test::set_caller::<DefaultEnvironment>(accounts.bob);
            assert_eq!(
                receiver.flash_borrow(accounts.frank, 100, Action::Arbitrage),
                Err(Error::NotOwner)
            );
        }
    }

}
