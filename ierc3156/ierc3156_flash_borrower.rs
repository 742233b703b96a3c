//! Trait definition for a Flash Borrower contract compatible with `IERC3156FlashBorrower`.

use crate::authorization::Rejection;
use crate::ierc3156_flash_lender::Error as LenderError;
use ierc20::Error as ERC20Error;
use ink::prelude::vec::Vec;
use ink::primitives::AccountId;

/// The Flash borrower result type.
pub type Result<T> = core::result::Result<T, Error>;

/// What the borrower does with the funds while it holds them.
///
/// Travels SCALE-encoded in the `data` argument of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[ink::scale_derive(Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(ink::storage::traits::StorageLayout))]
pub enum Action {
    Arbitrage,
    Other,
}

/// A trait for flash borrowing of ERC20 tokens, following the IERC3156 standard.
#[ink::trait_definition]
pub trait IERC3156FlashBorrower {
    /// ERC-3156 Flash loan callback.
    ///
    /// This function is called by the lender after the tokens have been
    /// transferred. It verifies the caller and initiator, decodes the action,
    /// and executes custom logic depending on the action type.
    ///
    /// ## Parameters:
    /// - `initiator`: The account that initiated the loan. Must be `self`.
    /// - `token`: The address of the token that was lent.
    /// - `amount`: The amount of tokens borrowed.
    /// - `fee`: The fee charged by the lender.
    /// - `data`: Encoded arbitrary data, usually used to signal the type of action.
    ///
    /// ## Returns:
    /// - `keccak256("ERC3156FlashBorrower.onFlashLoan")` on success.
    #[ink(message)]
    fn on_flash_loan(
        &mut self,
        initiator: AccountId,
        token: AccountId,
        amount: u128,
        fee: u128,
        data: Vec<u8>,
    ) -> Result<[u8; 32]>;

    /// Initiates a flash loan from the trusted lender.
    ///
    /// Encodes the action and requests a flash loan from the lender, which
    /// calls back into `on_flash_loan`.
    ///
    /// ## Parameters:
    /// - `token`: The address of the token to borrow.
    /// - `amount`: The amount of tokens to borrow.
    /// - `action`: What to do with the borrowed tokens.
    #[ink(message)]
    fn flash_borrow(&self, token: AccountId, amount: u128, action: Action) -> Result<()>;
}

/// The Flash Borrower error types.
#[derive(Debug, PartialEq, Eq)]
#[ink::scale_derive(Encode, Decode, TypeInfo)]
pub enum Error {
    /// Returned if the lender is not trusted.
    UntrustedLender,
    /// Returned if the loan was not initiated by the borrower itself.
    UnauthorizedInitiator,
    /// Returned if a restricted message is called by someone other than the owner.
    NotOwner,
    /// Returned if the configured lender is the zero account.
    InvalidLender,
    /// Returned when decoding data failed.
    ScaleDecodingErr,
    /// Returned if approving the lender for repayment failed.
    ApprovalFailed,
    /// Returned if `amount + fee` overflowed.
    Overflow,
    /// Returned if the call to the lender could not be completed.
    LoanFailed,
    /// Error related to ERC3156.
    ERC3156LenderError(LenderError),
    /// Error related to ERC20.
    ERC20Error(ERC20Error),
}

impl From<Rejection> for Error {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::UnauthorizedInitiator => Error::UnauthorizedInitiator,
        }
    }
}

impl From<LenderError> for Error {
    fn from(error: LenderError) -> Self {
        Error::ERC3156LenderError(error)
    }
}

impl From<ERC20Error> for Error {
    fn from(error: ERC20Error) -> Self {
        Error::ERC20Error(error)
    }
}
