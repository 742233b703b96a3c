//! ERC-3156 flash loan interfaces: the lender and borrower traits, their
//! errors, and the authorization gate a borrower applies to every callback.
#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub mod authorization;
pub mod ierc3156_flash_borrower;
pub mod ierc3156_flash_lender;

use ink::env::hash::{HashOutput, Keccak256};

/// Preimage of the value a borrower returns from `on_flash_loan` to accept a loan.
pub const CALLBACK_SUCCESS_PREIMAGE: &[u8] = b"ERC3156FlashBorrower.onFlashLoan";

/// Returns `keccak256("ERC3156FlashBorrower.onFlashLoan")`.
///
/// Lenders treat any other callback return value as a failed loan.
pub fn callback_success() -> [u8; 32] {
    let mut output = <Keccak256 as HashOutput>::Type::default();
    ink::env::hash_bytes::<Keccak256>(CALLBACK_SUCCESS_PREIMAGE, &mut output);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_success_is_the_erc3156_magic_value() {
        // keccak256("ERC3156FlashBorrower.onFlashLoan")
        let expected: [u8; 32] = [
            0x43, 0x91, 0x48, 0xf0, 0xbb, 0xc6, 0x82, 0xca, 0x07, 0x9e, 0x46, 0xd6, 0xe2, 0xc2,
            0xf0, 0xc1, 0xe3, 0xb8, 0x20, 0xf1, 0xa2, 0x91, 0xb0, 0x69, 0xd8, 0x88, 0x2a, 0xbf,
            0x8c, 0xf1, 0x8d, 0xd9,
        ];
        assert_eq!(callback_success(), expected);
    }
}
