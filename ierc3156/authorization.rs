//! Authorization gate for `on_flash_loan` callbacks.
//!
//! ERC-3156 lets anyone request a loan on behalf of any receiver, for any
//! amount including zero. A receiver that pays the fee without checking who
//! asked for the loan can be drained one fee at a time by a third party. The
//! gate closes that hole: a callback may only proceed when the receiver
//! initiated the loan itself.

/// A single inbound flash loan notification, as seen by the receiver.
///
/// Built fresh for every callback and consumed by [`authorize`]; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanCallbackContext<'a, Id, Balance> {
    /// The account that requested the loan from the lender.
    pub initiator: Id,
    /// The receiver evaluating the callback.
    pub receiver: Id,
    /// The loaned token.
    pub token: Id,
    pub amount: Balance,
    pub fee: Balance,
    /// Opaque payload forwarded by the lender.
    pub data: &'a [u8],
}

/// Why a callback was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The loan was not initiated by the receiver itself.
    UnauthorizedInitiator,
}

impl Rejection {
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::UnauthorizedInitiator => "unauthorized initiator",
        }
    }
}

/// Outcome of [`authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Decision {
    Proceed,
    Reject(Rejection),
}

impl Decision {
    /// Converts the decision into a `Result` so callers can bail out with `?`.
    pub fn into_result(self) -> Result<(), Rejection> {
        match self {
            Decision::Proceed => Ok(()),
            Decision::Reject(rejection) => Err(rejection),
        }
    }
}

/// Decides whether a flash loan callback may act on the loan.
///
/// Only `initiator` and `receiver` are consulted: the token, amount, fee and
/// payload never change the outcome, so zero-amount loans get no exemption.
pub fn authorize<Id, Balance>(context: &LoanCallbackContext<'_, Id, Balance>) -> Decision
where
    Id: PartialEq,
{
    if context.initiator == context.receiver {
        Decision::Proceed
    } else {
        Decision::Reject(Rejection::UnauthorizedInitiator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECEIVER: &str = "0xAAA";
    const STRANGER: &str = "0xBBB";
    const TOKEN: &str = "0xT0K";

    fn context<'a>(
        initiator: &'static str,
        amount: u128,
        fee: u128,
        data: &'a [u8],
    ) -> LoanCallbackContext<'a, &'static str, u128> {
        LoanCallbackContext {
            initiator,
            receiver: RECEIVER,
            token: TOKEN,
            amount,
            fee,
            data,
        }
    }

    #[test]
    fn self_initiated_loan_proceeds() {
        assert_eq!(authorize(&context(RECEIVER, 100, 0, &[])), Decision::Proceed);
    }

    #[test]
    fn third_party_loan_is_rejected() {
        assert_eq!(
            authorize(&context(STRANGER, 100, 0, &[])),
            Decision::Reject(Rejection::UnauthorizedInitiator)
        );
    }

    #[test]
    fn zero_amount_third_party_loan_is_rejected() {
        assert_eq!(
            authorize(&context(STRANGER, 0, 0, &[])),
            Decision::Reject(Rejection::UnauthorizedInitiator)
        );
    }

    #[test]
    fn zero_amount_self_initiated_loan_proceeds() {
        assert_eq!(authorize(&context(RECEIVER, 0, 0, &[])), Decision::Proceed);
    }

    #[test]
    fn lender_as_initiator_is_rejected() {
        let ctx = LoanCallbackContext {
            initiator: "0xPOOL",
            receiver: RECEIVER,
            token: TOKEN,
            amount: 10u128,
            fee: 1u128,
            data: &[],
        };
        assert_eq!(
            authorize(&ctx).into_result(),
            Err(Rejection::UnauthorizedInitiator)
        );
    }

    #[test]
    fn decision_ignores_amount_fee_and_data() {
        let payloads: [&[u8]; 3] = [&[], &[0], &[0xde, 0xad, 0xbe, 0xef]];
        for amount in [0u128, 1, 100, u128::MAX] {
            for fee in [0u128, 9, u128::MAX] {
                for data in payloads {
                    assert_eq!(
                        authorize(&context(RECEIVER, amount, fee, data)),
                        Decision::Proceed
                    );
                    assert_eq!(
                        authorize(&context(STRANGER, amount, fee, data)),
                        Decision::Reject(Rejection::UnauthorizedInitiator)
                    );
                }
            }
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let accepted = context(RECEIVER, 5, 1, b"payload");
        let refused = context(STRANGER, 5, 1, b"payload");
        assert_eq!(authorize(&accepted), authorize(&accepted));
        assert_eq!(authorize(&refused), authorize(&refused));
    }

    #[test]
    fn rejection_reason() {
        assert_eq!(
            Rejection::UnauthorizedInitiator.reason(),
            "unauthorized initiator"
        );
        assert_eq!(Decision::Proceed.into_result(), Ok(()));
    }
}
