pub mod errors;
pub mod schemes;
pub mod traits;

use bitvec::{order::Lsb0, slice::BitSlice};
pub use errors::MultisigError;
pub use schemes::BlsScheme;
pub use traits::CryptoScheme;

/// Generic multisig verification function that orchestrates the verification workflow.
///
/// Aggregates the keys selected by `signer_indices` and checks `signature` over
/// `message` with the resulting key. Voting-power thresholds are not checked
/// here; callers weigh the selected signers themselves.
///
/// # Errors
///
/// - `EmptyKeys` if no signer is selected
/// - `IndexOutOfRange` if a selected index has no key
/// - aggregation failures from the scheme
/// - `InvalidSignature` if verification fails
pub fn verify_multisig<S: CryptoScheme>(
    keys: &[S::PubKey],
    signer_indices: &BitSlice<u8, Lsb0>,
    message: &[u8],
    signature: &S::Signature,
) -> Result<(), MultisigError> {
    if signer_indices.not_any() {
        return Err(MultisigError::EmptyKeys);
    }

    if let Some(index) = signer_indices.iter_ones().find(|i| *i >= keys.len()) {
        return Err(MultisigError::IndexOutOfRange {
            index,
            total_keys: keys.len(),
        });
    }

    let selected_keys = signer_indices.iter_ones().map(|index| &keys[index]);
    let aggregated_key = S::aggregate(selected_keys)?;

    if !S::verify(&aggregated_key, message, signature) {
        return Err(MultisigError::InvalidSignature);
    }

    Ok(())
}
