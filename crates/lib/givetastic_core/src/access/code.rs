//! Access-code generation and shape checks.

use rand::{Rng, rng};

/// Characters an access code is drawn from.
pub const CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a generated access code.
pub const CODE_LENGTH: usize = 8;

/// Generate a random code: [`CODE_LENGTH`] characters, each drawn uniformly
/// from [`CODE_ALPHABET`].
pub fn generate_code() -> String {
    let mut rng = rng();
    (0..CODE_LENGTH)
        .map(|_| char::from(CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())]))
        .collect()
}

/// Whether `code` has the shape of a generated code.
///
/// Allow-listed fallback codes such as `TEAM001` do not; validation never
/// requires this shape, only issuance guarantees it.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| CODE_ALPHABET.contains(&b))
}

/// Normalize user input before validation.
pub fn normalize(code: &str) -> String {
    code.to_uppercase()
}
