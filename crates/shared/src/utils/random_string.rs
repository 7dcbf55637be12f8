use anyhow::Result;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng, TryRngCore};

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const DIGITS: &[u8] = b"0123456789";

fn seeded_rng() -> Result<StdRng> {
    let mut seed = [0u8; 32];
    OsRng.try_fill_bytes(&mut seed)?;
    Ok(StdRng::from_seed(seed))
}

fn sample(alphabet: &[u8], length: usize) -> Result<String> {
    let mut rng = seeded_rng()?;

    Ok((0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect())
}

/// Alphanumeric string, used for session ids and temporary passwords.
pub fn generate_random_string(length: usize) -> Result<String> {
    sample(ALPHANUMERIC, length)
}

/// Digits only, leading zeros kept. Used for mailed verification codes.
pub fn generate_numeric_code(length: usize) -> Result<String> {
    sample(DIGITS, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_string_is_alphanumeric() {
        let s = generate_random_string(40).unwrap();
        assert_eq!(s.len(), 40);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn numeric_code_keeps_its_width() {
        for _ in 0..50 {
            let code = generate_numeric_code(6).unwrap();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn zero_length_is_empty() {
        assert!(generate_random_string(0).unwrap().is_empty());
    }
}
