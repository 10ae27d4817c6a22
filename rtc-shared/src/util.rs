use rand::{Rng, rng};

const RUNES_ALPHA_NUMBER: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// math_rand_alpha_number generates a random alphabet and number sequence of the requested length.
pub fn math_rand_alpha_number(n: usize) -> String {
    random_string(n, RUNES_ALPHA_NUMBER)
}

/// random_string draws `n` characters from `runes`.
pub fn random_string(n: usize, runes: &[u8]) -> String {
    let mut rng = rng();

    (0..n)
        .map(|_| {
            let idx = rng.random_range(0..runes.len());
            runes[idx] as char
        })
        .collect()
}
