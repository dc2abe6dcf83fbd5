use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

/// Generate a random alphanumeric string (`[A-Za-z0-9]`) from the OS CSPRNG.
///
/// Suitable for short-lived, single-use secrets such as password reset tokens.
pub fn random_alphanumeric(length: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
