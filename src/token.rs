use rand::{ distr::Alphanumeric, Rng };

/// Generate a URL-safe token of `length` characters drawn from `[A-Za-z0-9]`.
///
/// The token is a long-lived bearer secret baked into a printed QR code, so it
/// comes from `rand::rng()`, a cryptographically secure generator.
pub fn generate(length: usize) -> String {
    rand::rng().sample_iter(&Alphanumeric).take(length).map(char::from).collect()
}
