use md5::{Digest, Md5};

/// Builds the Gravatar URL for an email address.
///
/// The address is trimmed and lowercased before hashing, so the URL is
/// stable across submission casing. Options are fixed: 200px, pg rating,
/// "mystery man" fallback image.
pub fn gravatar_url(email: &str) -> String {
    let digest = Md5::digest(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
        hex::encode(digest)
    )
}
