use rand::RngCore;

/// Hex string from `bytes` random bytes (so twice as many characters).
/// Used for session tokens, password salts and export-file suffixes.
pub fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}
