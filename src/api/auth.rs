use rand::Rng;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

/// Random hex string of `bytes * 2` characters.
pub fn token_hex(bytes: usize) -> String {
    let mut rng = rand::rng();
    let mut out = String::with_capacity(bytes * 2);
    for _ in 0..bytes {
        let byte: u8 = rng.random();
        let _ = write!(out, "{byte:02x}");
    }
    out
}

pub fn auth_file_contents(key: &str) -> String {
    format!("----------AUTH KEY----------\n{key}\n----------AUTH KEY END----------")
}

/// Writes the key where operators (and the game's config) can pick it up.
pub fn write_auth_file(path: impl AsRef<Path>, key: &str) -> io::Result<()> {
    fs::write(path, auth_file_contents(key))
}
