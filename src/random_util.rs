use std::fmt::Write;

/// A 12 character (6 entropy bytes) long hex string, for temporary
/// file names that must not collide between concurrent writers.
pub fn randomidstring() -> Result<String, getrandom::Error> {
    let mut buf = [0u8; 6];
    getrandom::getrandom(&mut buf)?;
    let mut s = String::with_capacity(12);
    for byte in buf {
        write!(&mut s, "{:02x}", byte).expect("writing to String never fails");
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_randomidstring() {
        let a = randomidstring().unwrap();
        let b = randomidstring().unwrap();
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
