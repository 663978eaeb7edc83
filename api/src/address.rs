use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

const C32_CHARS: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// A Stacks principal: address version byte plus hash160 of the public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StacksAddress {
    pub version: u8,
    pub hash160: [u8; 20],
}

impl StacksAddress {
    /// Mainnet single-sig address version (`SP...`).
    pub const VERSION_MAINNET_SINGLESIG: u8 = 22;
    /// Testnet single-sig address version (`ST...`).
    pub const VERSION_TESTNET_SINGLESIG: u8 = 26;

    pub fn new(version: u8, hash160: [u8; 20]) -> Self {
        Self { version, hash160 }
    }
}

impl fmt::Display for StacksAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let checksum = c32_checksum(self.version, &self.hash160);
        let mut payload = self.hash160.to_vec();
        payload.extend_from_slice(&checksum);
        write!(
            f,
            "S{}{}",
            C32_CHARS[(self.version & 0x1f) as usize] as char,
            c32_encode(&payload)
        )
    }
}

impl FromStr for StacksAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s.strip_prefix('S').ok_or(Error::C32TooShort)?;
        let mut chars = rest.chars();
        let version_char = chars.next().ok_or(Error::C32TooShort)?;
        let version = c32_char_value(version_char)?;

        let payload = c32_decode(chars.as_str())?;
        if payload.len() < 4 {
            return Err(Error::C32TooShort);
        }
        let (data, checksum) = payload.split_at(payload.len() - 4);
        if data.len() != 20 {
            return Err(Error::BadAddressLength(data.len()));
        }
        if checksum != c32_checksum(version, data) {
            return Err(Error::BadChecksum);
        }

        let mut hash160 = [0u8; 20];
        hash160.copy_from_slice(data);
        Ok(StacksAddress { version, hash160 })
    }
}

/// First 4 bytes of sha256(sha256(version || data)).
fn c32_checksum(version: u8, data: &[u8]) -> [u8; 4] {
    let mut buf = Vec::with_capacity(1 + data.len());
    buf.push(version);
    buf.extend_from_slice(data);
    let digest = Sha256::digest(Sha256::digest(&buf));
    let mut checksum = [0u8; 4];
    checksum.copy_from_slice(&digest[..4]);
    checksum
}

/// Maps a c32 character to its 5-bit value, normalizing the usual homoglyphs
/// (O reads as 0, L and I as 1) and accepting lowercase.
fn c32_char_value(c: char) -> Result<u8> {
    let c = match c.to_ascii_uppercase() {
        'O' => '0',
        'L' | 'I' => '1',
        other => other,
    };
    C32_CHARS
        .iter()
        .position(|&b| b as char == c)
        .map(|i| i as u8)
        .ok_or(Error::InvalidC32Char(c))
}

fn c32_encode(input: &[u8]) -> String {
    let mut result: Vec<u8> = Vec::new();
    let mut carry: u32 = 0;
    let mut carry_bits: u32 = 0;

    for byte in input.iter().rev() {
        carry |= (*byte as u32) << carry_bits;
        carry_bits += 8;
        while carry_bits >= 5 {
            result.push(C32_CHARS[(carry & 0x1f) as usize]);
            carry >>= 5;
            carry_bits -= 5;
        }
    }
    if carry_bits > 0 {
        result.push(C32_CHARS[(carry & 0x1f) as usize]);
    }

    // Drop excess zero digits, then keep one digit per leading zero byte.
    while result.last() == Some(&b'0') {
        result.pop();
    }
    for byte in input {
        if *byte == 0 {
            result.push(b'0');
        } else {
            break;
        }
    }

    result.reverse();
    String::from_utf8(result).expect("c32 output is ascii")
}

fn c32_decode(input: &str) -> Result<Vec<u8>> {
    let mut result: Vec<u8> = Vec::new();
    let mut carry: u32 = 0;
    let mut carry_bits: u32 = 0;

    for c in input.chars().rev() {
        carry |= (c32_char_value(c)? as u32) << carry_bits;
        carry_bits += 5;
        while carry_bits >= 8 {
            result.push((carry & 0xff) as u8);
            carry >>= 8;
            carry_bits -= 8;
        }
    }
    if carry_bits > 0 && carry != 0 {
        result.push((carry & 0xff) as u8);
    }

    while result.last() == Some(&0) {
        result.pop();
    }
    for c in input.chars() {
        if c == '0' {
            result.push(0);
        } else {
            break;
        }
    }

    result.reverse();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_display_and_parse() {
        let address = StacksAddress::new(StacksAddress::VERSION_TESTNET_SINGLESIG, [0x11; 20]);
        let encoded = address.to_string();
        assert!(encoded.starts_with("ST"), "got {encoded}");
        assert_eq!(encoded.parse::<StacksAddress>().unwrap(), address);

        let mainnet = StacksAddress::new(StacksAddress::VERSION_MAINNET_SINGLESIG, [0xab; 20]);
        assert!(mainnet.to_string().starts_with("SP"));
    }

    #[test]
    fn preserves_leading_zero_bytes() {
        let address = StacksAddress::new(StacksAddress::VERSION_MAINNET_SINGLESIG, [0x00; 20]);
        let parsed: StacksAddress = address.to_string().parse().unwrap();
        assert_eq!(parsed, address);
    }

    #[test]
    fn accepts_lowercase_input() {
        let address = StacksAddress::new(StacksAddress::VERSION_TESTNET_SINGLESIG, [0x7f; 20]);
        let lowered = address.to_string().to_lowercase();
        assert_eq!(lowered.parse::<StacksAddress>().unwrap(), address);
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let address = StacksAddress::new(StacksAddress::VERSION_TESTNET_SINGLESIG, [0x42; 20]);
        let mut encoded = address.to_string();
        let last = encoded.pop().unwrap();
        let replacement = if last == 'A' { 'B' } else { 'A' };
        encoded.push(replacement);
        assert_eq!(encoded.parse::<StacksAddress>(), Err(Error::BadChecksum));
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<StacksAddress>().is_err());
        assert!("S".parse::<StacksAddress>().is_err());
        assert!("ST!!!!".parse::<StacksAddress>().is_err());
        assert!("XP000".parse::<StacksAddress>().is_err());
    }
}
