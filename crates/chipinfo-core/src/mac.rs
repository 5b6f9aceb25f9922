//! Factory MAC address

use core::fmt;

use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacReadError {
    #[error("factory MAC address is not programmed")]
    NotProgrammed,
}

/// A complete 6-byte MAC address.
///
/// There is no way to build a partially populated value: a read either
/// produces all six bytes or fails with [`MacReadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Validate raw bytes read from eFuse.
    ///
    /// Blank eFuse words read back as all zeroes or all ones; neither is a
    /// usable station address.
    pub fn from_factory(bytes: [u8; 6]) -> Result<Self, MacReadError> {
        if bytes.iter().all(|&b| b == 0x00) || bytes.iter().all(|&b| b == 0xFF) {
            return Err(MacReadError::NotProgrammed);
        }
        Ok(Self(bytes))
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use super::*;

    #[test]
    fn test_display_is_uppercase_colon_hex() {
        let mac = MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
        assert_eq!(mac.to_string(), "AA:BB:CC:DD:EE:FF");

        let mac = MacAddress::new([0x00, 0x0a, 0x01, 0x02, 0x30, 0x7f]);
        assert_eq!(mac.to_string(), "00:0A:01:02:30:7F");
    }

    #[test]
    fn test_blank_efuse_is_rejected() {
        assert_eq!(
            MacAddress::from_factory([0; 6]),
            Err(MacReadError::NotProgrammed)
        );
        assert_eq!(
            MacAddress::from_factory([0xFF; 6]),
            Err(MacReadError::NotProgrammed)
        );
    }

    #[test]
    fn test_programmed_mac_is_kept_whole() {
        let bytes = [0x24, 0x0A, 0xC4, 0x12, 0x34, 0x56];
        let mac = MacAddress::from_factory(bytes).unwrap();
        assert_eq!(mac.octets(), bytes);
    }
}
