//! Console report layout
//!
//! Each type here renders one block of the startup report through
//! [`core::fmt::Display`]. Callers write them with `writeln!` while holding
//! the shared console; only the banner ends in its own newline, which leaves
//! a blank line before the chip block.
//!
//! The column alignment is fixed and matches the long-standing output of the
//! chip info demo, so logs from older images line up with ours.

use core::fmt;

use crate::chip::{ChipDescriptor, CoreId};
use crate::mac::{MacAddress, MacReadError};

/// Product name shown in the banner
pub const PRODUCT_NAME: &str = "ESP32 Chip Info - Rust";

/// Startup banner with the build timestamp.
pub struct Banner<'a> {
    pub version: &'a str,
    pub build_date: &'a str,
    pub build_time: &'a str,
}

impl fmt::Display for Banner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f)?;
        writeln!(f, "{PRODUCT_NAME} - Version {}", self.version)?;
        writeln!(f, "Build date: {} {}", self.build_date, self.build_time)
    }
}

/// `true`/`false` exactly as printed for feature lines
const fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// The chip identification block.
///
/// `core` is the core the reporting task is running on.
pub struct ChipReport<'a> {
    pub idf_version: &'a str,
    pub chip: &'a ChipDescriptor,
    pub core: CoreId,
}

impl fmt::Display for ChipReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chip = self.chip;

        writeln!(f, "esp idf version : {}", self.idf_version)?;
        writeln!(f)?;
        writeln!(f, "chip # of cores        : {}", chip.cores)?;
        writeln!(f, "chip revision          : {}", chip.revision)?;
        writeln!(f, "chip feature wifi bgn  : {}", flag(chip.has_wifi_bgn()))?;
        writeln!(f, "chip feature ble       : {}", flag(chip.has_ble()))?;
        writeln!(f, "chip feature bt        : {}", flag(chip.has_bt()))?;
        writeln!(f)?;
        writeln!(
            f,
            "flash size             : {}MB ({})",
            chip.flash_size_mb(),
            chip.flash_placement().label()
        )?;
        writeln!(f, "free heap size         : {}", chip.free_heap_bytes)?;
        write!(f, "{}", CoreLine(self.core))
    }
}

/// The single line each task prints about where it runs.
pub struct CoreLine(pub CoreId);

impl fmt::Display for CoreLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Running core           : {}", self.0)
    }
}

/// Factory MAC line, or the error line when the read failed.
pub struct MacLine(pub Result<MacAddress, MacReadError>);

impl fmt::Display for MacLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Ok(mac) => write!(f, "\nEFUSE default mac address : {mac}"),
            Err(_) => write!(f, "\nERROR: Reading EFUSE default mac address."),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::format;
    use std::string::ToString;

    use super::*;
    use crate::chip::{BYTES_PER_MB, ChipFeatures};

    fn demo_chip() -> ChipDescriptor {
        ChipDescriptor {
            cores: 2,
            revision: 1,
            features: ChipFeatures::EMB_FLASH | ChipFeatures::BLE | ChipFeatures::BT,
            flash_size_bytes: 4 * BYTES_PER_MB,
            free_heap_bytes: 295_000,
        }
    }

    #[test]
    fn test_banner_layout() {
        let banner = Banner {
            version: "0.1.0",
            build_date: "2026-10-18",
            build_time: "12:00:00",
        };
        assert_eq!(
            banner.to_string(),
            "\n\nESP32 Chip Info - Rust - Version 0.1.0\nBuild date: 2026-10-18 12:00:00\n"
        );
    }

    #[test]
    fn test_chip_report_layout() {
        let chip = demo_chip();
        let report = ChipReport {
            idf_version: "v5.4",
            chip: &chip,
            core: CoreId::PRIMARY,
        };

        let expected = "esp idf version : v5.4\n\
                        \n\
                        chip # of cores        : 2\n\
                        chip revision          : 1\n\
                        chip feature wifi bgn  : false\n\
                        chip feature ble       : true\n\
                        chip feature bt        : true\n\
                        \n\
                        flash size             : 4MB (embedded)\n\
                        free heap size         : 295000\n\
                        Running core           : 0";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_feature_lines_match_bits() {
        for bits in [0u32, 1 << 1, 1 << 4, 1 << 5, (1 << 1) | (1 << 4) | (1 << 5)] {
            let chip = ChipDescriptor {
                features: ChipFeatures::from_bits(bits),
                ..demo_chip()
            };
            let text = ChipReport {
                idf_version: "",
                chip: &chip,
                core: CoreId::PRIMARY,
            }
            .to_string();

            let wifi = format!("chip feature wifi bgn  : {}", bits & (1 << 1) != 0);
            let ble = format!("chip feature ble       : {}", bits & (1 << 4) != 0);
            let bt = format!("chip feature bt        : {}", bits & (1 << 5) != 0);
            assert!(text.contains(&wifi), "{text}");
            assert!(text.contains(&ble), "{text}");
            assert!(text.contains(&bt), "{text}");
        }
    }

    #[test]
    fn test_external_flash_label() {
        let chip = ChipDescriptor {
            features: ChipFeatures::WIFI_BGN | ChipFeatures::BLE,
            flash_size_bytes: 8 * BYTES_PER_MB + 12,
            ..demo_chip()
        };
        let text = ChipReport {
            idf_version: "",
            chip: &chip,
            core: CoreId::PRIMARY,
        }
        .to_string();
        assert!(text.contains("flash size             : 8MB (external)\n"));
    }

    #[test]
    fn test_core_line() {
        assert_eq!(
            CoreLine(CoreId::SECONDARY).to_string(),
            "Running core           : 1"
        );
    }

    #[test]
    fn test_mac_line() {
        let ok = MacLine(Ok(MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF])));
        assert_eq!(ok.to_string(), "\nEFUSE default mac address : AA:BB:CC:DD:EE:FF");

        let err = MacLine(Err(MacReadError::NotProgrammed));
        assert_eq!(
            err.to_string(),
            "\nERROR: Reading EFUSE default mac address."
        );
    }
}
