//! Static chip identification
//!
//! Everything in here is queried once at startup and never changes while the
//! firmware runs. The firmware fills a [`ChipDescriptor`] from eFuse, flash and
//! allocator queries; the simulator builds one by hand.

use core::fmt;

/// Feature bitmask of the chip, using the ESP-IDF `CHIP_FEATURE_*` bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChipFeatures(u32);

impl ChipFeatures {
    /// Flash is embedded in the chip package
    pub const EMB_FLASH: Self = Self(1 << 0);
    /// 2.4 GHz b/g/n Wi-Fi
    pub const WIFI_BGN: Self = Self(1 << 1);
    /// Bluetooth Low Energy
    pub const BLE: Self = Self(1 << 4);
    /// Bluetooth Classic
    pub const BT: Self = Self(1 << 5);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl core::ops::BitOr for ChipFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Where the flash chip lives relative to the SoC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashPlacement {
    Embedded,
    External,
}

impl FlashPlacement {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::External => "external",
        }
    }
}

/// Index of an execution core
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoreId(pub u8);

impl CoreId {
    /// The protocol core, where the startup routine runs
    pub const PRIMARY: Self = Self(0);
    /// The application core, where the demonstration worker is pinned
    pub const SECONDARY: Self = Self(1);
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bytes per megabyte as used for the flash size line
pub const BYTES_PER_MB: u32 = 1024 * 1024;

/// Chip identification gathered once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipDescriptor {
    pub cores: u8,
    pub revision: u16,
    pub features: ChipFeatures,
    pub flash_size_bytes: u32,
    pub free_heap_bytes: usize,
}

impl ChipDescriptor {
    pub const fn has_wifi_bgn(&self) -> bool {
        self.features.contains(ChipFeatures::WIFI_BGN)
    }

    pub const fn has_ble(&self) -> bool {
        self.features.contains(ChipFeatures::BLE)
    }

    pub const fn has_bt(&self) -> bool {
        self.features.contains(ChipFeatures::BT)
    }

    /// Flash size in whole megabytes (truncating).
    pub const fn flash_size_mb(&self) -> u32 {
        self.flash_size_bytes / BYTES_PER_MB
    }

    pub const fn flash_placement(&self) -> FlashPlacement {
        if self.features.contains(ChipFeatures::EMB_FLASH) {
            FlashPlacement::Embedded
        } else {
            FlashPlacement::External
        }
    }
}
