use std::{fmt, str::FromStr};

use rand::Rng;

use crate::RandmacError;

/// Locally administered bit of the first octet, as seen in the 24-bit OUI.
pub const LOCAL_BIT: u32 = 0x02_0000;
/// Multicast bit of the first octet, as seen in the 24-bit OUI.
pub const MULTICAST_BIT: u32 = 0x01_0000;

const OUI_MASK: u32 = 0xff_ffff;

/// A 24-bit organizationally unique identifier, the upper half of a MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Oui(u32);

impl Oui {
    pub const fn new(value: u32) -> Self {
        Oui(value & OUI_MASK)
    }

    /// Random prefix that is always locally administered and unicast.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Oui::new((rng.gen::<u32>() & 0xfc_ffff) | LOCAL_BIT)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn octets(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    pub const fn is_local(self) -> bool {
        self.0 & LOCAL_BIT != 0
    }

    pub const fn is_multicast(self) -> bool {
        self.0 & MULTICAST_BIT != 0
    }

    pub(crate) fn set(&mut self, bit: u32) {
        self.0 |= bit;
    }

    pub(crate) fn clear(&mut self, bit: u32) {
        self.0 &= !bit;
    }

    pub(crate) fn toggle(&mut self, bit: u32) {
        self.0 ^= bit;
    }
}

impl From<[u8; 3]> for Oui {
    fn from(octets: [u8; 3]) -> Self {
        Oui(u32::from(octets[0]) << 16 | u32::from(octets[1]) << 8 | u32::from(octets[2]))
    }
}

impl fmt::Display for Oui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.octets();
        write!(f, "{a:02x}:{b:02x}:{c:02x}")
    }
}

/// Hypervisor prefixes that can be named instead of spelled out in hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OuiPreset {
    Qemu,
    Xen,
}

const PRESETS: [(&str, OuiPreset); 2] = [("qemu", OuiPreset::Qemu), ("xen", OuiPreset::Xen)];

impl OuiPreset {
    pub const fn oui(self) -> Oui {
        match self {
            OuiPreset::Qemu => Oui::new(0x52_5400),
            OuiPreset::Xen => Oui::new(0x00_163e),
        }
    }

    /// Case-insensitive lookup by preset name.
    pub fn lookup(name: &str) -> Option<Self> {
        PRESETS
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
            .map(|(_, preset)| *preset)
    }
}

impl FromStr for Oui {
    type Err = RandmacError;

    /// Accepts `xx:xx:xx`, a preset name, or 1 to 6 bare hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            return parse_colon_separated(s);
        }

        if let Some(preset) = OuiPreset::lookup(s) {
            return Ok(preset.oui());
        }

        if s.is_empty() || s.len() > 6 {
            return Err(RandmacError::InvalidOui(format!(
                "expected between 1 and 6 hex digits, got {}",
                s.len()
            )));
        }

        if let Some(bad) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(RandmacError::InvalidOui(format!(
                "aborted at {bad} due to invalid character"
            )));
        }

        u32::from_str_radix(s, 16)
            .map(Oui::new)
            .map_err(|e| RandmacError::InvalidOui(e.to_string()))
    }
}

fn parse_colon_separated(s: &str) -> Result<Oui, RandmacError> {
    let malformed = || RandmacError::InvalidOui("expected OUI in the form xx:xx:xx".to_owned());

    let mut octets = [0u8; 3];
    let mut fields = s.split(':');
    for octet in octets.iter_mut() {
        let field = fields.next().ok_or_else(malformed)?;
        if field.is_empty() || field.len() > 2 || !field.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        *octet = u8::from_str_radix(field, 16).map_err(|_| malformed())?;
    }
    if fields.next().is_some() {
        return Err(malformed());
    }

    Ok(Oui::from(octets))
}
