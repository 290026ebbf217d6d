use macaddr::{MacAddr6, MacAddr8};
use rand::Rng;

use crate::oui::{Oui, LOCAL_BIT, MULTICAST_BIT};

/// Bit overrides requested on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressFlags {
    pub local: bool,
    pub global: bool,
    pub unicast: bool,
    pub multicast: bool,
    pub eui64: bool,
}

impl AddressFlags {
    /// Applies the overrides in a fixed order, so `local` beats `global` and
    /// `multicast` beats `unicast` when both are given.
    ///
    /// EUI-64 output flips the universal/local bit, turning the modified
    /// EUI-64 interface identifier convention back into the plain one.
    pub fn apply(&self, mut oui: Oui) -> Oui {
        if self.global {
            oui.clear(LOCAL_BIT);
        }
        if self.local {
            oui.set(LOCAL_BIT);
        }
        if self.unicast {
            oui.clear(MULTICAST_BIT);
        }
        if self.multicast {
            oui.set(MULTICAST_BIT);
        }
        if self.eui64 {
            oui.toggle(LOCAL_BIT);
        }
        oui
    }
}

/// Draws the 24-bit device half of an address.
pub fn random_nic<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen::<u32>() & 0xff_ffff
}

/// Combines a prefix and device identifier after applying `flags`.
pub fn assemble(oui: Oui, nic: u32, flags: &AddressFlags) -> MacAddr6 {
    let [a, b, c] = flags.apply(oui).octets();
    MacAddr6::new(a, b, c, (nic >> 16) as u8, (nic >> 8) as u8, nic as u8)
}

/// Widens a MAC address to EUI-64 by inserting `ff:fe` in the middle.
pub fn to_eui64(mac: MacAddr6) -> MacAddr8 {
    let [a, b, c, d, e, f] = mac.into_array();
    MacAddr8::new(a, b, c, 0xff, 0xfe, d, e, f)
}

/// The four ways an address can be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacFormat {
    Lower,
    Upper,
    Eui64Lower,
    Eui64Upper,
}

impl MacFormat {
    pub const fn select(eui64: bool, uppercase: bool) -> Self {
        match (eui64, uppercase) {
            (false, false) => MacFormat::Lower,
            (false, true) => MacFormat::Upper,
            (true, false) => MacFormat::Eui64Lower,
            (true, true) => MacFormat::Eui64Upper,
        }
    }

    const fn is_uppercase(self) -> bool {
        matches!(self, MacFormat::Upper | MacFormat::Eui64Upper)
    }

    /// Colon separated hex octets, without a trailing newline.
    pub fn render(self, mac: MacAddr6) -> String {
        let text = match self {
            MacFormat::Lower | MacFormat::Upper => mac.to_string(),
            MacFormat::Eui64Lower | MacFormat::Eui64Upper => to_eui64(mac).to_string(),
        };
        if self.is_uppercase() {
            text
        } else {
            text.to_ascii_lowercase()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const QEMU: Oui = Oui::new(0x525400);

    fn flags(local: bool, global: bool, unicast: bool, multicast: bool) -> AddressFlags {
        AddressFlags {
            local,
            global,
            unicast,
            multicast,
            eui64: false,
        }
    }

    #[test]
    fn single_flags_set_exact_bits() {
        let globally_unique_multicast = Oui::new(0x010203);
        let local_unicast = Oui::new(0x030203 & !0x010000);

        assert!(flags(true, false, false, false).apply(globally_unique_multicast).is_local());
        assert!(!flags(false, true, false, false).apply(local_unicast).is_local());
        assert!(!flags(false, false, true, false).apply(globally_unique_multicast).is_multicast());
        assert!(flags(false, false, false, true).apply(local_unicast).is_multicast());
    }

    #[test]
    fn no_flags_leave_prefix_alone() {
        assert_eq!(AddressFlags::default().apply(QEMU), QEMU);
    }

    #[test]
    fn local_wins_over_global() {
        let oui = flags(true, true, false, false).apply(Oui::new(0x001122));
        assert!(oui.is_local());
        assert_eq!(oui.value(), 0x021122);
    }

    #[test]
    fn multicast_wins_over_unicast() {
        let oui = flags(false, false, true, true).apply(Oui::new(0x001122));
        assert!(oui.is_multicast());
        assert_eq!(oui.value(), 0x011122);
    }

    #[test]
    fn eui64_toggles_local_bit_last() {
        let eui = AddressFlags {
            local: true,
            eui64: true,
            ..Default::default()
        };
        assert_eq!(eui.apply(QEMU).value(), 0x505400);
        let eui = AddressFlags {
            eui64: true,
            ..Default::default()
        };
        assert_eq!(eui.apply(Oui::new(0x00163e)).value(), 0x02163e);
    }

    #[test]
    fn assemble_splits_prefix_and_nic() {
        let mac = assemble(QEMU, 0x12abef, &AddressFlags::default());
        assert_eq!(mac.into_array(), [0x52, 0x54, 0x00, 0x12, 0xab, 0xef]);
    }

    #[test]
    fn nic_fits_in_24_bits() {
        use rand::{rngs::StdRng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(11);
        assert!((0..256).all(|_| random_nic(&mut rng) <= 0xffffff));
    }

    #[test]
    fn format_table_covers_all_modes() {
        let mac = MacAddr6::new(0x52, 0x54, 0x00, 0xab, 0xcd, 0xef);
        assert_eq!(MacFormat::select(false, false).render(mac), "52:54:00:ab:cd:ef");
        assert_eq!(MacFormat::select(false, true).render(mac), "52:54:00:AB:CD:EF");
        assert_eq!(MacFormat::select(true, false).render(mac), "52:54:00:ff:fe:ab:cd:ef");
        assert_eq!(MacFormat::select(true, true).render(mac), "52:54:00:FF:FE:AB:CD:EF");
    }
}
