mod entropy;
mod oui;
mod registry;
mod util;

use std::{io, path::PathBuf};

use log::debug;
use rand::Rng;
use thiserror::Error;

pub use entropy::{seeded_rng, RANDOM_DEVICE};
pub use oui::{Oui, OuiPreset, LOCAL_BIT, MULTICAST_BIT};
pub use registry::{VendorRegistry, OUI_CSV_PATH};
pub use util::{assemble, random_nic, to_eui64, AddressFlags, MacFormat};

#[derive(Error, Debug)]
pub enum RandmacError {
    #[error("Invalid OUI specification ({0})")]
    InvalidOui(String),
    #[error("Failed to open {}. File possibly missing, try installing the ieee-data package", .path.display())]
    RegistryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Something went wrong when reading the vendor registry: {0}")]
    RegistryRead(#[source] csv::Error),
    #[error("Invalid vendor OUI: no registry entry starts with {0:?}")]
    VendorNotFound(String),
    #[error("failed to open {}: {source}", .path.display())]
    EntropyUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read from {}", .path.display())]
    EntropyShortRead { path: PathBuf },
}

/// Where the upper half of the address comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixSource {
    /// A random locally administered unicast prefix.
    Random,
    /// A prefix spec as accepted by `Oui::from_str`.
    Explicit(String),
    /// A vendor name prefix looked up in the registry.
    Vendor(String),
}

impl PrefixSource {
    /// A vendor always takes precedence over an explicit prefix.
    pub fn new(oui: Option<String>, vendor: Option<String>) -> Self {
        match (vendor, oui) {
            (Some(vendor), _) => PrefixSource::Vendor(vendor),
            (None, Some(oui)) => PrefixSource::Explicit(oui),
            (None, None) => PrefixSource::Random,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MacConfig {
    pub prefix: PrefixSource,
    pub flags: AddressFlags,
    pub uppercase: bool,
    pub registry: PathBuf,
}

impl Default for MacConfig {
    fn default() -> Self {
        MacConfig {
            prefix: PrefixSource::Random,
            flags: AddressFlags::default(),
            uppercase: false,
            registry: PathBuf::from(OUI_CSV_PATH),
        }
    }
}

pub fn resolve_oui<R: Rng + ?Sized>(config: &MacConfig, rng: &mut R) -> Result<Oui, RandmacError> {
    let oui = match &config.prefix {
        PrefixSource::Vendor(vendor) => VendorRegistry::open(&config.registry)?.lookup(vendor, rng)?,
        PrefixSource::Explicit(spec) => spec.parse::<Oui>()?,
        PrefixSource::Random => Oui::random(rng),
    };
    debug!("resolved {:?} to prefix {oui}", config.prefix);
    Ok(oui)
}

/// Produces one formatted address; the prefix is drawn before the device half.
pub fn generate_mac<R: Rng + ?Sized>(config: &MacConfig, rng: &mut R) -> Result<String, RandmacError> {
    let oui = resolve_oui(config, rng)?;
    let nic = random_nic(rng);
    let mac = assemble(oui, nic, &config.flags);
    Ok(MacFormat::select(config.flags.eui64, config.uppercase).render(mac))
}
