use std::{fs::File, io::Read, path::Path};

use log::debug;
use rand::{rngs::StdRng, SeedableRng};

use crate::RandmacError;

pub const RANDOM_DEVICE: &str = "/dev/urandom";

type Seed = <StdRng as SeedableRng>::Seed;

/// Seeds the generator used for every draw of one run from `device`.
///
/// There is no weaker fallback: if the device cannot be opened or yields a
/// short read the run fails.
pub fn seeded_rng<P: AsRef<Path>>(device: P) -> Result<StdRng, RandmacError> {
    let path = device.as_ref();
    let mut file = File::open(path).map_err(|source| RandmacError::EntropyUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seed = Seed::default();
    file.read_exact(&mut seed)
        .map_err(|_| RandmacError::EntropyShortRead {
            path: path.to_path_buf(),
        })?;
    debug!("seeded generator with {} bytes from {}", seed.len(), path.display());

    Ok(StdRng::from_seed(seed))
}
