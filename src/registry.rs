use std::{
    fs::File,
    io::{Read, Seek},
    path::Path,
};

use csv::{ByteRecord, Position, ReaderBuilder};
use log::debug;
use rand::Rng;

use crate::{oui::Oui, RandmacError};

/// Location of the IEEE registry as installed by the `ieee-data` package.
pub const OUI_CSV_PATH: &str = "/var/lib/ieee-data/oui.csv";

const LARGE_BLOCK: &[u8] = b"MA-L";

/// Read-only view of an IEEE `oui.csv` file.
///
/// Only `MA-L` rows are considered. A row looks like
/// `MA-L,286FB9,"Juniper Networks",<address>`; the vendor name may or may not
/// be quoted. Lookups scan the whole source from the start, so one registry
/// can answer several queries.
#[derive(Debug)]
pub struct VendorRegistry<R> {
    reader: csv::Reader<R>,
}

impl VendorRegistry<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RandmacError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RandmacError::RegistryUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(VendorRegistry::new(file))
    }
}

impl<R: Read + Seek> VendorRegistry<R> {
    pub fn new(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        VendorRegistry { reader }
    }

    /// Number of `MA-L` rows whose vendor name starts with `vendor`.
    pub fn count_matches(&mut self, vendor: &str) -> Result<usize, RandmacError> {
        let mut count = 0;
        self.scan(vendor, |_| {
            count += 1;
            false
        })?;
        Ok(count)
    }

    /// The `index`-th matching row in file order, if there are that many.
    pub fn nth_match(&mut self, vendor: &str, index: usize) -> Result<Option<Oui>, RandmacError> {
        let mut remaining = index;
        let mut found = None;
        self.scan(vendor, |oui| {
            if remaining == 0 {
                found = Some(oui);
                true
            } else {
                remaining -= 1;
                false
            }
        })?;
        Ok(found)
    }

    /// Picks one of the rows matching `vendor` uniformly at random.
    pub fn lookup<G: Rng + ?Sized>(&mut self, vendor: &str, rng: &mut G) -> Result<Oui, RandmacError> {
        let count = self.count_matches(vendor)?;
        debug!("vendor {vendor:?} matches {count} registry rows");
        if count == 0 {
            return Err(RandmacError::VendorNotFound(vendor.to_owned()));
        }

        let index = rng.gen_range(0..count);
        debug!("selected match {index} of {count}");
        self.nth_match(vendor, index)?
            .ok_or_else(|| RandmacError::VendorNotFound(vendor.to_owned()))
    }

    /// Feeds every matching row to `on_match` until it returns `true`.
    fn scan<F>(&mut self, vendor: &str, mut on_match: F) -> Result<(), RandmacError>
    where
        F: FnMut(Oui) -> bool,
    {
        self.reader
            .seek(Position::new())
            .map_err(RandmacError::RegistryRead)?;

        // Byte records so that rows with non UTF-8 names still match bytewise.
        let mut record = ByteRecord::new();
        while self
            .reader
            .read_byte_record(&mut record)
            .map_err(RandmacError::RegistryRead)?
        {
            let Some((oui, name)) = parse_record(&record) else {
                continue;
            };
            if name.starts_with(vendor.as_bytes()) && on_match(oui) {
                break;
            }
        }
        Ok(())
    }
}

/// Extracts the prefix and vendor name of an `MA-L` row.
fn parse_record(record: &ByteRecord) -> Option<(Oui, &[u8])> {
    if record.get(0)? != LARGE_BLOCK {
        return None;
    }

    let assignment = record.get(1)?;
    if assignment.len() != 6 || !assignment.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }

    let value = std::str::from_utf8(assignment)
        .ok()
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())?;
    Some((Oui::new(value), record.get(2)?))
}
