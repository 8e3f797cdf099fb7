use std::path::Path;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::exposure::ExposureInfo;

/// Probe output for a single file
pub struct ProbeReport<'a> {
    file:     &'a Path,
    size:     u64,
    exposure: &'a ExposureInfo
}

impl<'a> ProbeReport<'a> {
    pub fn new(file: &'a Path, size: u64, exposure: &'a ExposureInfo) -> ProbeReport<'a> {
        ProbeReport {
            file,
            size,
            exposure
        }
    }
}

impl<'a> Serialize for ProbeReport<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("ProbeReport", 4)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("exposure", &self.exposure)?;
        // whether a debevec merge can use this file
        state.serialize_field("usable", &self.exposure.exposure_time.is_some())?;

        state.end()
    }
}
