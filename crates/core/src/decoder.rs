//! VIN decoding.
//!
//! [`decode`] turns a validated [`Vin`] into a [`DecodedVehicle`]. It never
//! fails: unknown manufacturers decode to a sentinel name, unassigned
//! country ranges and non-year codes decode to `None`.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::model_year;
use crate::vin::Vin;
use crate::wmi::{self, Region, UNKNOWN_MANUFACTURER};

/// Version of the decoding tables. Bump whenever `wmi` or `model_year`
/// tables change so stored snapshots can be told apart from fresh ones.
pub const DECODER_VERSION: i64 = 1;

/// Attributes derived from a VIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedVehicle {
    pub vin: Vin,
    pub wmi: String,
    pub manufacturer: String,
    pub region: Option<Region>,
    pub country: Option<String>,
    pub vds: String,
    pub check_digit: char,
    /// `None` when position 10 holds `0`, `U` or `Z`.
    pub model_year: Option<i32>,
    pub plant_code: char,
    pub serial: String,
    pub decoder_version: i64,
}

impl DecodedVehicle {
    /// Whether the WMI was found in the manufacturer table.
    pub fn is_known_manufacturer(&self) -> bool {
        self.manufacturer != UNKNOWN_MANUFACTURER
    }
}

/// Decode a VIN, resolving the model year against the current UTC year.
pub fn decode(vin: &Vin) -> DecodedVehicle {
    decode_for_year(vin, chrono::Utc::now().year())
}

/// Decode a VIN, resolving the model year against `reference_year`.
///
/// See [`model_year::resolve`] for how the 30-year ambiguity is settled.
pub fn decode_for_year(vin: &Vin, reference_year: i32) -> DecodedVehicle {
    let wmi = vin.wmi();
    let mut chars = wmi.chars();
    let first = chars.next().unwrap_or_default();
    let second = chars.next().unwrap_or_default();

    DecodedVehicle {
        vin: vin.clone(),
        wmi: wmi.to_string(),
        manufacturer: wmi::manufacturer(wmi)
            .unwrap_or(UNKNOWN_MANUFACTURER)
            .to_string(),
        region: Region::from_code(first),
        country: wmi::country(first, second).map(str::to_string),
        vds: vin.vds().to_string(),
        check_digit: vin.check_digit(),
        model_year: model_year::resolve(vin.year_code(), reference_year),
        plant_code: vin.plant_code(),
        serial: vin.serial().to_string(),
        decoder_version: DECODER_VERSION,
    }
}
