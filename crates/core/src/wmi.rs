//! World Manufacturer Identifier lookups.
//!
//! The first character of a VIN fixes the region, the first two fix the
//! country, and the full three-character WMI names the manufacturer. The
//! tables below cover the manufacturers most often seen in consumer
//! vehicles; anything else decodes to [`UNKNOWN_MANUFACTURER`].

use serde::{Deserialize, Serialize};

/// Sentinel manufacturer name for WMIs missing from [`MANUFACTURERS`].
pub const UNKNOWN_MANUFACTURER: &str = "Unknown manufacturer";

/// Geographic region encoded by the first VIN character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Africa,
    Asia,
    Europe,
    NorthAmerica,
    Oceania,
    SouthAmerica,
}

impl Region {
    /// Region for the first character of a validated VIN.
    ///
    /// Every character of the VIN alphabet maps to a region, so `None` only
    /// comes back for characters a [`crate::vin::Vin`] can never contain.
    pub fn from_code(first: char) -> Option<Self> {
        match first {
            'A'..='H' => Some(Region::Africa),
            'J'..='R' => Some(Region::Asia),
            'S'..='Z' => Some(Region::Europe),
            '1'..='5' => Some(Region::NorthAmerica),
            '6' | '7' => Some(Region::Oceania),
            '8' | '9' | '0' => Some(Region::SouthAmerica),
            _ => None,
        }
    }
}

/// Inclusive ranges of the second VIN character, keyed by the first.
///
/// Ordering inside each range follows the VIN alphabet `A..Z` then `1..9, 0`.
const COUNTRIES: &[(char, char, char, &str)] = &[
    ('1', 'A', '0', "United States"),
    ('4', 'A', '0', "United States"),
    ('5', 'A', '0', "United States"),
    ('2', 'A', '0', "Canada"),
    ('3', 'A', 'W', "Mexico"),
    ('3', 'X', '7', "Costa Rica"),
    ('6', 'A', 'W', "Australia"),
    ('7', 'A', 'E', "New Zealand"),
    ('8', 'A', 'E', "Argentina"),
    ('8', 'F', 'K', "Chile"),
    ('8', 'X', '2', "Venezuela"),
    ('9', 'A', 'E', "Brazil"),
    ('9', 'F', 'J', "Colombia"),
    ('9', '3', '9', "Brazil"),
    ('A', 'A', 'H', "South Africa"),
    ('J', 'A', '0', "Japan"),
    ('K', 'L', 'R', "South Korea"),
    ('K', 'S', '0', "Israel"),
    ('L', 'A', '0', "China"),
    ('M', 'A', 'E', "India"),
    ('M', 'F', 'K', "Indonesia"),
    ('M', 'L', 'R', "Thailand"),
    ('N', 'L', 'R', "Turkey"),
    ('P', 'L', 'R', "Malaysia"),
    ('R', 'F', 'K', "Taiwan"),
    ('S', 'A', 'M', "United Kingdom"),
    ('S', 'N', 'T', "Germany"),
    ('S', 'U', 'Z', "Poland"),
    ('T', 'J', 'P', "Czech Republic"),
    ('T', 'R', 'V', "Hungary"),
    ('T', 'W', '1', "Portugal"),
    ('U', 'U', '7', "Romania"),
    ('V', 'A', 'E', "Austria"),
    ('V', 'F', 'R', "France"),
    ('V', 'S', 'W', "Spain"),
    ('V', 'X', '2', "Serbia"),
    ('W', 'A', '0', "Germany"),
    ('X', 'L', 'R', "Netherlands"),
    ('X', 'S', '0', "Russia"),
    ('Y', 'A', 'E', "Belgium"),
    ('Y', 'F', 'K', "Finland"),
    ('Y', 'S', 'W', "Sweden"),
    ('Z', 'A', 'R', "Italy"),
];

/// Manufacturer names keyed by the full three-character WMI.
const MANUFACTURERS: &[(&str, &str)] = &[
    ("1C3", "Chrysler"),
    ("1C4", "Chrysler"),
    ("1C6", "Ram"),
    ("1FA", "Ford"),
    ("1FM", "Ford"),
    ("1FT", "Ford"),
    ("1G1", "Chevrolet"),
    ("1GC", "Chevrolet Truck"),
    ("1GM", "Pontiac"),
    ("1G6", "Cadillac"),
    ("1GY", "Cadillac"),
    ("1HG", "Honda"),
    ("1J4", "Jeep"),
    ("1LN", "Lincoln"),
    ("1M8", "Motor Coach Industries"),
    ("1N4", "Nissan"),
    ("1N6", "Nissan Truck"),
    ("1VW", "Volkswagen"),
    ("1YV", "Mazda"),
    ("19U", "Acura"),
    ("2FA", "Ford"),
    ("2G1", "Chevrolet"),
    ("2HG", "Honda"),
    ("2HK", "Honda"),
    ("2T1", "Toyota"),
    ("2T3", "Toyota"),
    ("3FA", "Ford"),
    ("3G1", "Chevrolet"),
    ("3HG", "Honda"),
    ("3N1", "Nissan"),
    ("3VW", "Volkswagen"),
    ("4S3", "Subaru"),
    ("4S4", "Subaru"),
    ("4T1", "Toyota"),
    ("4T3", "Toyota"),
    ("5FN", "Honda"),
    ("5J6", "Honda"),
    ("5N1", "Nissan"),
    ("5NP", "Hyundai"),
    ("5TD", "Toyota"),
    ("5YJ", "Tesla"),
    ("7SA", "Tesla"),
    ("JA3", "Mitsubishi"),
    ("JF1", "Subaru"),
    ("JF2", "Subaru"),
    ("JH4", "Acura"),
    ("JHM", "Honda"),
    ("JM1", "Mazda"),
    ("JN1", "Nissan"),
    ("JN8", "Nissan"),
    ("JT2", "Toyota"),
    ("JTD", "Toyota"),
    ("JTE", "Toyota"),
    ("JTH", "Lexus"),
    ("JTJ", "Lexus"),
    ("KL1", "Daewoo"),
    ("KM8", "Hyundai"),
    ("KMH", "Hyundai"),
    ("KNA", "Kia"),
    ("KND", "Kia"),
    ("LFV", "FAW-Volkswagen"),
    ("LRW", "Tesla"),
    ("LSV", "SAIC Volkswagen"),
    ("SAJ", "Jaguar"),
    ("SAL", "Land Rover"),
    ("SCC", "Lotus"),
    ("SCF", "Aston Martin"),
    ("TMB", "Skoda"),
    ("TRU", "Audi"),
    ("VF1", "Renault"),
    ("VF3", "Peugeot"),
    ("VF7", "Citroen"),
    ("VSS", "SEAT"),
    ("WA1", "Audi"),
    ("WAU", "Audi"),
    ("WBA", "BMW"),
    ("WBS", "BMW M"),
    ("WBY", "BMW"),
    ("WDB", "Mercedes-Benz"),
    ("WDD", "Mercedes-Benz"),
    ("WF0", "Ford Germany"),
    ("WMW", "MINI"),
    ("WP0", "Porsche"),
    ("WP1", "Porsche"),
    ("WVW", "Volkswagen"),
    ("WV1", "Volkswagen Commercial Vehicles"),
    ("WV2", "Volkswagen Commercial Vehicles"),
    ("YS3", "Saab"),
    ("YV1", "Volvo"),
    ("YV4", "Volvo"),
    ("ZAM", "Maserati"),
    ("ZAR", "Alfa Romeo"),
    ("ZFA", "Fiat"),
    ("ZFF", "Ferrari"),
    ("ZHW", "Lamborghini"),
];

/// Manufacturer name for a three-character WMI, if known.
pub fn manufacturer(wmi: &str) -> Option<&'static str> {
    MANUFACTURERS
        .iter()
        .find(|(code, _)| *code == wmi)
        .map(|(_, name)| *name)
}

/// Country for the first two VIN characters, if the range is assigned.
pub fn country(first: char, second: char) -> Option<&'static str> {
    let rank = alphabet_rank(second)?;
    COUNTRIES
        .iter()
        .find(|(lead, from, to, _)| {
            *lead == first
                && matches!(
                    (alphabet_rank(*from), alphabet_rank(*to)),
                    (Some(lo), Some(hi)) if (lo..=hi).contains(&rank)
                )
        })
        .map(|(_, _, _, name)| *name)
}

/// Position of a character in the WMI range ordering `A..Z, 1..9, 0`.
fn alphabet_rank(c: char) -> Option<u8> {
    match c {
        'A'..='Z' => Some(c as u8 - b'A'),
        '1'..='9' => Some(26 + (c as u8 - b'1')),
        '0' => Some(35),
        _ => None,
    }
}
