// src/models.rs
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::WhaleError;

pub type SightingId = i64;

/// Species as encoded by the sightings API (integer codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Species {
    Orca,
    Humpback,
    Minke,
    GrayWhale,
    FinWhale,
    BlueWhale,
    HarbourPorpoise,
    DallsPorpoise,
    PacificWhiteSidedDolphin,
    CaliforniaSeaLion,
    StellerSeaLion,
    HarbourSeal,
    Other,
}

impl Species {
    pub const ALL: [Species; 13] = [
        Species::Orca,
        Species::Humpback,
        Species::Minke,
        Species::GrayWhale,
        Species::FinWhale,
        Species::BlueWhale,
        Species::HarbourPorpoise,
        Species::DallsPorpoise,
        Species::PacificWhiteSidedDolphin,
        Species::CaliforniaSeaLion,
        Species::StellerSeaLion,
        Species::HarbourSeal,
        Species::Other,
    ];

    /// Text shown on sighting cards
    pub fn display_text(self) -> &'static str {
        match self {
            Species::Orca => "orca",
            Species::Humpback => "humpback",
            Species::Minke => "minke",
            Species::GrayWhale => "gray whale",
            Species::FinWhale => "fin whale",
            Species::BlueWhale => "blue whale",
            Species::HarbourPorpoise => "harbour porpoise",
            Species::DallsPorpoise => "dall's porpoise",
            Species::PacificWhiteSidedDolphin => "pacific white-sided dolphin",
            Species::CaliforniaSeaLion => "california sea lion",
            Species::StellerSeaLion => "steller sea lion",
            Species::HarbourSeal => "harbour seal",
            Species::Other => "other",
        }
    }

    /// File stem of the species image under the assets directory
    pub fn image_slug(self) -> &'static str {
        match self {
            Species::Orca => "orca",
            Species::Humpback => "humpback",
            Species::Minke => "minke",
            Species::GrayWhale => "gray-whale",
            Species::FinWhale => "fin-whale",
            Species::BlueWhale => "blue-whale",
            Species::HarbourPorpoise => "harbour-porpoise",
            Species::DallsPorpoise => "dalls-porpoise",
            Species::PacificWhiteSidedDolphin => "pacific-white-sided-dolphin",
            Species::CaliforniaSeaLion => "california-sea-lion",
            Species::StellerSeaLion => "steller-sea-lion",
            Species::HarbourSeal => "harbour-seal",
            Species::Other => "other",
        }
    }
}

impl TryFrom<u8> for Species {
    type Error = WhaleError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Species::ALL
            .get(code as usize)
            .copied()
            .ok_or(WhaleError::UnknownSpecies { code })
    }
}

impl From<Species> for u8 {
    fn from(species: Species) -> Self {
        species as u8
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

/// Orca ecotype, only set on orca sightings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OrcaType {
    SouthernResident,
    Transient,
    Offshore,
    NorthernResident,
}

impl OrcaType {
    pub const ALL: [OrcaType; 4] = [
        OrcaType::SouthernResident,
        OrcaType::Transient,
        OrcaType::Offshore,
        OrcaType::NorthernResident,
    ];

    pub fn display_text(self) -> &'static str {
        match self {
            OrcaType::SouthernResident => "Southern Resident",
            OrcaType::Transient => "Bigg's (Transient)",
            OrcaType::Offshore => "Offshore",
            OrcaType::NorthernResident => "Northern Resident",
        }
    }
}

impl TryFrom<u8> for OrcaType {
    type Error = WhaleError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        OrcaType::ALL
            .get(code as usize)
            .copied()
            .ok_or(WhaleError::UnknownOrcaType { code })
    }
}

impl From<OrcaType> for u8 {
    fn from(orca_type: OrcaType) -> Self {
        orca_type as u8
    }
}

/// One reported sighting as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sighting {
    pub id: SightingId,
    /// ISO-8601 timestamp
    pub sighted_at: String,
    pub species: Species,
    pub quantity: u32,
    pub location: String,
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub orca_type: Option<OrcaType>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub orca_pod: String,
    pub confirmed: bool,
    pub username: String,
}

impl Sighting {
    /// Date part of `sighted_at`, formatted as `YYYY/MM/DD`
    pub fn sighted_on(&self) -> String {
        self.sighted_at
            .split('T')
            .next()
            .unwrap_or_default()
            .replace('-', "/")
    }

    pub fn is_pending(&self) -> bool {
        !self.confirmed
    }

    /// Orca type only accompanies orca sightings
    pub fn is_consistent(&self) -> bool {
        self.orca_type.is_none() || self.species == Species::Orca
    }

    pub fn shows_orca_type(&self) -> bool {
        self.species == Species::Orca
    }

    pub fn shows_orca_pod(&self) -> bool {
        self.orca_type == Some(OrcaType::SouthernResident)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub sightings_count: u32,
}

impl User {
    pub fn rank(&self) -> Rank {
        Rank::from_sightings_count(self.sightings_count)
    }

    /// Generated avatar for the profile header
    pub fn avatar_url(&self) -> String {
        format!(
            "https://robohash.org/{}?set=any&bgset=any",
            urlencoding::encode(&self.username)
        )
    }
}

/// Reporter tier derived from the number of sightings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Rank {
    #[default]
    Newbie,
    Intermediate,
    Advanced,
    Master,
}

impl Rank {
    pub fn from_sightings_count(count: u32) -> Self {
        match count {
            0 => Rank::Newbie,
            1..=2 => Rank::Intermediate,
            3..=6 => Rank::Advanced,
            _ => Rank::Master,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Newbie => "Newbie",
            Rank::Intermediate => "Intermediate",
            Rank::Advanced => "Advanced",
            Rank::Master => "Master",
        }
    }

    /// Trophy image file name under the assets directory
    pub fn trophy_image(self) -> &'static str {
        match self {
            Rank::Newbie => "trophies/newbie.png",
            Rank::Intermediate => "trophies/intermediate.png",
            Rank::Advanced => "trophies/advanced.png",
            Rank::Master => "trophies/master.png",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
