//! Opaque blob framing and garden snapshots.
//!
//! Every blob is four magic bytes followed by a bincode payload of
//! `(SchemaVersion, T)`. Garden snapshots are plain data so an external save
//! system can persist them however it likes; the binary encoding here is one
//! option.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use verdant_common::{BlobError, BlobResult, MagicBytes, PlantId, PlotId, SchemaVersion};

use crate::plants::GrowthStage;
use crate::time::GameTimestamp;

/// Encode a payload behind magic bytes and a schema version.
pub fn encode_blob<T: Serialize>(
    magic: MagicBytes,
    version: SchemaVersion,
    payload: &T,
) -> BlobResult<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.extend_from_slice(magic.bytes());

    let data = bincode::serialize(&(version, payload))
        .map_err(|e| BlobError::Serialization(e.to_string()))?;
    buffer.extend(data);

    Ok(buffer)
}

/// Decode a payload written by [`encode_blob`].
pub fn decode_blob<T: DeserializeOwned>(
    bytes: &[u8],
    magic: MagicBytes,
    expected: SchemaVersion,
) -> BlobResult<T> {
    if bytes.len() < 4 || bytes[0..4] != *magic.bytes() {
        return Err(BlobError::InvalidFormat);
    }

    let (found, payload): (SchemaVersion, T) =
        bincode::deserialize(&bytes[4..]).map_err(|e| BlobError::Corrupted(e.to_string()))?;

    if !expected.can_read(&found) {
        return Err(BlobError::VersionMismatch {
            expected: expected.to_string(),
            actual: found.to_string(),
        });
    }

    Ok(payload)
}

/// Persistent fields of a live plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSnapshot {
    /// Catalog ID of the plant
    pub plant_id: PlantId,
    /// When the seed was planted
    pub planted_at: GameTimestamp,
    /// Stage at the time of the snapshot
    pub stage: GrowthStage,
    /// Harvests performed so far
    pub times_harvested: u32,
    /// Last growth recalculation
    pub last_growth_update: GameTimestamp,
}

/// Persistent fields of a plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSnapshot {
    /// Plot ID
    pub id: PlotId,
    /// Live plant, if any
    pub plant: Option<PlantSnapshot>,
    /// Watered flag
    pub watered: bool,
    /// Last watering time
    pub last_watered_at: Option<GameTimestamp>,
}

/// All plots of a garden.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GardenSnapshot {
    /// Plot snapshots in registry order
    pub plots: Vec<PlotSnapshot>,
}

impl GardenSnapshot {
    /// Serializes to the framed binary format.
    pub fn to_bytes(&self) -> BlobResult<Vec<u8>> {
        encode_blob(MagicBytes::GARDEN, SchemaVersion::GARDEN_SNAPSHOT, self)
    }

    /// Deserializes from the framed binary format.
    pub fn from_bytes(bytes: &[u8]) -> BlobResult<Self> {
        decode_blob(bytes, MagicBytes::GARDEN, SchemaVersion::GARDEN_SNAPSHOT)
    }
}
