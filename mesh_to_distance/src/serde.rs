use core::result::Result;
use std::path::Path;

use super::*;
use ::serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Serde Error type

/// Error type for serialization and deserialization.
#[derive(Debug)]
pub enum SerdeError {
    /// Failed to serialize the data via rmp-serde or serde_json.
    SerializationFailed,
    /// Failed to deserialize the data via rmp-serde.
    DeserializationFailed,
    /// Failed to read or write the file.
    IoError(std::io::Error),
}

impl core::fmt::Display for SerdeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SerializationFailed => write!(f, "failed to serialize the texture"),
            Self::DeserializationFailed => write!(f, "failed to deserialize the texture"),
            Self::IoError(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for SerdeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(e) => Some(e),
            Self::SerializationFailed | Self::DeserializationFailed => None,
        }
    }
}

impl From<std::io::Error> for SerdeError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl From<rmp_serde::encode::Error> for SerdeError {
    fn from(_: rmp_serde::encode::Error) -> Self {
        Self::SerializationFailed
    }
}

impl From<rmp_serde::decode::Error> for SerdeError {
    fn from(_: rmp_serde::decode::Error) -> Self {
        Self::DeserializationFailed
    }
}

impl From<serde_json::Error> for SerdeError {
    fn from(_: serde_json::Error) -> Self {
        Self::SerializationFailed
    }
}

// ----------------------------------------------------------------------------
// Versioning

/// Version of the serialization format.
/// This is used to ensure backward compatibility when deserializing.
#[derive(Serialize)]
enum SerializeVersion<'a> {
    V1(&'a DistanceTexture),
}

/// Version of the deserialization format.
#[derive(Deserialize)]
enum DeserializeVersion {
    V1(DistanceTexture),
}

// ----------------------------------------------------------------------------
// Functions

/// Serialize a texture to a byte array.
fn serialize(texture: &DistanceTexture) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    // Serialize using the latest version
    rmp_serde::to_vec(&SerializeVersion::V1(texture))
}

/// Deserialize a byte array to a texture.
fn deserialize(data: &[u8]) -> Result<DistanceTexture, SerdeError> {
    let versioned: DeserializeVersion = rmp_serde::from_slice(data)?;
    Ok(match versioned {
        DeserializeVersion::V1(texture) => texture,
    })
}

/// Save a texture, with its metadata, to a file.
///
/// ```no_run
/// use mesh_to_distance::*;
/// let mesh: Mesh = Mesh::load_obj("assets/tetrahedron.obj", true)?;
/// let (min, max) = mesh.bounding_box();
/// let grid = Grid::fit_to_bounding_box(&min, &max, 32)?;
/// let texture = generate_texture(&mesh, &grid, &Options::default())?;
///
/// let path = "path/to/texture.bin";
/// save_to_file(&texture, path).expect("Failed to save texture");
/// # Ok::<(), Error>(())
/// ```
pub fn save_to_file<P: AsRef<Path>>(
    texture: &DistanceTexture,
    path: P,
) -> Result<(), SerdeError> {
    std::fs::write(path, serialize(texture)?)?;
    Ok(())
}

/// Read a texture saved with [`save_to_file`].
///
/// ```no_run
/// use mesh_to_distance::*;
/// let path = "path/to/texture.bin";
/// let texture = read_from_file(path).expect("Failed to read texture");
/// let distance = texture.distance(&[0, 0, 0]);
/// ```
pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<DistanceTexture, SerdeError> {
    deserialize(&std::fs::read(path)?)
}

/// Pretty JSON of the metadata of a texture, for tools that read the raw samples.
pub fn metadata_to_json(metadata: &TextureMetadata) -> Result<String, SerdeError> {
    Ok(serde_json::to_string_pretty(metadata)?)
}

// ----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::*;

    fn texture() -> DistanceTexture {
        DistanceTexture {
            metadata: TextureMetadata {
                distance_min: -0.5,
                distance_max: 1.25,
                texture_width: 2,
                texture_height: 3,
                texture_depth: 2,
                bounding_box_min: [-1.0, -1.0, -1.0],
                bounding_box_max: [1.0, 2.0, 1.0],
                mesh_bounding_box_min: [-0.5, -0.5, -0.5],
                mesh_bounding_box_max: [0.5, 1.5, 0.5],
                texture_format: BitDepth::U16,
                normalization: Normalization::Logarithmic,
            },
            data: (0..24).collect(),
        }
    }

    #[test]
    fn test_serde() -> Result<(), SerdeError> {
        let texture = texture();
        let data = serialize(&texture)?;
        let de = deserialize(&data)?;
        assert_eq!(texture, de);
        Ok(())
    }

    #[test]
    fn test_serde_file() -> Result<(), SerdeError> {
        let dir = tempdir()?;
        let file_path = dir.path().join("texture.bin");

        let mesh = crate::mesh::tests::tetrahedron();
        let (min, max) = mesh.bounding_box();
        let grid = Grid::fit_to_bounding_box(&min, &max, 8).unwrap();
        let texture = generate_texture(&mesh, &grid, &Options::default()).unwrap();

        save_to_file(&texture, &file_path)?;
        let de = read_from_file(&file_path)?;
        assert_eq!(texture, de);

        Ok(())
    }

    #[test]
    fn test_invalid_file() -> Result<(), SerdeError> {
        let dir = tempdir()?;
        let file_path = dir.path().join("texture.bin");
        std::fs::write(&file_path, b"not a texture")?;

        assert!(matches!(
            read_from_file(&file_path),
            Err(SerdeError::DeserializationFailed)
        ));
        assert!(matches!(
            read_from_file(dir.path().join("missing.bin")),
            Err(SerdeError::IoError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_metadata_json() -> Result<(), SerdeError> {
        let json = metadata_to_json(&texture().metadata)?;
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["distance_min"], -0.5);
        assert_eq!(value["distance_max"], 1.25);
        assert_eq!(value["texture_width"], 2);
        assert_eq!(value["texture_height"], 3);
        assert_eq!(value["texture_depth"], 2);
        assert_eq!(value["bounding_box_max"][1], 2.0);
        assert_eq!(value["texture_format"], "u16");
        assert_eq!(value["normalization"], "logarithmic");
        Ok(())
    }

    #[test]
    fn test_serde_grid() {
        let grid = Grid::from_bounding_box(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], [7, 8, 9]).unwrap();
        let data = rmp_serde::to_vec(&grid).unwrap();
        let de: Grid<[f32; 3]> = rmp_serde::from_slice(&data).unwrap();
        assert_eq!(grid, de);
    }
}
