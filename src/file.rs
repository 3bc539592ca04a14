use std::fs;
use std::path::Path;

use crate::registry::{BodyDescriptor, Registry, RegistryError};

/// Reads a body registry table from disk.
///
/// The format is one whitespace-separated row per body, header line first:
/// name, asset path, orbital distance, scale, angular speed. The central
/// body carries `-` in the speed column.
pub fn read_registry(path: &Path) -> Result<Registry, RegistryError> {
    parse_registry(&fs::read_to_string(path)?)
}

pub fn parse_registry(text: &str) -> Result<Registry, RegistryError> {
    let mut bodies = vec![];

    // Read lines, skipping header
    for (index, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let lineno = index + 1;
        let mut fields = line.split_ascii_whitespace();

        macro_rules! next_string {
            ($field:expr) => {
                fields.next().ok_or(RegistryError::MissingField {
                    line: lineno,
                    field: $field,
                })?
            };
        }

        macro_rules! next_f64 {
            ($field:expr) => {
                next_string!($field)
                    .parse::<f64>()
                    .map_err(|_| RegistryError::BadNumber {
                        line: lineno,
                        field: $field,
                    })?
            };
        }

        let name = next_string!("name");
        let asset = next_string!("asset");
        let distance = next_f64!("distance");
        let scale = next_f64!("scale") as f32;

        // The central body has no orbit; its speed column is a dash.
        let speed = match next_string!("speed") {
            "-" => 0.0,
            raw => raw.parse::<f64>().map_err(|_| RegistryError::BadNumber {
                line: lineno,
                field: "speed",
            })?,
        };

        bodies.push(BodyDescriptor {
            name: name.to_owned(),
            asset: asset.to_owned(),
            distance,
            scale,
            speed,
        });
    }

    Registry::new(bodies)
}
