use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Static configuration for one celestial object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDescriptor {
    pub name: String,
    /// Path of the 3D model this body is rendered with.
    pub asset: String,
    /// Orbital distance from the system center, in world units. Zero marks
    /// the central body.
    pub distance: f64,
    pub scale: f32,
    /// Angular speed of the orbit; zero for the central body.
    pub speed: f64,
}

impl BodyDescriptor {
    pub fn is_central(&self) -> bool {
        self.distance == 0.0
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("could not read registry file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: missing field {field}")]
    MissingField { line: usize, field: &'static str },
    #[error("line {line}: field {field} is not a number")]
    BadNumber { line: usize, field: &'static str },
    #[error("registry has no central body (exactly one body must have distance 0)")]
    NoCentralBody,
    #[error("registry has more than one central body: {0} and {1}")]
    ExtraCentralBody(String, String),
    #[error("body {0} has a non-positive scale")]
    BadScale(String),
    #[error("body {0} has a negative distance or speed")]
    NegativeParameter(String),
}

/// The validated set of descriptors the scene is composed from.
#[derive(Debug, Clone)]
pub struct Registry {
    bodies: Vec<BodyDescriptor>,
}

impl Registry {
    /// Validates and wraps a descriptor list: distances and speeds must be
    /// non-negative, scales positive, and exactly one body central.
    pub fn new(bodies: Vec<BodyDescriptor>) -> Result<Self, RegistryError> {
        let mut central: Option<&BodyDescriptor> = None;
        for body in bodies.iter() {
            if body.distance < 0.0 || body.speed < 0.0 {
                return Err(RegistryError::NegativeParameter(body.name.clone()));
            }
            if !(body.scale > 0.0) {
                return Err(RegistryError::BadScale(body.name.clone()));
            }
            if body.is_central() {
                if let Some(first) = central {
                    return Err(RegistryError::ExtraCentralBody(
                        first.name.clone(),
                        body.name.clone(),
                    ));
                }
                central = Some(body);
            }
        }
        if central.is_none() {
            return Err(RegistryError::NoCentralBody);
        }
        Ok(Registry { bodies })
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &BodyDescriptor> {
        self.bodies.iter()
    }

    /// The body everything else orbits around.
    pub fn central(&self) -> &BodyDescriptor {
        self.bodies
            .iter()
            .find(|b| b.is_central())
            .expect("validated at construction")
    }

    /// Every body except the central one, in registry order. Order carries
    /// no meaning; bodies animate independently and are keyed by name.
    pub fn orbiting(&self) -> impl Iterator<Item = &BodyDescriptor> {
        self.bodies.iter().filter(|b| !b.is_central())
    }

    pub fn find(&self, name: &str) -> Option<&BodyDescriptor> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// The built-in solar system.
    pub fn default_system() -> Self {
        let table: [(&str, &str, f64, f32, f64); 9] = [
            ("Sun", "assets/sun.obj", 0.0, 8.0, 0.0),
            ("Mercury", "assets/mercury.obj", 10.0, 1.2, 0.04),
            ("Venus", "assets/venus.obj", 18.0, 1.5, 0.03),
            ("Earth", "assets/earth.obj", 26.0, 2.0, 0.02),
            ("Mars", "assets/mars.obj", 34.0, 1.8, 0.015),
            ("Jupiter", "assets/jupiter.obj", 50.0, 3.0, 0.01),
            ("Saturn", "assets/saturn.obj", 65.0, 0.01, 0.008),
            ("Uranus", "assets/uranus.obj", 80.0, 2.5, 0.007),
            ("Neptune", "assets/neptune.obj", 95.0, 2.3, 0.006),
        ];
        let bodies = table
            .iter()
            .map(|&(name, asset, distance, scale, speed)| BodyDescriptor {
                name: name.to_owned(),
                asset: asset.to_owned(),
                distance,
                scale,
                speed,
            })
            .collect();
        Registry::new(bodies).expect("built-in registry is valid")
    }
}

/// Wholesale snapshot of a body collection; this is the configuration
/// document shipped to the persistence gateway.
pub fn snapshot(bodies: &[BodyDescriptor]) -> Value {
    serde_json::json!({ "planets": bodies })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(name: &str, distance: f64, speed: f64) -> BodyDescriptor {
        BodyDescriptor {
            name: name.to_owned(),
            asset: format!("assets/{}.obj", name.to_lowercase()),
            distance,
            scale: 1.0,
            speed,
        }
    }

    #[test]
    fn default_system_is_valid() {
        let registry = Registry::default_system();
        assert_eq!(registry.len(), 9);
        assert_eq!(registry.central().name, "Sun");
    }

    #[test]
    fn central_body_is_excluded_from_orbiting() {
        let registry = Registry::default_system();
        assert_eq!(registry.orbiting().count(), registry.len() - 1);
        assert!(registry.orbiting().all(|b| !b.is_central()));
        assert!(registry.orbiting().all(|b| b.name != "Sun"));
    }

    #[test]
    fn registry_requires_a_central_body() {
        let result = Registry::new(vec![body("Mercury", 10.0, 0.04)]);
        assert!(matches!(result, Err(RegistryError::NoCentralBody)));
    }

    #[test]
    fn registry_rejects_two_central_bodies() {
        let result = Registry::new(vec![body("Sun", 0.0, 0.0), body("Nemesis", 0.0, 0.0)]);
        assert!(matches!(result, Err(RegistryError::ExtraCentralBody(_, _))));
    }

    #[test]
    fn registry_rejects_bad_parameters() {
        let mut shrunk = body("Sun", 0.0, 0.0);
        shrunk.scale = 0.0;
        assert!(matches!(
            Registry::new(vec![shrunk]),
            Err(RegistryError::BadScale(_))
        ));

        assert!(matches!(
            Registry::new(vec![body("Sun", 0.0, 0.0), body("Retro", 10.0, -0.01)]),
            Err(RegistryError::NegativeParameter(_))
        ));
    }

    #[test]
    fn find_is_keyed_by_name() {
        let registry = Registry::default_system();
        assert_eq!(registry.find("Earth").unwrap().distance, 26.0);
        assert!(registry.find("Pluto").is_none());
    }

    #[test]
    fn snapshot_holds_the_whole_collection() {
        let bodies = vec![body("Mercury", 10.0, 0.04), body("Venus", 18.0, 0.03)];
        let doc = snapshot(&bodies);
        let planets = doc["planets"].as_array().unwrap();
        assert_eq!(planets.len(), 2);
        assert_eq!(planets[0]["name"], "Mercury");
        assert_eq!(planets[1]["distance"], 18.0);
    }
}
