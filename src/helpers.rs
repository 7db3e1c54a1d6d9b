use std::fs::File;
use std::io::Read;
use std::path::Path;

use nalgebra::Vector3;
use yaml_rust::{Yaml, YamlLoader};

use crate::scene::SceneError;

pub fn load_yaml_file(path: &Path) -> Result<Yaml, SceneError> {
    let mut file = File::open(path).map_err(|source| SceneError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|source| SceneError::Io {
            path: path.display().to_string(),
            source,
        })?;

    load_yaml_str(&contents)
}

/// First document of `contents`, an empty mapping for empty input.
pub fn load_yaml_str(contents: &str) -> Result<Yaml, SceneError> {
    let mut documents = YamlLoader::load_from_str(contents)?;

    if documents.is_empty() {
        return Ok(Yaml::Hash(Default::default()));
    }

    Ok(documents.swap_remove(0))
}

pub fn yaml_into_f64(yaml: &Yaml, key: &str) -> Result<f64, SceneError> {
    match yaml {
        Yaml::Real(_) => yaml
            .as_f64()
            .ok_or_else(|| SceneError::InvalidValue(key.to_string())),
        Yaml::Integer(i) => Ok(*i as f64),
        Yaml::BadValue => Err(SceneError::MissingKey(key.to_string())),
        _ => Err(SceneError::InvalidValue(key.to_string())),
    }
}

pub fn yaml_into_u32(yaml: &Yaml, key: &str) -> Result<u32, SceneError> {
    match yaml {
        Yaml::Integer(i) => {
            u32::try_from(*i).map_err(|_| SceneError::InvalidValue(key.to_string()))
        }
        Yaml::BadValue => Err(SceneError::MissingKey(key.to_string())),
        _ => Err(SceneError::InvalidValue(key.to_string())),
    }
}

pub fn yaml_array_into_vector3(yaml: &Yaml, key: &str) -> Result<Vector3<f64>, SceneError> {
    let array = match yaml {
        Yaml::Array(array) => array,
        Yaml::BadValue => return Err(SceneError::MissingKey(key.to_string())),
        _ => return Err(SceneError::InvalidValue(key.to_string())),
    };

    if array.len() != 3 {
        return Err(SceneError::InvalidValue(key.to_string()));
    }

    Ok(Vector3::new(
        yaml_into_f64(&array[0], key)?,
        yaml_into_f64(&array[1], key)?,
        yaml_into_f64(&array[2], key)?,
    ))
}

/// Like the conversions above, but a missing key yields `default`.
pub fn or_default<T>(result: Result<T, SceneError>, default: T) -> Result<T, SceneError> {
    match result {
        Err(SceneError::MissingKey(_)) => Ok(default),
        result => result,
    }
}
