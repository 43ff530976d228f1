use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::GenError;

/// Deserialize router metadata with JSON-path context in error messages.
pub fn metadata_from_str<T: DeserializeOwned>(src: &str, path: &Path) -> Result<T, GenError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let json_path = err.path().to_string();
            Err(GenError::Metadata {
                path: path.to_path_buf(),
                message: format!("at JSON path {json_path} → {}", err.into_inner()),
            })
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
