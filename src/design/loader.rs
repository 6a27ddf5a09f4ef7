use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::design::node_model::{DesignFile, RawNode};
use crate::error::ExtractError;

/// Read a design file from disk. See [`document_from_value`].
pub fn load_design_file(path: impl AsRef<Path>) -> Result<DesignFile, ExtractError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let value = parse_json(&content).map_err(|source| ExtractError::JsonParse {
        context: path.display().to_string(),
        source,
    })?;

    document_from_value(value)
}

/// Parse JSON text of any nesting depth.
///
/// Design trees can nest far deeper than serde_json's default limit of 128;
/// depth is bounded later by the tree parser, not here.
pub fn parse_json(content: &str) -> Result<Value, serde_json::Error> {
    let mut json = serde_json::Deserializer::from_str(content);
    json.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    Ok(value)
}

/// Accept either a full file response (`{"document": ...}`) or a bare node
/// tree (`{"type": ..., "children": [...]}`).
pub fn document_from_value(value: Value) -> Result<DesignFile, ExtractError> {
    let Some(object) = value.as_object() else {
        return Err(ExtractError::MissingDocument(
            "top-level JSON is not an object".to_string(),
        ));
    };

    if object.contains_key("document") {
        return serde_json::from_value(value).map_err(|source| ExtractError::JsonParse {
            context: "design file".to_string(),
            source,
        });
    }

    if object.contains_key("type") {
        let document: RawNode =
            serde_json::from_value(value).map_err(|source| ExtractError::JsonParse {
                context: "design node".to_string(),
                source,
            })?;
        return Ok(DesignFile {
            name: document.name.clone(),
            document,
            ..DesignFile::default()
        });
    }

    Err(ExtractError::MissingDocument(
        "expected a \"document\" or \"type\" key".to_string(),
    ))
}
