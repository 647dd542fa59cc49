//! # Directory Reply Parsing
//!
//! Reply shape:
//!
//! ```json
//! {
//!   "mother": { "name": "Hub", "package": "com.example.hub", "version": "3" },
//!   "children": [
//!     { "name": "Maps", "package": "com.example.maps", "version": "1.2",
//!       "entrypoint": "main", "image_url": "https://cdn.example.com/maps.png" }
//!   ]
//! }
//! ```
//!
//! `mother` may be absent or the string `"none"`. A configurable error key,
//! when present, marks the whole reply as a credential rejection regardless
//! of anything else in it.

use super::errors::ParseError;
use serde::Deserialize;
use serde_json::Value;
use shared_types::ModuleRecord;

const CHILDREN: &str = "children";
const MOTHER: &str = "mother";
const NO_MOTHER: &str = "none";

/// A module entry as the directory sends it.
#[derive(Debug, Deserialize)]
struct WireModule {
    name: String,
    package: String,
    version: String,
    #[serde(default)]
    entrypoint: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

impl From<WireModule> for ModuleRecord {
    fn from(wire: WireModule) -> Self {
        Self {
            package: wire.package,
            name: wire.name,
            version: wire.version,
            entry_point: wire.entrypoint,
            image_url: wire.image_url,
            is_mother: false,
        }
    }
}

/// Roster content of a successful reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDirectory {
    /// Parent application, already flagged `is_mother`.
    pub mother: Option<ModuleRecord>,
    /// Child modules in reply order.
    pub children: Vec<ModuleRecord>,
}

impl ParsedDirectory {
    /// Every record to cache: mother first, then the children.
    #[must_use]
    pub fn cache_records(&self) -> Vec<ModuleRecord> {
        self.mother
            .iter()
            .chain(self.children.iter())
            .cloned()
            .collect()
    }
}

/// What the directory said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryReply {
    /// The error key was present. Carries its value for logging.
    Rejected(String),
    Roster(ParsedDirectory),
}

/// Parse a reply body.
///
/// # Errors
///
/// - [`ParseError::Json`] for invalid JSON or a malformed child entry
/// - [`ParseError::MissingChildren`] when the `children` key is absent
/// - [`ParseError::MalformedMother`] when `mother` is neither an entry nor `"none"`
pub fn parse_reply(body: &str, error_field: &str) -> Result<DirectoryReply, ParseError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ParseError::Json(e.to_string()))?;
    let Value::Object(reply) = value else {
        return Err(ParseError::Json("reply is not a JSON object".into()));
    };

    if let Some(reason) = reply.get(error_field) {
        let reason = match reason {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        return Ok(DirectoryReply::Rejected(reason));
    }

    let children = match reply.get(CHILDREN) {
        None => return Err(ParseError::MissingChildren),
        Some(Value::Array(children)) => children,
        Some(_) => return Err(ParseError::Json("children is not an array".into())),
    };

    let mother = match reply.get(MOTHER) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if text == NO_MOTHER => None,
        Some(entry @ Value::Object(_)) => {
            let wire = WireModule::deserialize(entry)
                .map_err(|e| ParseError::MalformedMother(e.to_string()))?;
            Some(ModuleRecord::from(wire).into_mother())
        }
        Some(other) => return Err(ParseError::MalformedMother(other.to_string())),
    };

    let children = children
        .iter()
        .map(|child| {
            WireModule::deserialize(child)
                .map(ModuleRecord::from)
                .map_err(|e| ParseError::Json(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DirectoryReply::Roster(ParsedDirectory { mother, children }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERROR_FIELD: &str = "acas_error";

    fn roster(body: &str) -> ParsedDirectory {
        match parse_reply(body, ERROR_FIELD).unwrap() {
            DirectoryReply::Roster(parsed) => parsed,
            DirectoryReply::Rejected(reason) => panic!("unexpected rejection: {reason}"),
        }
    }

    #[test]
    fn test_full_reply() {
        let parsed = roster(
            r#"{
                "mother": {"name": "Hub", "package": "com.example.hub", "version": "3"},
                "children": [
                    {"name": "A", "package": "com.example.a", "version": "1", "entrypoint": "main"},
                    {"name": "B", "package": "com.example.b", "version": "2", "image_url": "https://x/b.png"}
                ]
            }"#,
        );

        let mother = parsed.mother.as_ref().unwrap();
        assert!(mother.is_mother);
        assert_eq!(mother.package, "com.example.hub");
        assert_eq!(parsed.children.len(), 2);
        assert_eq!(parsed.children[0].entry_point.as_deref(), Some("main"));
        assert_eq!(parsed.children[1].image_url.as_deref(), Some("https://x/b.png"));
        assert!(parsed.children.iter().all(|c| !c.is_mother));
        assert_eq!(parsed.cache_records().len(), 3);
    }

    #[test]
    fn test_mother_none_literal() {
        let parsed = roster(r#"{"mother": "none", "children": []}"#);
        assert!(parsed.mother.is_none());
        assert!(parsed.children.is_empty());
    }

    #[test]
    fn test_error_field_wins() {
        let reply = parse_reply(r#"{"acas_error": "bad key", "children": []}"#, ERROR_FIELD);
        assert_eq!(reply, Ok(DirectoryReply::Rejected("bad key".into())));
    }

    #[test]
    fn test_missing_children() {
        assert_eq!(
            parse_reply(r#"{"mother": "none"}"#, ERROR_FIELD),
            Err(ParseError::MissingChildren)
        );
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(matches!(
            parse_reply("not json", ERROR_FIELD),
            Err(ParseError::Json(_))
        ));
        assert!(matches!(
            parse_reply(r#"{"mother": "someone", "children": []}"#, ERROR_FIELD),
            Err(ParseError::MalformedMother(_))
        ));
        assert!(matches!(
            parse_reply(r#"{"children": [{"name": "no package"}]}"#, ERROR_FIELD),
            Err(ParseError::Json(_))
        ));
    }
}
