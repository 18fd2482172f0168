//! Serialization capabilities for data models.
//!
//! A data model names the type that serializes it through [`DataModel`]. That
//! type opts into formats by implementing [`ToRdf`], [`ToXml`] and/or
//! [`ToJson`]; asking for a format the model does not support is a compile
//! error rather than a missing method at runtime.
//!
//! ```
//! use apidoc_from_routes::serializers::{self, DataModel, Scope, SerdeJson};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Allergy {
//!     name: String,
//! }
//!
//! impl DataModel for Allergy {
//!     type Serializers = SerdeJson;
//! }
//!
//! let items = vec![Allergy { name: "penicillin".to_string() }];
//! let json = serializers::to_json(&items, 1, &Scope::default()).unwrap();
//! assert!(json.contains("penicillin"));
//! ```

use crate::error::Result;
use serde::Serialize;

/// Where a serialized result set came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scope<'a> {
    /// Record the items belong to, if any
    pub record: Option<&'a str>,
    /// Carenet the items were read through, if any
    pub carenet: Option<&'a str>,
}

/// A type whose collections can be serialized by `Self::Serializers`.
pub trait DataModel: Sized {
    type Serializers;
}

/// Formats items as an RDF/XML document.
pub trait ToRdf<M> {
    fn to_rdf(items: &[M], result_count: usize, scope: &Scope) -> Result<String>;
}

/// Formats items as an XML document.
pub trait ToXml<M> {
    fn to_xml(items: &[M], result_count: usize, scope: &Scope) -> Result<String>;
}

/// Formats items as a JSON document.
pub trait ToJson<M> {
    fn to_json(items: &[M], result_count: usize, scope: &Scope) -> Result<String>;
}

/// Serializes `items` as RDF/XML.
///
/// Only models whose serializers implement [`ToRdf`] can call this. A model
/// that only carries [`SerdeJson`] is rejected at compile time:
///
/// ```compile_fail
/// use apidoc_from_routes::serializers::{self, DataModel, Scope, SerdeJson};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Allergy {
///     name: String,
/// }
///
/// impl DataModel for Allergy {
///     type Serializers = SerdeJson;
/// }
///
/// let items = vec![Allergy { name: "penicillin".to_string() }];
/// serializers::to_rdf(&items, 1, &Scope::default()).unwrap();
/// ```
pub fn to_rdf<M>(items: &[M], result_count: usize, scope: &Scope) -> Result<String>
where
    M: DataModel,
    M::Serializers: ToRdf<M>,
{
    <M::Serializers as ToRdf<M>>::to_rdf(items, result_count, scope)
}

pub fn to_xml<M>(items: &[M], result_count: usize, scope: &Scope) -> Result<String>
where
    M: DataModel,
    M::Serializers: ToXml<M>,
{
    <M::Serializers as ToXml<M>>::to_xml(items, result_count, scope)
}

pub fn to_json<M>(items: &[M], result_count: usize, scope: &Scope) -> Result<String>
where
    M: DataModel,
    M::Serializers: ToJson<M>,
{
    <M::Serializers as ToJson<M>>::to_json(items, result_count, scope)
}

/// JSON capability for any `Serialize` model.
///
/// Output is a pretty-printed envelope:
/// `{"result_count": n, "record": .., "carenet": .., "items": [..]}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJson;

#[derive(Serialize)]
struct Envelope<'a, M> {
    result_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    carenet: Option<&'a str>,
    items: &'a [M],
}

impl<M: Serialize> ToJson<M> for SerdeJson {
    fn to_json(items: &[M], result_count: usize, scope: &Scope) -> Result<String> {
        let envelope = Envelope {
            result_count,
            record: scope.record,
            carenet: scope.carenet,
            items,
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Serialize)]
    struct Allergy {
        name: String,
        reaction: String,
    }

    struct AllergySerializers;

    const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    impl DataModel for Allergy {
        type Serializers = AllergySerializers;
    }

    impl ToXml<Allergy> for AllergySerializers {
        fn to_xml(items: &[Allergy], result_count: usize, scope: &Scope) -> Result<String> {
            let mut out = format!(
                "<Allergies resultCount=\"{}\" record=\"{}\">",
                result_count,
                scope.record.unwrap_or("")
            );
            for item in items {
                out.push_str(&format!(
                    "<Allergy name=\"{}\" reaction=\"{}\"/>",
                    item.name, item.reaction
                ));
            }
            out.push_str("</Allergies>");
            Ok(out)
        }
    }

    impl ToRdf<Allergy> for AllergySerializers {
        fn to_rdf(items: &[Allergy], result_count: usize, _scope: &Scope) -> Result<String> {
            let mut out = format!(
                "<rdf:RDF xmlns:rdf=\"{}\"><Allergies count=\"{}\">",
                RDF_NS, result_count
            );
            for item in items {
                out.push_str(&format!(
                    "<rdf:Description><name>{}</name><reaction>{}</reaction></rdf:Description>",
                    item.name, item.reaction
                ));
            }
            out.push_str("</Allergies></rdf:RDF>");
            Ok(out)
        }
    }

    impl ToJson<Allergy> for AllergySerializers {
        fn to_json(items: &[Allergy], result_count: usize, scope: &Scope) -> Result<String> {
            SerdeJson::to_json(items, result_count, scope)
        }
    }

    fn allergies() -> Vec<Allergy> {
        vec![Allergy {
            name: "penicillin".to_string(),
            reaction: "hives".to_string(),
        }]
    }

    #[test]
    fn test_model_specific_xml() {
        let scope = Scope {
            record: Some("rec-1"),
            carenet: None,
        };
        let xml = to_xml(&allergies(), 1, &scope).unwrap();
        assert_eq!(
            xml,
            concat!(
                "<Allergies resultCount=\"1\" record=\"rec-1\">",
                "<Allergy name=\"penicillin\" reaction=\"hives\"/>",
                "</Allergies>"
            )
        );
    }

    #[test]
    fn test_model_specific_rdf() {
        let rdf = to_rdf(&allergies(), 1, &Scope::default()).unwrap();
        assert!(rdf.starts_with(
            "<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">"
        ));
        assert!(rdf.contains("<Allergies count=\"1\">"));
        assert!(rdf.contains("<name>penicillin</name><reaction>hives</reaction>"));
        assert!(rdf.ends_with("</Allergies></rdf:RDF>"));
    }

    #[test]
    fn test_one_model_supports_every_format() {
        let scope = Scope::default();
        let items = allergies();
        assert!(to_rdf(&items, 1, &scope).unwrap().contains("penicillin"));
        assert!(to_xml(&items, 1, &scope).unwrap().contains("penicillin"));
        assert!(to_json(&items, 1, &scope).unwrap().contains("penicillin"));
    }

    #[test]
    fn test_json_envelope() {
        let scope = Scope {
            record: None,
            carenet: Some("family"),
        };
        let json = to_json(&allergies(), 7, &scope).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["result_count"], 7);
        assert_eq!(parsed["carenet"], "family");
        assert!(parsed.get("record").is_none());
        assert_eq!(parsed["items"][0]["reaction"], "hives");
    }

    #[test]
    fn test_json_empty_result_set() {
        let items: Vec<Allergy> = Vec::new();
        let json = to_json(&items, 0, &Scope::default()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["items"], serde_json::json!([]));
    }
}
