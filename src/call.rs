//! API call records and their renderings.
//!
//! A [`CallRecord`] describes one endpoint: its method and path template, the
//! handler serving it, and the free-text documentation attached to it. Records
//! render to a ReST fragment for the docs and to a registry-file fragment that
//! [`CallRegistry::load`](crate::registry::CallRegistry::load) reads back.

use crate::access::AccessRuleLookup;
use crate::error::{Error, Result};
use crate::serializers::{DataModel, SerdeJson};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Parameter name -> description. Sorted, so renderings are stable.
pub type ParamMap = BTreeMap<String, String>;

/// Field name -> (key -> default text).
///
/// For mapping fields the inner key is the parameter name. For scalar fields
/// the inner key is the field's own name, e.g. `description.description`.
pub type DefaultMaps = BTreeMap<String, ParamMap>;

const DOC_INDENT: usize = 3;

/// Plain scalars the YAML core schema resolves to null or booleans.
const YAML_KEYWORDS: &[&str] = &[
    "null", "Null", "NULL", "true", "True", "TRUE", "false", "False", "FALSE",
];

/// HTTP methods a route can be served on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "OPTIONS" => Ok(HttpMethod::Options),
            "HEAD" => Ok(HttpMethod::Head),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

/// Symbol path of the handler serving a route, e.g. `indivo::views::record`.
///
/// The registry file writes handlers unquoted, as symbols, so only
/// `ident(::ident)*` paths are accepted, and no segment may be a YAML keyword
/// (`null`, `true`, `false` in any of their spellings), which would not read
/// back as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HandlerRef(String);

impl HandlerRef {
    pub fn parse(path: &str) -> Result<Self> {
        let valid_segment = |segment: &str| {
            if YAML_KEYWORDS.contains(&segment) {
                return false;
            }
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
                }
                _ => false,
            }
        };

        if path.split("::").all(valid_segment) {
            Ok(Self(path.to_string()))
        } else {
            Err(Error::InvalidHandler(path.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, used as the display name of the call.
    pub fn short_name(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }

    /// Module part of the path, `None` for a bare symbol.
    pub fn module(&self) -> Option<&str> {
        self.0.rsplit_once("::").map(|(module, _)| module)
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HandlerRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HandlerRef {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<HandlerRef> for String {
    fn from(handler: HandlerRef) -> Self {
        handler.0
    }
}

/// Shape of a documentation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single free-text value
    Scalar,
    /// Parameter name -> description
    Mapping,
}

/// Documentation fields of a call that can be defaulted and reconciled.
///
/// Path, method and handler are structural and always come from route
/// discovery, so they are not listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    AccessDoc,
    Description,
    UrlParams,
    QueryOpts,
    DataFields,
}

/// Every documentation field, in rendering order.
pub const FIELDS: &[Field] = &[
    Field::AccessDoc,
    Field::UrlParams,
    Field::QueryOpts,
    Field::DataFields,
    Field::Description,
];

impl Field {
    pub const fn name(self) -> &'static str {
        match self {
            Field::AccessDoc => "access_doc",
            Field::Description => "description",
            Field::UrlParams => "url_params",
            Field::QueryOpts => "query_opts",
            Field::DataFields => "data_fields",
        }
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            Field::AccessDoc | Field::Description => FieldKind::Scalar,
            Field::UrlParams | Field::QueryOpts | Field::DataFields => FieldKind::Mapping,
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        FIELDS.iter().copied().find(|field| field.name() == name)
    }
}

/// Value of a documentation field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Map(ParamMap),
}

/// One API endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    path: String,
    method: HttpMethod,
    handler: HandlerRef,
    /// Who may call the endpoint, derived from the handler's access rule
    pub access_doc: String,
    /// Path template parameters
    pub url_params: ParamMap,
    /// Query string options
    pub query_opts: ParamMap,
    /// Form / body fields
    pub data_fields: ParamMap,
    /// Summary of what the endpoint does
    pub description: String,
}

impl CallRecord {
    /// Creates a record with empty documentation. `access_doc` is looked up
    /// from `rules` and left empty when the handler has no rule.
    pub fn new(
        path: impl Into<String>,
        method: HttpMethod,
        handler: HandlerRef,
        rules: &dyn AccessRuleLookup,
    ) -> Self {
        let access_doc = rules.lookup(&handler).map(|rule| rule.doc).unwrap_or_default();
        Self {
            path: path.into(),
            method,
            handler,
            access_doc,
            url_params: ParamMap::new(),
            query_opts: ParamMap::new(),
            data_fields: ParamMap::new(),
            description: String::new(),
        }
    }

    /// Rebuilds a record from a registry-file descriptor. The access doc is
    /// looked up again rather than trusted from the file.
    pub fn from_descriptor(descriptor: CallDescriptor, rules: &dyn AccessRuleLookup) -> Self {
        Self::new(descriptor.path, descriptor.method, descriptor.handler, rules)
            .with_url_params(descriptor.url_params)
            .with_query_opts(descriptor.query_opts)
            .with_data_fields(descriptor.data_fields)
            .with_description(descriptor.description)
    }

    pub fn with_url_params(mut self, url_params: ParamMap) -> Self {
        self.url_params = url_params;
        self
    }

    pub fn with_query_opts(mut self, query_opts: ParamMap) -> Self {
        self.query_opts = query_opts;
        self
    }

    pub fn with_data_fields(mut self, data_fields: ParamMap) -> Self {
        self.data_fields = data_fields;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    /// Registry key: `"{METHOD} {path}"`.
    pub fn title(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Reassigns the handler and re-derives `access_doc` from its rule.
    pub fn set_handler(&mut self, handler: HandlerRef, rules: &dyn AccessRuleLookup) {
        self.access_doc = rules.lookup(&handler).map(|rule| rule.doc).unwrap_or_default();
        self.handler = handler;
    }

    pub fn scalar(&self, field: Field) -> Option<&String> {
        match field {
            Field::AccessDoc => Some(&self.access_doc),
            Field::Description => Some(&self.description),
            _ => None,
        }
    }

    pub fn mapping(&self, field: Field) -> Option<&ParamMap> {
        match field {
            Field::UrlParams => Some(&self.url_params),
            Field::QueryOpts => Some(&self.query_opts),
            Field::DataFields => Some(&self.data_fields),
            _ => None,
        }
    }

    fn scalar_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::AccessDoc => Some(&mut self.access_doc),
            Field::Description => Some(&mut self.description),
            _ => None,
        }
    }

    fn mapping_mut(&mut self, field: Field) -> Option<&mut ParamMap> {
        match field {
            Field::UrlParams => Some(&mut self.url_params),
            Field::QueryOpts => Some(&mut self.query_opts),
            Field::DataFields => Some(&mut self.data_fields),
            _ => None,
        }
    }

    /// Current value of `field`.
    pub fn field(&self, field: Field) -> FieldValue {
        match field.kind() {
            FieldKind::Scalar => FieldValue::Text(self.scalar(field).cloned().unwrap_or_default()),
            FieldKind::Mapping => FieldValue::Map(self.mapping(field).cloned().unwrap_or_default()),
        }
    }

    /// Replaces `field`. A value of the wrong kind for the field is ignored.
    pub fn set_field(&mut self, field: Field, value: FieldValue) {
        match value {
            FieldValue::Text(text) => {
                if let Some(slot) = self.scalar_mut(field) {
                    *slot = text;
                }
            }
            FieldValue::Map(map) => {
                if let Some(slot) = self.mapping_mut(field) {
                    *slot = map;
                }
            }
        }
    }

    /// Fills empty documentation from `defaults`.
    ///
    /// Mapping fields get per-key defaults for entries whose description is
    /// empty. Scalar fields are replaced by `defaults[field][field]` when empty.
    /// Non-empty values are never touched and no keys are added.
    pub fn apply_defaults(&mut self, defaults: &DefaultMaps) {
        for &field in FIELDS {
            let Some(default_map) = defaults.get(field.name()) else {
                continue;
            };

            match field.kind() {
                FieldKind::Mapping => {
                    if let Some(values) = self.mapping_mut(field) {
                        for (key, value) in values.iter_mut() {
                            if value.is_empty() {
                                if let Some(default) = default_map.get(key) {
                                    *value = default.clone();
                                }
                            }
                        }
                    }
                }
                FieldKind::Scalar => {
                    if let Some(value) = self.scalar_mut(field) {
                        if value.is_empty() {
                            if let Some(default) = default_map.get(field.name()) {
                                *value = default.clone();
                            }
                        }
                    }
                }
            }
        }
    }

    /// Renders the call as a ReST `http` domain directive.
    ///
    /// ```text
    /// .. http:get:: /records/{RECORD_ID}
    ///
    ///    Get basic record information.
    ///
    ///    :shortname: record
    ///    :accesscontrol: The record owner
    ///    :parameter RECORD_ID: the record identifier
    /// ```
    pub fn render_doc_fragment(&self) -> String {
        let mut out = format!(
            ".. http:{}:: {}\n\n",
            self.method.as_str().to_lowercase(),
            self.path
        );

        push_indented(&mut out, DOC_INDENT, DOC_INDENT, &self.description);
        out.push('\n');

        let field_indent = DOC_INDENT * 2;
        push_indented(
            &mut out,
            DOC_INDENT,
            field_indent,
            &format!(":shortname: {}", self.handler.short_name()),
        );
        push_indented(
            &mut out,
            DOC_INDENT,
            field_indent,
            &format!(":accesscontrol: {}", self.access_doc),
        );

        let groups = [
            ("parameter", &self.url_params),
            ("queryparameter", &self.query_opts),
            ("formparameter", &self.data_fields),
        ];
        for (label, params) in groups {
            for (name, description) in params {
                push_indented(
                    &mut out,
                    DOC_INDENT,
                    field_indent,
                    &format!(":{} {}: {}", label, name, description),
                );
            }
        }

        out
    }

    /// Renders the call as an entry of the registry file's `calls` list.
    ///
    /// The handler is written unquoted: it names a symbol, and
    /// [`CallRegistry::load`](crate::registry::CallRegistry::load) checks
    /// that its module is listed in the file's `imports`.
    pub fn render_source_fragment(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("  - method: {}\n", quote(self.method.as_str())));
        out.push_str(&format!("    path: {}\n", quote(&self.path)));
        out.push_str(&format!("    handler: {}\n", self.handler));
        out.push_str(&format!("    access_doc: {}\n", quote(&self.access_doc)));
        for field in [Field::UrlParams, Field::QueryOpts, Field::DataFields] {
            let params = self.mapping(field).cloned().unwrap_or_default();
            out.push_str(&render_source_map(field.name(), &params));
        }
        out.push_str(&format!("    description: {}\n", quote(&self.description)));
        out
    }
}

impl Serialize for CallRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("CallRecord", 10)?;
        state.serialize_field("title", &self.title())?;
        state.serialize_field("method", &self.method)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("handler", &self.handler)?;
        state.serialize_field("shortname", self.handler.short_name())?;
        state.serialize_field("access_doc", &self.access_doc)?;
        state.serialize_field("url_params", &self.url_params)?;
        state.serialize_field("query_opts", &self.query_opts)?;
        state.serialize_field("data_fields", &self.data_fields)?;
        state.serialize_field("description", &self.description)?;
        state.end()
    }
}

impl DataModel for CallRecord {
    type Serializers = SerdeJson;
}

/// A call as stored in the registry file.
///
/// Missing maps and descriptions, and `null` descriptions, read as empty.
#[derive(Debug, Clone, Deserialize)]
pub struct CallDescriptor {
    pub method: HttpMethod,
    pub path: String,
    pub handler: HandlerRef,
    #[serde(default, deserialize_with = "param_map_or_empty")]
    pub url_params: ParamMap,
    #[serde(default, deserialize_with = "param_map_or_empty")]
    pub query_opts: ParamMap,
    #[serde(default, deserialize_with = "param_map_or_empty")]
    pub data_fields: ParamMap,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub description: String,
}

fn text_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn param_map_or_empty<'de, D>(deserializer: D) -> std::result::Result<ParamMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<String>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.unwrap_or_default()))
        .collect())
}

/// Double-quoted scalar. JSON string escapes are valid YAML escapes.
fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

fn render_source_map(name: &str, params: &ParamMap) -> String {
    if params.is_empty() {
        return format!("    {}: {{}}\n", name);
    }

    let mut out = format!("    {}:\n", name);
    for (key, value) in params {
        out.push_str(&format!("      {}: {}\n", quote(key), quote(value)));
    }
    out
}

/// Appends `text` at `indent`, continuation lines at `continuation`.
/// Blank lines carry no trailing whitespace.
fn push_indented(out: &mut String, indent: usize, continuation: usize, text: &str) {
    let mut width = indent;
    let mut lines = text.lines().peekable();
    if lines.peek().is_none() {
        out.push('\n');
        return;
    }
    for line in lines {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{:width$}{}\n", "", line, width = width));
        }
        width = continuation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{AccessRule, NoAccessRules};
    use pretty_assertions::assert_eq;

    fn handler(path: &str) -> HandlerRef {
        HandlerRef::parse(path).unwrap()
    }

    fn params(entries: &[(&str, &str)]) -> ParamMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn record_call() -> CallRecord {
        CallRecord::new(
            "/records/{RECORD_ID}",
            HttpMethod::Get,
            handler("indivo::views::record"),
            &NoAccessRules,
        )
        .with_url_params(params(&[("RECORD_ID", "the record identifier")]))
        .with_query_opts(params(&[("offset", "offset number"), ("limit", "limit number")]))
        .with_description("Get basic record information.")
    }

    #[test]
    fn test_http_method_parsing() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!(matches!(
            "FETCH".parse::<HttpMethod>(),
            Err(Error::InvalidMethod(_))
        ));
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
    }

    #[test]
    fn test_handler_ref_validation() {
        let h = handler("indivo::views::record");
        assert_eq!(h.short_name(), "record");
        assert_eq!(h.module(), Some("indivo::views"));

        let bare = handler("serve");
        assert_eq!(bare.short_name(), "serve");
        assert_eq!(bare.module(), None);

        for bad in [
            "",
            "views::",
            "1views::x",
            "views.record",
            "views::re cord",
            "a:::b",
            "null",
            "True",
            "views::FALSE",
        ] {
            assert!(HandlerRef::parse(bad).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_title_follows_method_and_path() {
        let call = record_call();
        assert_eq!(call.title(), "GET /records/{RECORD_ID}");
    }

    #[test]
    fn test_access_doc_derived_from_handler() {
        let rules = |h: &HandlerRef| {
            (h.short_name() == "record").then(|| AccessRule::new("The record owner"))
        };
        let mut call = CallRecord::new(
            "/records/",
            HttpMethod::Get,
            handler("views::record"),
            &rules,
        );
        assert_eq!(call.access_doc, "The record owner");

        call.set_handler(handler("views::record_list"), &rules);
        assert_eq!(call.access_doc, "");
        assert_eq!(call.handler().as_str(), "views::record_list");
    }

    #[test]
    fn test_field_table() {
        assert_eq!(Field::from_name("url_params"), Some(Field::UrlParams));
        assert_eq!(Field::from_name("path"), None);
        assert_eq!(Field::Description.kind(), FieldKind::Scalar);
        assert_eq!(Field::DataFields.kind(), FieldKind::Mapping);
        for &field in FIELDS {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
    }

    #[test]
    fn test_set_field_ignores_wrong_kind() {
        let mut call = record_call();
        call.set_field(Field::Description, FieldValue::Map(ParamMap::new()));
        assert_eq!(call.description, "Get basic record information.");

        call.set_field(Field::Description, FieldValue::Text("new".to_string()));
        assert_eq!(call.field(Field::Description), FieldValue::Text("new".to_string()));
    }

    #[test]
    fn test_apply_defaults_fills_only_empty_values() {
        let mut call = CallRecord::new(
            "/records/{RECORD_ID}/documents/{DOCUMENT_ID}",
            HttpMethod::Get,
            handler("views::document"),
            &NoAccessRules,
        )
        .with_url_params(params(&[("RECORD_ID", ""), ("DOCUMENT_ID", "hand written")]));

        let mut defaults = DefaultMaps::new();
        defaults.insert(
            "url_params".to_string(),
            params(&[
                ("RECORD_ID", "the record identifier"),
                ("DOCUMENT_ID", "the document identifier"),
                ("APP_ID", "the app identifier"),
            ]),
        );
        defaults.insert(
            "description".to_string(),
            params(&[("description", "Undocumented call.")]),
        );

        call.apply_defaults(&defaults);

        assert_eq!(call.url_params["RECORD_ID"], "the record identifier");
        assert_eq!(call.url_params["DOCUMENT_ID"], "hand written");
        assert!(!call.url_params.contains_key("APP_ID"));
        assert_eq!(call.description, "Undocumented call.");

        call.description = "Fetch a document.".to_string();
        call.apply_defaults(&defaults);
        assert_eq!(call.description, "Fetch a document.");
    }

    #[test]
    fn test_render_doc_fragment() {
        let rules = |_: &HandlerRef| Some(AccessRule::new("The record owner"));
        let call = CallRecord::new(
            "/records/{RECORD_ID}",
            HttpMethod::Get,
            handler("indivo::views::record"),
            &rules,
        )
        .with_url_params(params(&[("RECORD_ID", "the record identifier")]))
        .with_query_opts(params(&[("offset", "offset number"), ("limit", "limit number")]))
        .with_data_fields(params(&[("label", "the label")]))
        .with_description("Get basic record information.");

        let expected = "\
.. http:get:: /records/{RECORD_ID}

   Get basic record information.

   :shortname: record
   :accesscontrol: The record owner
   :parameter RECORD_ID: the record identifier
   :queryparameter limit: limit number
   :queryparameter offset: offset number
   :formparameter label: the label
";
        assert_eq!(call.render_doc_fragment(), expected);
    }

    #[test]
    fn test_render_doc_fragment_multiline_description() {
        let call = CallRecord::new(
            "/version",
            HttpMethod::Get,
            handler("views::get_version"),
            &NoAccessRules,
        )
        .with_description("Get the server version.\n\nNo authentication required.");

        let doc = call.render_doc_fragment();
        assert!(doc.contains("   Get the server version.\n\n   No authentication required.\n"));
        assert!(doc.contains("   :accesscontrol: \n"));
    }

    #[test]
    fn test_render_source_fragment() {
        let call = record_call();
        let expected = r#"  - method: "GET"
    path: "/records/{RECORD_ID}"
    handler: indivo::views::record
    access_doc: ""
    url_params:
      "RECORD_ID": "the record identifier"
    query_opts:
      "limit": "limit number"
      "offset": "offset number"
    data_fields: {}
    description: "Get basic record information."
"#;
        assert_eq!(call.render_source_fragment(), expected);
    }

    #[test]
    fn test_source_fragment_escapes_text() {
        let call = CallRecord::new(
            "/notes",
            HttpMethod::Post,
            handler("views::note_create"),
            &NoAccessRules,
        )
        .with_description("Takes \"quoted\" text: a\nsecond line");

        let yaml = format!("calls:\n{}", call.render_source_fragment());
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        let descriptor: CallDescriptor =
            serde_yaml::from_value(value["calls"][0].clone()).unwrap();

        assert_eq!(descriptor.description, "Takes \"quoted\" text: a\nsecond line");
        assert_eq!(descriptor.handler.as_str(), "views::note_create");
        assert_eq!(descriptor.method, HttpMethod::Post);
    }

    #[test]
    fn test_descriptor_null_values_read_as_empty() {
        let yaml = r#"
method: GET
path: /records/{RECORD_ID}
handler: views::record
url_params:
  RECORD_ID:
description:
"#;
        let descriptor: CallDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(descriptor.url_params["RECORD_ID"], "");
        assert_eq!(descriptor.description, "");
        assert!(descriptor.query_opts.is_empty());

        let call = CallRecord::from_descriptor(descriptor, &NoAccessRules);
        assert_eq!(call.title(), "GET /records/{RECORD_ID}");
    }

    #[test]
    fn test_serialize_includes_title() {
        let json = serde_json::to_value(record_call()).unwrap();
        assert_eq!(json["title"], "GET /records/{RECORD_ID}");
        assert_eq!(json["shortname"], "record");
        assert_eq!(json["url_params"]["RECORD_ID"], "the record identifier");
    }
}
