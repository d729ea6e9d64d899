//! Document → operation records.
//!
//! [`walk`] visits every (URI, method) pair in source order and hands the
//! operation's parameters and responses to [`extract_operation`], which
//! renders the request and response text.
use indexmap::IndexMap;
use serde::Serialize;

use crate::document::{Document, Location, OperationObject, Parameter, Response};
use crate::error::{Error, Result};
use crate::render::params::render_parameters;
use crate::render::{render_value, Definitions};

/// Path item keys that denote operations.
const HTTP_METHODS: [&str; 7] = ["get", "put", "post", "delete", "options", "head", "patch"];

const SUCCESS_STATUS: &str = "200";

/// Rendered request parts; `None` means the section is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub headers: Option<String>,
    pub data: Option<String>,
    pub search_query: Option<String>,
    pub path_params: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub request: Request,
    pub response: String,
}

/// Request/response model for one (URI, method) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub method: String,
    pub url: String,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub name: String,
    pub tags: Vec<String>,
    pub request: Request,
    pub response: String,
}

/// Build one [`Operation`] per (URI, method) pair, in document order.
///
/// Fails on the first operation that cannot be extracted.
pub fn walk(document: &Document) -> Result<Vec<Operation>> {
    let mut operations = Vec::new();
    for (uri, item) in &document.paths {
        for (method, raw) in &item.entries {
            if !HTTP_METHODS.contains(&method.to_ascii_lowercase().as_str()) {
                tracing::debug!(%uri, key = %method, "skipping non-operation key");
                continue;
            }
            let invalid = |source: Error| Error::InvalidOperation {
                method: method.to_uppercase(),
                uri: uri.clone(),
                source: Box::new(source),
            };
            let op: OperationObject =
                crate::path_de::from_value_with_path(raw.clone()).map_err(invalid)?;
            let parameters = merge_parameters(&item.parameters, &op.parameters);
            let Extracted { request, response } =
                extract_operation(&parameters, &op.responses, &document.definitions)
                    .map_err(invalid)?;

            tracing::debug!(%uri, %method, operation = %op.operation_id, "extracted operation");
            operations.push(Operation {
                method: method.clone(),
                url: format!("{}{}", document.base_path, uri),
                uri: uri.clone(),
                summary: op.summary,
                name: op.operation_id,
                tags: op.tags,
                request,
                response,
            });
        }
    }
    Ok(operations)
}

/// Partition `parameters` by location and render request and response text.
///
/// At most one body parameter is expected; when several are present the last
/// one wins. Parameter references, nameless parameters and parameters in
/// unsupported locations are dropped with a warning.
pub fn extract_operation(
    parameters: &[Parameter],
    responses: &IndexMap<String, Response>,
    definitions: &Definitions,
) -> Result<Extracted> {
    let mut headers = Vec::new();
    let mut search_query = Vec::new();
    let mut path_params = Vec::new();
    let mut body = None;

    for param in parameters {
        if let Some(reference) = &param.ref_path {
            tracing::warn!(%reference, "dropping unresolved parameter reference");
            continue;
        }
        if param.name.is_empty() {
            tracing::warn!(location = ?param.location, "dropping parameter without a name");
            continue;
        }
        match param.location {
            Location::Query => search_query.push(param),
            Location::Header => headers.push(param),
            Location::Path => path_params.push(param),
            Location::Body => {
                if body.is_some() {
                    tracing::debug!(parameter = %param.name, "replacing earlier body parameter");
                }
                body = Some(param);
            }
            Location::Unsupported => {
                tracing::warn!(parameter = %param.name, "dropping parameter with unsupported location");
            }
        }
    }

    let data = body.map(|param| match &param.schema {
        Some(schema) => render_value(schema, definitions),
        None => "any".to_string(),
    });

    Ok(Extracted {
        request: Request {
            headers: render_parameters(&headers),
            data,
            search_query: render_parameters(&search_query),
            path_params: render_parameters(&path_params),
        },
        response: extract_response(responses, definitions)?,
    })
}

/// Render the `"200"` response. No other status is consulted.
pub fn extract_response(
    responses: &IndexMap<String, Response>,
    definitions: &Definitions,
) -> Result<String> {
    let success = responses.get(SUCCESS_STATUS).ok_or(Error::MissingSuccessResponse)?;
    Ok(match &success.schema {
        Some(schema) => render_value(schema, definitions),
        None => "void".to_string(),
    })
}

/// Path-level parameters first, minus those an operation redeclares
/// (same name and location).
fn merge_parameters(shared: &[Parameter], own: &[Parameter]) -> Vec<Parameter> {
    shared
        .iter()
        .filter(|s| !own.iter().any(|o| o.name == s.name && o.location == s.location))
        .chain(own)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Schema;
    use serde_json::json;
    use tracing_test::traced_test;

    fn params(value: serde_json::Value) -> Vec<Parameter> {
        serde_json::from_value(value).unwrap()
    }

    fn responses(value: serde_json::Value) -> IndexMap<String, Response> {
        serde_json::from_value(value).unwrap()
    }

    fn ok_string() -> IndexMap<String, Response> {
        responses(json!({ "200": { "description": "OK", "schema": { "type": "string" } } }))
    }

    #[test]
    fn partitions_by_location() {
        let parameters = params(json!([
            { "name": "Authorization", "in": "header", "required": true, "type": "string" },
            { "name": "page", "in": "query", "type": "integer", "format": "int32" },
            { "name": "id", "in": "path", "required": true, "type": "string" },
            { "name": "body", "in": "body", "schema": { "type": "object", "properties": {
                "name": { "type": "string" }
            } } }
        ]));
        let extracted = extract_operation(&parameters, &ok_string(), &Definitions::new()).unwrap();
        assert_eq!(
            extracted.request,
            Request {
                headers: Some("{\n    Authorization: string\n}".into()),
                data: Some("{\n    name: string\n}\n".into()),
                search_query: Some("{\n    page?: int32\n}".into()),
                path_params: Some("{\n    id: string\n}".into()),
            }
        );
        assert_eq!(extracted.response, "string");
    }

    #[test]
    fn no_parameters_means_no_sections() {
        let extracted = extract_operation(&[], &ok_string(), &Definitions::new()).unwrap();
        assert_eq!(extracted.request, Request::default());
    }

    #[test]
    fn last_body_parameter_wins() {
        let parameters = params(json!([
            { "name": "first", "in": "body", "schema": { "type": "integer" } },
            { "name": "second", "in": "body", "schema": { "type": "boolean" } }
        ]));
        let extracted = extract_operation(&parameters, &ok_string(), &Definitions::new()).unwrap();
        assert_eq!(extracted.request.data.as_deref(), Some("boolean"));
    }

    #[test]
    #[traced_test]
    fn unsupported_location_is_dropped() {
        let parameters = params(json!([
            { "name": "upload", "in": "formData", "type": "file" }
        ]));
        let extracted = extract_operation(&parameters, &ok_string(), &Definitions::new()).unwrap();
        assert_eq!(extracted.request, Request::default());
        assert!(logs_contain("unsupported location"));
    }

    #[test]
    #[traced_test]
    fn nameless_parameter_is_dropped() {
        let parameters = params(json!([{ "in": "query", "type": "string" }]));
        let extracted = extract_operation(&parameters, &ok_string(), &Definitions::new()).unwrap();
        assert_eq!(extracted.request, Request::default());
        assert!(logs_contain("without a name"));
    }

    #[test]
    fn missing_success_response_fails() {
        let only_created = responses(json!({ "201": { "schema": { "type": "string" } } }));
        let error = extract_operation(&[], &only_created, &Definitions::new()).unwrap_err();
        assert!(matches!(error, Error::MissingSuccessResponse));
    }

    #[test]
    fn success_without_schema_is_void() {
        let no_body = responses(json!({ "200": { "description": "OK" } }));
        assert_eq!(extract_response(&no_body, &Definitions::new()).unwrap(), "void");
    }

    #[test]
    fn response_expands_definitions() {
        let definitions: Definitions = [(
            "Pet".to_string(),
            Schema::object([("id", Schema::primitive("integer"))]),
        )]
        .into_iter()
        .collect();
        let list = responses(json!({ "200": { "schema": {
            "type": "array", "items": { "$ref": "#/definitions/Pet" }
        } } }));
        assert_eq!(
            extract_response(&list, &definitions).unwrap(),
            "[\n    // @((Pet))\n    {\n        id: integer\n    }\n]\n"
        );
    }

    fn document(value: serde_json::Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[test]
    fn walk_visits_every_method_in_order() {
        let doc = document(json!({
            "basePath": "/v2",
            "paths": {
                "/pets": {
                    "post": { "operationId": "addPet", "tags": ["pet"], "responses": { "200": {} } },
                    "get": { "operationId": "listPets", "summary": "List pets", "tags": ["pet", "store"],
                             "responses": { "200": {} } }
                },
                "/pets/{id}": {
                    "x-owner": "team-a",
                    "delete": { "operationId": "deletePet", "responses": { "200": {} } }
                }
            }
        }));
        let operations = walk(&doc).unwrap();
        let summary: Vec<(&str, &str, &str)> = operations
            .iter()
            .map(|op| (op.method.as_str(), op.url.as_str(), op.name.as_str()))
            .collect();
        assert_eq!(
            summary,
            [
                ("post", "/v2/pets", "addPet"),
                ("get", "/v2/pets", "listPets"),
                ("delete", "/v2/pets/{id}", "deletePet"),
            ]
        );
        assert_eq!(operations[1].tags, ["pet", "store"]);
        assert_eq!(operations[1].summary.as_deref(), Some("List pets"));
        assert!(operations[2].tags.is_empty());
        assert_eq!(operations[2].uri, "/pets/{id}");
    }

    #[test]
    fn walk_merges_path_level_parameters() {
        let doc = document(json!({
            "paths": {
                "/pets/{id}": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "type": "string" },
                        { "name": "X-Tenant", "in": "header", "type": "string" }
                    ],
                    "get": {
                        "operationId": "getPet",
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "type": "integer", "format": "int64" }
                        ],
                        "responses": { "200": {} }
                    }
                }
            }
        }));
        let operations = walk(&doc).unwrap();
        let request = &operations[0].request;
        assert_eq!(request.path_params.as_deref(), Some("{\n    id: int64\n}"));
        assert_eq!(request.headers.as_deref(), Some("{\n    X-Tenant?: string\n}"));
    }

    #[test]
    fn walk_reports_operation_without_success_response() {
        let doc = document(json!({
            "paths": { "/pets": { "get": { "operationId": "listPets", "responses": {
                "default": { "schema": { "type": "string" } }
            } } } }
        }));
        let error = walk(&doc).unwrap_err();
        let Error::InvalidOperation { method, uri, source } = error else {
            panic!("expected invalid operation, got {error:?}");
        };
        assert_eq!((method.as_str(), uri.as_str()), ("GET", "/pets"));
        assert!(matches!(*source, Error::MissingSuccessResponse));
    }

    #[test]
    fn walk_reports_malformed_operation() {
        let doc = document(json!({
            "paths": { "/pets": { "get": { "responses": { "200": {} } } } }
        }));
        let error = walk(&doc).unwrap_err();
        let Error::InvalidOperation { source, .. } = error else {
            panic!("expected invalid operation, got {error:?}");
        };
        assert!(matches!(*source, Error::Parse { .. }));
    }

    fn single_parameter_document(parameter: serde_json::Value) -> Document {
        document(json!({
            "paths": { "/pets": { "get": {
                "operationId": "listPets",
                "parameters": [parameter],
                "responses": { "200": { "schema": { "type": "string" } } }
            } } }
        }))
    }

    #[test]
    #[traced_test]
    fn walk_drops_parameter_without_location() {
        let doc = single_parameter_document(json!({ "name": "page", "type": "integer" }));
        let operations = walk(&doc).unwrap();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].request, Request::default());
        assert!(logs_contain("unsupported location"));
    }

    #[test]
    #[traced_test]
    fn walk_drops_parameter_reference() {
        let doc = single_parameter_document(json!({ "$ref": "#/parameters/Page" }));
        let operations = walk(&doc).unwrap();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].request, Request::default());
        assert_eq!(operations[0].response, "string");
        assert!(logs_contain("unresolved parameter reference"));
    }

    #[test]
    fn operation_serializes_camel_case() {
        let doc = document(json!({
            "paths": { "/ping": { "get": { "operationId": "ping", "responses": {
                "200": { "schema": { "type": "string" } }
            } } } }
        }));
        let operations = walk(&doc).unwrap();
        let value = serde_json::to_value(&operations[0]).unwrap();
        assert_eq!(
            value,
            json!({
                "method": "get",
                "url": "/ping",
                "uri": "/ping",
                "name": "ping",
                "tags": [],
                "request": { "headers": null, "data": null, "searchQuery": null, "pathParams": null },
                "response": "string"
            })
        );
    }
}
