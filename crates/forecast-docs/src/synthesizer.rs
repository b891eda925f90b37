//! Raw per-revision document synthesis.
//!
//! [`DocumentSynthesizer`] reads the [`RouteTable`] and produces one
//! [`OpenApi`] document per declared revision. The output still carries the
//! `{revision}` placeholder in its path keys and a synthetic `revision` path
//! parameter on every operation; the [`FilterChain`](crate::FilterChain)
//! rewrites both away.

use std::sync::Arc;

use forecast_core::{Revision, REVISION_PARAMETER};
use forecast_router::{ParameterLocation, ParameterSpec, PayloadSpec, RouteDescriptor, RouteTable};
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{DocsError, DocsResult};
use crate::openapi::{
    Components, Contact, Info, License, MediaType, OpenApi, Operation, Parameter, ParameterIn,
    PathItem, RequestBody, Response, Schema, Server, Tag, OPENAPI_VERSION,
};

/// Builds raw OpenAPI documents from the route table.
///
/// # Example
///
/// ```rust
/// use forecast_core::{Revision, RevisionSet};
/// use forecast_docs::DocumentSynthesizer;
/// use forecast_router::{RouteDescriptor, RouteTable};
/// use http::Method;
///
/// let mut table = RouteTable::new(RevisionSet::new([Revision::new(1, 0)]));
/// table
///     .register(RouteDescriptor::new(Method::GET, "/api/v{revision}/weatherforecast", "list"))
///     .unwrap();
///
/// let doc = DocumentSynthesizer::new(table)
///     .title("Weather Forecast API")
///     .synthesize(Revision::new(1, 0))
///     .unwrap();
///
/// assert_eq!(doc.info.version, "1.0");
/// assert!(doc.paths.contains_key("/api/v{revision}/weatherforecast"));
/// ```
#[derive(Debug, Clone)]
pub struct DocumentSynthesizer {
    table: Arc<RouteTable>,
    title: String,
    description: Option<String>,
    contact: Option<Contact>,
    license: Option<License>,
    servers: Vec<Server>,
    schemas: IndexMap<String, Schema>,
}

impl DocumentSynthesizer {
    /// Creates a synthesizer over a route table.
    #[must_use]
    pub fn new(table: impl Into<Arc<RouteTable>>) -> Self {
        Self {
            table: table.into(),
            title: "API".to_string(),
            description: None,
            contact: None,
            license: None,
            servers: Vec::new(),
            schemas: IndexMap::new(),
        }
    }

    /// Set the API title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the API description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set contact information. An empty contact is dropped.
    #[must_use]
    pub fn contact(mut self, contact: Contact) -> Self {
        self.contact = (!contact.is_empty()).then_some(contact);
        self
    }

    /// Set license information.
    #[must_use]
    pub fn license(mut self, name: impl Into<String>, url: Option<String>) -> Self {
        self.license = Some(License {
            name: name.into(),
            url,
        });
        self
    }

    /// Add a static server. The origin filter replaces these when the
    /// request origin is known.
    #[must_use]
    pub fn server(mut self, url: impl Into<String>, description: Option<String>) -> Self {
        self.servers.push(Server {
            url: url.into(),
            description,
        });
        self
    }

    /// Register a component schema.
    #[must_use]
    pub fn schema(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.schemas.insert(name.into(), schema);
        self
    }

    /// Returns the configured title.
    #[must_use]
    pub fn api_title(&self) -> &str {
        &self.title
    }

    /// Returns the route table the documents are drawn from.
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Builds the raw document for `revision`.
    ///
    /// # Errors
    ///
    /// - [`DocsError::UnsupportedRevision`] if `revision` is not declared.
    /// - [`DocsError::InvalidOperation`] if a route uses a method OpenAPI
    ///   cannot express or collides with another route on the same path.
    /// - [`DocsError::SchemaConversionError`] if a declared schema is not
    ///   valid JSON Schema.
    pub fn synthesize(&self, revision: Revision) -> DocsResult<OpenApi> {
        if !self.table.supported_revisions().contains(&revision) {
            return Err(DocsError::UnsupportedRevision {
                revision: revision.to_string(),
            });
        }

        let mut paths: IndexMap<String, PathItem> = IndexMap::new();
        let mut tags: Vec<Tag> = Vec::new();

        for route in self.table.routes_for(revision) {
            let operation = self.convert_route(route)?;

            for tag in &operation.tags {
                if !tags.iter().any(|t| &t.name == tag) {
                    tags.push(Tag {
                        name: tag.clone(),
                        description: None,
                    });
                }
            }

            let path_item = paths.entry(route.template().to_string()).or_default();
            let slot = path_item
                .slot_mut(route.method())
                .ok_or_else(|| DocsError::InvalidOperation {
                    operation_id: route.operation_id().to_string(),
                    reason: format!("unknown HTTP method: {}", route.method()),
                })?;
            if let Some(existing) = slot.as_ref() {
                return Err(DocsError::InvalidOperation {
                    operation_id: route.operation_id().to_string(),
                    reason: format!(
                        "{} {} is already documented by '{}'",
                        route.method(),
                        route.template(),
                        existing.operation_id
                    ),
                });
            }
            *slot = Some(operation);
        }

        let components = (!self.schemas.is_empty()).then(|| Components {
            schemas: self.schemas.clone(),
        });

        tracing::debug!(
            revision = %revision,
            paths = paths.len(),
            "Synthesized raw document"
        );

        Ok(OpenApi {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: self.title.clone(),
                version: revision.to_string(),
                description: self.description.clone(),
                contact: self.contact.clone(),
                license: self.license.clone(),
            },
            servers: self.servers.clone(),
            paths,
            components,
            tags,
        })
    }

    fn convert_route(&self, route: &RouteDescriptor) -> DocsResult<Operation> {
        let mut parameters = vec![revision_parameter()];

        for mut param in extract_path_parameters(route.template())? {
            if param.name == REVISION_PARAMETER {
                continue;
            }
            if let Some(declared) = route
                .parameters()
                .iter()
                .find(|p| p.location == ParameterLocation::Path && p.name == param.name)
            {
                param = convert_parameter(declared)?;
            }
            parameters.push(param);
        }

        for declared in route.parameters() {
            if declared.location == ParameterLocation::Path {
                continue;
            }
            parameters.push(convert_parameter(declared)?);
        }

        let request_body = route
            .request_payload()
            .map(|payload| -> DocsResult<RequestBody> {
                Ok(RequestBody {
                    description: None,
                    required: payload.required,
                    content: media_content(payload)?,
                })
            })
            .transpose()?;

        let mut responses: IndexMap<String, Response> = IndexMap::new();
        if route.responses().is_empty() {
            responses.insert(
                "200".to_string(),
                Response {
                    description: "Success".to_string(),
                    content: IndexMap::new(),
                },
            );
        }
        for response in route.responses() {
            let content = match &response.payload {
                Some(payload) => media_content(payload)?,
                None => IndexMap::new(),
            };
            responses.insert(
                response.status.to_string(),
                Response {
                    description: response.description.clone(),
                    content,
                },
            );
        }

        Ok(Operation {
            operation_id: route.operation_id().to_string(),
            summary: route.summary_text().map(ToString::to_string),
            description: route.description_text().map(ToString::to_string),
            tags: route.tags().to_vec(),
            parameters,
            request_body,
            responses,
        })
    }
}

/// The synthetic parameter bound to the `{revision}` placeholder.
fn revision_parameter() -> Parameter {
    Parameter {
        name: REVISION_PARAMETER.to_string(),
        location: ParameterIn::Path,
        description: Some("The requested API revision".to_string()),
        required: true,
        schema: Some(Schema::string()),
    }
}

fn convert_parameter(spec: &ParameterSpec) -> DocsResult<Parameter> {
    let location = match spec.location {
        ParameterLocation::Path => ParameterIn::Path,
        ParameterLocation::Query => ParameterIn::Query,
        ParameterLocation::Header => ParameterIn::Header,
    };
    Ok(Parameter {
        name: spec.name.clone(),
        location,
        description: spec.description.clone(),
        required: spec.required || location == ParameterIn::Path,
        schema: Some(convert_schema(&spec.schema)?),
    })
}

fn media_content(payload: &PayloadSpec) -> DocsResult<IndexMap<String, MediaType>> {
    let mut content = IndexMap::new();
    content.insert(
        payload.content_type.clone(),
        MediaType {
            schema: Some(convert_schema(&payload.schema)?),
        },
    );
    Ok(content)
}

fn convert_schema(value: &Value) -> DocsResult<Schema> {
    Schema::deserialize(value).map_err(|e| DocsError::SchemaConversionError {
        reason: e.to_string(),
    })
}

/// Extract path parameters from a path template like `/items/{id}`.
fn extract_path_parameters(path: &str) -> DocsResult<Vec<Parameter>> {
    let param_regex =
        Regex::new(r"\{([^}]+)\}").map_err(|e| DocsError::SchemaConversionError {
            reason: e.to_string(),
        })?;

    Ok(param_regex
        .captures_iter(path)
        .filter_map(|cap| cap.get(1))
        .map(|name| Parameter {
            name: name.as_str().to_string(),
            location: ParameterIn::Path,
            description: None,
            required: true,
            schema: Some(Schema::string()),
        })
        .collect())
}
