//! In-process GraphQL execution of probe requests.
//!
//! The schema comes as SDL text and is turned into an async-graphql dynamic
//! schema whose root fields echo their arguments back: `test(arg1: 1.5)`
//! resolves to `{"arg1": 1.5}` and every nested field reads the key of the same
//! name from its parent.

use async_graphql::{
    dynamic::{Enum, EnumItem, Field, FieldFuture, FieldValue, InputObject, InputValue, Object, Scalar, Schema, TypeRef},
    Request, Value, Variables,
};
use async_graphql_parser::types::{BaseType, InputValueDefinition, Type, TypeDefinition, TypeKind, TypeSystemDefinition};
use coercion_cases::Case;
use serde::Serialize;

mod variables;

const DEFAULT_QUERY_TYPE: &str = "Query";

#[derive(Debug, thiserror::Error)]
pub(crate) enum EngineError {
    #[error("invalid schema: {0}")]
    Parse(#[from] async_graphql_parser::Error),
    #[error("unsupported schema definition: {0}")]
    UnsupportedDefinition(String),
    #[error("could not build the schema: {0}")]
    Schema(String),
    #[error("could not convert the response: {0}")]
    Response(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub(crate) struct EngineRequest {
    pub schema_sdl: String,
    pub query: String,
    pub variables: serde_json::Map<String, serde_json::Value>,
}

impl EngineRequest {
    pub(crate) fn from_case(case: &Case) -> Self {
        EngineRequest {
            schema_sdl: case.schema_sdl(),
            query: case.query(),
            variables: case.variables(),
        }
    }
}

/// The engine-neutral shape of a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ExecutionOutcome {
    /// `None` when the request failed before execution, as with a validation
    /// error.
    pub data: Option<serde_json::Value>,
    pub errors: Vec<String>,
}

impl ExecutionOutcome {
    fn from_response(response: async_graphql::Response) -> Result<Self, EngineError> {
        let errors = response
            .errors
            .into_iter()
            .map(|error| error.message)
            .collect::<Vec<_>>();

        let data = match response.data {
            Value::Null if !errors.is_empty() => None,
            data => Some(data.into_json()?),
        };

        Ok(ExecutionOutcome { data, errors })
    }

    pub(crate) fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Creating a trait for the engine so the runner does not depend on the
/// concrete GraphQL implementation.
#[async_trait::async_trait]
pub(crate) trait QueryEngine: Send + Sync {
    async fn execute(&self, request: EngineRequest) -> Result<ExecutionOutcome, EngineError>;
}

#[derive(Debug, Default)]
pub(crate) struct EchoEngine;

#[async_trait::async_trait]
impl QueryEngine for EchoEngine {
    async fn execute(&self, request: EngineRequest) -> Result<ExecutionOutcome, EngineError> {
        let document = SchemaDocument::parse(&request.schema_sdl)?;

        // Unparseable queries are left to the engine, which reports them.
        let mismatch = async_graphql_parser::parse_query(&request.query)
            .ok()
            .and_then(|query| variables::check_positions(&document, &query));

        if let Some(mismatch) = mismatch {
            tracing::debug!(error = %mismatch, "variable used in a disallowed position");

            return Ok(ExecutionOutcome {
                data: None,
                errors: vec![mismatch.to_string()],
            });
        }

        let schema = document.into_schema()?;
        let variables = Variables::from_json(serde_json::Value::Object(request.variables));

        let response = schema.execute(Request::new(request.query).variables(variables)).await;

        ExecutionOutcome::from_response(response)
    }
}

pub(crate) fn build_schema(sdl: &str) -> Result<Schema, EngineError> {
    SchemaDocument::parse(sdl)?.into_schema()
}

/// The type definitions of an SDL document and the name of its query type.
pub(crate) struct SchemaDocument {
    query_type: String,
    definitions: Vec<TypeDefinition>,
}

impl SchemaDocument {
    pub(crate) fn parse(sdl: &str) -> Result<Self, EngineError> {
        let document = async_graphql_parser::parse_schema(sdl)?;

        let mut query_type = DEFAULT_QUERY_TYPE.to_owned();
        let mut definitions = Vec::new();

        for definition in document.definitions {
            match definition {
                TypeSystemDefinition::Schema(schema) => {
                    if let Some(query) = schema.node.query {
                        query_type = query.node.to_string();
                    }
                }
                TypeSystemDefinition::Type(definition) => definitions.push(definition.node),
                TypeSystemDefinition::Directive(directive) => {
                    return Err(EngineError::UnsupportedDefinition(format!(
                        "directive @{}",
                        directive.node.name.node
                    )))
                }
            }
        }

        Ok(SchemaDocument { query_type, definitions })
    }

    /// Definition of an argument of a field of the query type.
    fn root_argument(&self, field: &str, argument: &str) -> Option<&InputValueDefinition> {
        self.definitions
            .iter()
            .filter(|definition| definition.name.node.as_str() == self.query_type)
            .find_map(|definition| match &definition.kind {
                TypeKind::Object(object) => object
                    .fields
                    .iter()
                    .find(|candidate| candidate.node.name.node.as_str() == field),
                _ => None,
            })?
            .node
            .arguments
            .iter()
            .map(|candidate| &candidate.node)
            .find(|candidate| candidate.name.node.as_str() == argument)
    }

    pub(crate) fn into_schema(self) -> Result<Schema, EngineError> {
        let mut builder = Schema::build(&self.query_type, None, None);

        for definition in self.definitions {
            let is_root = definition.name.node.as_str() == self.query_type;

            builder = match definition_kind(definition, is_root)? {
                DynamicType::Object(object) => builder.register(object),
                DynamicType::InputObject(input) => builder.register(input),
                DynamicType::Enum(enumeration) => builder.register(enumeration),
                DynamicType::Scalar(scalar) => builder.register(scalar),
            };
        }

        builder.finish().map_err(|error| EngineError::Schema(error.to_string()))
    }
}

enum DynamicType {
    Object(Object),
    InputObject(InputObject),
    Enum(Enum),
    Scalar(Scalar),
}

fn definition_kind(definition: TypeDefinition, is_root: bool) -> Result<DynamicType, EngineError> {
    let name = definition.name.node.to_string();

    let dynamic = match definition.kind {
        TypeKind::Scalar => DynamicType::Scalar(Scalar::new(name)),
        TypeKind::Object(object) => {
            let object = object.fields.into_iter().fold(Object::new(name), |object, field| {
                let field = field.node;
                let field_name = field.name.node.to_string();
                let ty = type_ref(&field.ty.node);

                let output = if is_root {
                    Field::new(field_name, ty, |ctx| {
                        FieldFuture::new(async move {
                            let arguments = ctx.args.as_index_map().clone();
                            Ok(Some(FieldValue::value(Value::Object(arguments))))
                        })
                    })
                } else {
                    let key = field_name.clone();
                    Field::new(field_name, ty, move |ctx| {
                        let key = key.clone();
                        FieldFuture::new(async move {
                            // A null is resolved as no value, list fields reject a null `FieldValue`.
                            let value = match ctx.parent_value.as_value() {
                                Some(Value::Object(parent)) => parent
                                    .get(key.as_str())
                                    .filter(|value| !matches!(value, Value::Null))
                                    .cloned(),
                                _ => None,
                            };
                            Ok(value.map(FieldValue::value))
                        })
                    })
                };

                let output = field
                    .arguments
                    .iter()
                    .fold(output, |output, argument| output.argument(input_value(&argument.node)));

                object.field(output)
            });

            DynamicType::Object(object)
        }
        TypeKind::InputObject(input) => DynamicType::InputObject(
            input
                .fields
                .iter()
                .fold(InputObject::new(name), |input, field| input.field(input_value(&field.node))),
        ),
        TypeKind::Enum(enumeration) => DynamicType::Enum(
            enumeration
                .values
                .iter()
                .fold(Enum::new(name), |enumeration, value| {
                    enumeration.item(EnumItem::new(value.node.value.node.to_string()))
                }),
        ),
        TypeKind::Interface(_) | TypeKind::Union(_) => {
            return Err(EngineError::UnsupportedDefinition(format!("abstract type {name}")))
        }
    };

    Ok(dynamic)
}

fn input_value(definition: &InputValueDefinition) -> InputValue {
    let input = InputValue::new(definition.name.node.to_string(), type_ref(&definition.ty.node));

    match &definition.default_value {
        Some(default) => input.default_value(default.node.clone()),
        None => input,
    }
}

fn type_ref(ty: &Type) -> TypeRef {
    let base = match &ty.base {
        BaseType::Named(name) => TypeRef::Named(name.to_string().into()),
        BaseType::List(inner) => TypeRef::List(Box::new(type_ref(inner))),
    };

    if ty.nullable {
        base
    } else {
        TypeRef::NonNull(Box::new(base))
    }
}
