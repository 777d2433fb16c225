use crate::{
    domain::{
        AttributeDefinition, DataTypeDefinition, DataTypeKind, DocumentBundle, EnumValue,
        SpecObject, Value,
    },
    hierarchy::{ErrorKind, Fields},
    schema::{HeadingClassifier, Schema},
};

/// Separator placed between the names of multiple enumeration values.
pub const ENUM_SEPARATOR: &str = ", ";

/// Decodes every attribute value of a spec object into fields keyed by
/// attribute long name, in the order the spec object stores them.
pub(super) fn extract_fields<C: HeadingClassifier>(
    spec_object: &SpecObject,
    bundle: &DocumentBundle,
    schema: &Schema<'_, C>,
) -> Result<Fields, ErrorKind> {
    let mut fields = Fields::default();
    for attribute in &spec_object.attributes {
        let definition = schema
            .attribute_definition(&attribute.definition)
            .ok_or_else(|| ErrorKind::UnresolvedAttributeDefinition(attribute.definition.clone()))?;
        let data_type = bundle
            .data_type(&definition.datatype_definition)
            .ok_or_else(|| ErrorKind::UnresolvedDataType {
                attribute: definition.identifier.clone(),
                data_type: definition.datatype_definition.clone(),
            })?;

        let value = decode(definition, data_type, &attribute.value)?;
        fields.insert(definition.field_name().to_string(), value);
    }
    Ok(fields)
}

fn decode(
    definition: &AttributeDefinition,
    data_type: &DataTypeDefinition,
    value: &Value,
) -> Result<String, ErrorKind> {
    let mismatched = || ErrorKind::MismatchedValue {
        attribute: definition.identifier.clone(),
        kind: data_type.kind.name(),
    };

    match &data_type.kind {
        DataTypeKind::String { .. } | DataTypeKind::Date | DataTypeKind::Xhtml => match value {
            Value::Scalar(text) => Ok(text.clone()),
            Value::Enumeration(_) => Err(mismatched()),
        },
        DataTypeKind::Enumeration { values } => match value {
            Value::Enumeration(selected) => selected
                .iter()
                .map(|enum_value| {
                    values
                        .iter()
                        .find(|candidate| candidate.identifier == *enum_value)
                        .map(EnumValue::display_name)
                        .ok_or_else(|| ErrorKind::UnresolvedEnumValue {
                            data_type: data_type.identifier.clone(),
                            enum_value: enum_value.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|names| names.join(ENUM_SEPARATOR)),
            Value::Scalar(_) => Err(mismatched()),
        },
        DataTypeKind::Boolean | DataTypeKind::Integer { .. } | DataTypeKind::Real { .. } => {
            Err(ErrorKind::UnsupportedDataType {
                attribute: definition.identifier.clone(),
                data_type: data_type.identifier.clone(),
                kind: data_type.kind.name(),
            })
        }
    }
}
