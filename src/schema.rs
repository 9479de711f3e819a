//! Declarative field schemas.
//!
//! Each shape kind exposes a static table describing its fields: semantic
//! type, modifiers (required / non-negative / nullable), and default. The
//! tables are the contract an external property system or serializer reads;
//! numeric enforcement lives in the `validate_*` helpers the shapes call
//! from their own `validate()`.

use crate::errors::ValidateError;
use crate::types::NumericError;

/// Semantic type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Coordinate,
    CoordinateList,
    Float,
    Angle,
    Bool,
    AngleUnits,
    Direction,
    MarkerVariety,
    LineProps,
    FillProps,
    HatchProps,
}

/// Default value recorded in a schema table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Float(f64),
    Bool(bool),
    /// Canonical name of an enum variant
    Enumerated(&'static str),
    /// Explicit absence (nullable fields)
    Null,
}

/// One declared field of a shape kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    /// Must be supplied at construction
    pub required: bool,
    /// Rejects negative values at validation
    pub non_negative: bool,
    /// Accepts explicit absence, distinct from unset
    pub nullable: bool,
    pub default: Option<FieldDefault>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        FieldSpec {
            name,
            ty,
            required: true,
            non_negative: false,
            nullable: false,
            default: None,
        }
    }

    pub const fn optional(name: &'static str, ty: FieldType, default: FieldDefault) -> Self {
        FieldSpec {
            name,
            ty,
            required: false,
            non_negative: false,
            nullable: false,
            default: Some(default),
        }
    }

    /// A shared property group pulled in by composition; its defaults live
    /// in the group's own `Default` impl.
    pub const fn include(name: &'static str, ty: FieldType) -> Self {
        FieldSpec {
            name,
            ty,
            required: false,
            non_negative: false,
            nullable: false,
            default: None,
        }
    }

    pub const fn non_negative(mut self) -> Self {
        self.non_negative = true;
        self
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Look a field up by name in a schema table.
pub fn field<'a>(schema: &'a [FieldSpec], name: &str) -> Option<&'a FieldSpec> {
    schema.iter().find(|spec| spec.name == name)
}

/// Reject NaN and infinite values.
pub fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidateError> {
    if value.is_nan() {
        Err(ValidateError::new(field, value, NumericError::NaN))
    } else if value.is_infinite() {
        Err(ValidateError::new(field, value, NumericError::Infinite))
    } else {
        Ok(())
    }
}

/// Reject NaN, infinite, and negative values.
pub fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidateError> {
    validate_finite(field, value)?;
    if value < 0.0 {
        Err(ValidateError::new(field, value, NumericError::Negative))
    } else {
        Ok(())
    }
}
