//! Compound field declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TermsmithError};
use crate::schema::catalog::FieldCatalog;

/// An ordered pair of field names indexed together as one compound term.
///
/// Serialized as a plain list of names, e.g. `["Year", "Month"]`. Only two
/// fields are supported; [`CompoundFieldSpec::validate`] rejects any other
/// arity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompoundFieldSpec {
    fields: Vec<String>,
}

impl CompoundFieldSpec {
    /// Declare a compound field over `first` and `second`.
    pub fn new<A: Into<String>, B: Into<String>>(first: A, second: B) -> Self {
        CompoundFieldSpec {
            fields: vec![first.into(), second.into()],
        }
    }

    /// Declare a compound field from a list of names, rejecting any arity
    /// other than two.
    pub fn from_fields<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = CompoundFieldSpec {
            fields: fields.into_iter().map(Into::into).collect(),
        };
        spec.check_arity()?;
        Ok(spec)
    }

    /// The first component field.
    pub fn first(&self) -> &str {
        &self.fields[0]
    }

    /// The second component field.
    pub fn second(&self) -> &str {
        &self.fields[1]
    }

    /// All component field names.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Check the arity and that both components are declared in `catalog`.
    pub fn validate(&self, catalog: &FieldCatalog) -> Result<()> {
        self.check_arity()?;
        for name in &self.fields {
            if catalog.lookup(name).is_none() {
                return Err(TermsmithError::undefined_field(
                    name.as_str(),
                    catalog.field_names(),
                ));
            }
        }
        Ok(())
    }

    /// Reject any arity other than two.
    pub fn check_arity(&self) -> Result<()> {
        if self.fields.len() != 2 {
            return Err(TermsmithError::UnsupportedCompoundArity {
                fields: self.fields.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for CompoundFieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.fields.join(", "))
    }
}
