//! Names for related types
//!
//! A related type such as `_Fan []Pipeline` is renamed after specialization by
//! replacing its marker with a readable name for what `Pipeline` was bound to.

use goast_parser::{ChanDir, FieldList, TypeExpr};

/// Pluggable naming for related types
pub trait NamingStrategy: Send + Sync {
    /// A readable identifier fragment for a bound expression
    fn nice_name(&self, expr: &TypeExpr) -> String;

    /// Replace each `marker` in `related`, left to right, with the nice name of
    /// the next reference. Markers without a reference use `fallback`.
    fn related_name(
        &self,
        related: &str,
        marker: &str,
        references: &[TypeExpr],
        fallback: &str,
    ) -> String {
        if marker.is_empty() {
            return related.to_string();
        }

        let mut references = references.iter();
        let mut pieces = related.split(marker);
        let mut name = pieces.next().unwrap_or_default().to_string();
        for piece in pieces {
            match references.next() {
                Some(reference) => name.push_str(&self.nice_name(reference)),
                None => name.push_str(fallback),
            }
            name.push_str(piece);
        }
        name
    }
}

/// `[]int` becomes `IntSlice`, `map[int]string` becomes `StringMapByInt`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNaming;

impl NamingStrategy for DefaultNaming {
    fn nice_name(&self, expr: &TypeExpr) -> String {
        match expr {
            TypeExpr::Name(name) => capitalize(name),
            TypeExpr::Qualified(package, name) => capitalize(package) + &capitalize(name),
            TypeExpr::Pointer(inner) => self.nice_name(inner) + "Pointer",
            TypeExpr::Array { len: None, elem } | TypeExpr::Variadic(elem) => {
                self.nice_name(elem) + "Slice"
            }
            TypeExpr::Array { elem, .. } => self.nice_name(elem) + "Array",
            TypeExpr::Paren(inner) => self.nice_name(inner),
            TypeExpr::Channel { dir, value } => {
                let suffix = match dir {
                    ChanDir::Both => "Chan",
                    ChanDir::Send => "SendChan",
                    ChanDir::Recv => "RecvChan",
                };
                self.nice_name(value) + suffix
            }
            TypeExpr::Map { key, value } => {
                format!("{}MapBy{}", self.nice_name(value), self.nice_name(key))
            }
            TypeExpr::Function { params, results } => {
                let mut name = String::from("Func") + &self.field_names(params);
                if !results.is_empty() {
                    name.push_str("To");
                    name.push_str(&self.field_names(results));
                }
                name
            }
            TypeExpr::Struct(_) => "Struct".to_string(),
            TypeExpr::Interface(_) => "Interface".to_string(),
        }
    }
}

impl DefaultNaming {
    fn field_names(&self, fields: &FieldList) -> String {
        fields
            .entry_types()
            .into_iter()
            .map(|ty| self.nice_name(ty))
            .collect()
    }
}

/// Upper-case the first character
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
