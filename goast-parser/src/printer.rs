// Go source printer
// Renders a Module back into gofmt-shaped Go source

use crate::ast::*;
use std::fmt::Write;

/// Render a complete module as Go source
pub fn print_module(module: &Module) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "package {}", module.package);

    match module.imports.as_slice() {
        [] => {}
        [single] => {
            let _ = write!(out, "\nimport {}\n", import_line(single));
        }
        imports => {
            out.push_str("\nimport (\n");
            for import in imports {
                let _ = writeln!(out, "\t{}", import_line(import));
            }
            out.push_str(")\n");
        }
    }

    for decl in &module.decls {
        out.push('\n');
        out.push_str(&print_decl(decl));
        out.push('\n');
    }

    out
}

fn import_line(import: &ImportSpec) -> String {
    match &import.name {
        Some(name) => format!("{} \"{}\"", name, import.path),
        None => format!("\"{}\"", import.path),
    }
}

pub fn print_decl(decl: &Decl) -> String {
    match decl {
        Decl::Type(type_decl) => print_type_decl(type_decl),
        Decl::Func(func_decl) => print_func_decl(func_decl),
        Decl::Value(value_decl) => format!("{}{}", value_decl.keyword, value_decl.body),
    }
}

pub fn print_type_decl(decl: &TypeDecl) -> String {
    let assign = if decl.alias { " = " } else { " " };
    format!("type {}{}{}", decl.name, assign, print_type_block(&decl.ty))
}

pub fn print_func_decl(decl: &FuncDecl) -> String {
    let mut out = String::from("func ");
    if let Some(receiver) = &decl.receiver {
        let _ = write!(out, "{} ", receiver);
    }
    let _ = write!(
        out,
        "{}{}",
        decl.name,
        Signature {
            params: &decl.params,
            results: &decl.results,
        }
    );
    if let Some(body) = &decl.body {
        let _ = write!(out, " {}", body);
    }
    out
}

/// Top level struct and interface types are laid out one member per line
fn print_type_block(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Struct(fields) if !fields.is_empty() => {
            let mut out = String::from("struct {\n");
            for field in fields {
                let _ = writeln!(out, "\t{}", field);
            }
            out.push('}');
            out
        }
        TypeExpr::Interface(methods) if !methods.is_empty() => {
            let mut out = String::from("interface {\n");
            for method in methods {
                let _ = writeln!(out, "\t{}", method_string(method));
            }
            out.push('}');
            out
        }
        other => other.to_string(),
    }
}
