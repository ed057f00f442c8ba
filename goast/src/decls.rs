//! One-line summaries of top level declarations for `goast print decls`

use goast_parser::{Decl, FuncDecl, Module, TypeExpr};

pub fn summarize(module: &Module) -> Vec<String> {
    let mut lines = Vec::new();

    for import in &module.imports {
        match &import.name {
            Some(name) => lines.push(format!("ImportSpec: {} -> \"{}\"", name, import.path)),
            None => lines.push(format!("ImportSpec: \"{}\"", import.path)),
        }
    }

    for decl in &module.decls {
        lines.push(match decl {
            Decl::Type(type_decl) => {
                let arrow = if type_decl.alias { "=" } else { "->" };
                format!("TypeDecl: {} {} {}", type_decl.name, arrow, type_decl.ty)
            }
            Decl::Func(func_decl) => format!("FuncDecl: {}", func_summary(func_decl)),
            Decl::Value(value_decl) => {
                let body = value_decl.body.to_string();
                let first_line = body.lines().next().unwrap_or_default().trim();
                format!("ValueDecl: {} {}", value_decl.keyword, first_line)
            }
        });
    }

    lines
}

fn func_summary(decl: &FuncDecl) -> String {
    let signature = TypeExpr::Function {
        params: decl.params.clone(),
        results: decl.results.clone(),
    };
    let receiver = decl
        .receiver
        .as_ref()
        .and_then(|receiver| receiver.iter().next());

    match receiver {
        Some(field) => format!("({}) {} -> {}", field.ty, decl.name, signature),
        None => format!("{} -> {}", decl.name, signature),
    }
}
