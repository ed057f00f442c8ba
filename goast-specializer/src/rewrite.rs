//! Applies a finished substitution to a template
//!
//! The rewrite is a pure transform: it reads the template and returns a new
//! tree. A replaced node is never scanned again.

use crate::substitution::Substitution;
use goast_parser::{
    Body, Decl, Field, FieldList, FuncDecl, Module, Segment, TypeDecl, TypeExpr, ValueDecl,
};

pub struct Rewriter<'s> {
    subst: &'s Substitution,
}

impl<'s> Rewriter<'s> {
    pub fn new(subst: &'s Substitution) -> Self {
        Self { subst }
    }

    pub fn rewrite_module(&self, module: &Module) -> Module {
        Module {
            package: module.package.clone(),
            imports: module.imports.clone(),
            decls: module
                .decls
                .iter()
                .map(|decl| self.rewrite_decl(decl))
                .collect(),
            source_name: module.source_name.clone(),
        }
    }

    pub fn rewrite_decl(&self, decl: &Decl) -> Decl {
        match decl {
            Decl::Type(type_decl) => Decl::Type(self.rewrite_type_decl(type_decl)),
            Decl::Func(func_decl) => Decl::Func(self.rewrite_func_decl(func_decl)),
            Decl::Value(value_decl) => Decl::Value(ValueDecl {
                keyword: value_decl.keyword,
                body: self.rewrite_body(&value_decl.body),
                span: value_decl.span,
            }),
        }
    }

    /// Renames the declaration when its name is bound to another name
    pub fn rewrite_type_decl(&self, decl: &TypeDecl) -> TypeDecl {
        let name = match self.subst.get_name(&decl.name) {
            Some(TypeExpr::Name(renamed)) => renamed.clone(),
            _ => decl.name.clone(),
        };
        TypeDecl {
            name,
            alias: decl.alias,
            ty: self.rewrite_expr(&decl.ty),
            span: decl.span,
        }
    }

    pub fn rewrite_func_decl(&self, decl: &FuncDecl) -> FuncDecl {
        FuncDecl {
            name: decl.name.clone(),
            receiver: decl
                .receiver
                .as_ref()
                .map(|receiver| self.rewrite_fields(receiver)),
            params: self.rewrite_fields(&decl.params),
            results: self.rewrite_fields(&decl.results),
            body: decl.body.as_ref().map(|body| self.rewrite_body(body)),
            span: decl.span,
        }
    }

    pub fn rewrite_expr(&self, expr: &TypeExpr) -> TypeExpr {
        if let Some(replacement) = self.replacement(expr) {
            return replacement.clone();
        }

        match expr {
            TypeExpr::Name(_) | TypeExpr::Qualified(..) => expr.clone(),
            TypeExpr::Pointer(inner) => TypeExpr::Pointer(Box::new(self.rewrite_expr(inner))),
            TypeExpr::Array { len, elem } => TypeExpr::Array {
                len: len.clone(),
                elem: Box::new(self.rewrite_expr(elem)),
            },
            TypeExpr::Variadic(elem) => TypeExpr::Variadic(Box::new(self.rewrite_expr(elem))),
            TypeExpr::Paren(inner) => TypeExpr::Paren(Box::new(self.rewrite_expr(inner))),
            TypeExpr::Channel { dir, value } => {
                let mut rewritten = self.rewrite_expr(value);
                // chan of a substituted chan needs explicit grouping
                if matches!(rewritten, TypeExpr::Channel { .. })
                    && !matches!(**value, TypeExpr::Channel { .. })
                {
                    rewritten = TypeExpr::Paren(Box::new(rewritten));
                }
                TypeExpr::Channel {
                    dir: *dir,
                    value: Box::new(rewritten),
                }
            }
            TypeExpr::Map { key, value } => TypeExpr::Map {
                key: Box::new(self.rewrite_expr(key)),
                value: Box::new(self.rewrite_expr(value)),
            },
            TypeExpr::Function { params, results } => TypeExpr::Function {
                params: self.rewrite_fields(params),
                results: self.rewrite_fields(results),
            },
            TypeExpr::Struct(fields) => TypeExpr::Struct(self.rewrite_fields(fields)),
            TypeExpr::Interface(methods) => TypeExpr::Interface(self.rewrite_fields(methods)),
        }
    }

    fn replacement(&self, expr: &TypeExpr) -> Option<&'s TypeExpr> {
        match expr {
            TypeExpr::Name(name) => self.subst.get_name(name),
            TypeExpr::Interface(methods) if methods.is_empty() => self.subst.universal(),
            _ => None,
        }
    }

    fn rewrite_fields(&self, fields: &FieldList) -> FieldList {
        FieldList::new(
            fields
                .iter()
                .map(|field| Field {
                    names: field.names.clone(),
                    ty: self.rewrite_expr(&field.ty),
                    tag: field.tag.clone(),
                })
                .collect(),
        )
    }

    /// Replace bound identifiers in a token stream. Selectors (`x.Name`) and
    /// composite literal keys (`Box{Name: v}`) are left alone.
    pub fn rewrite_body(&self, body: &Body) -> Body {
        let mut rewritten = Body::default();

        for (index, segment) in body.segments.iter().enumerate() {
            match segment {
                Segment::Ident(name) => {
                    let preceding = &body.segments[..index];
                    let following = &body.segments[index + 1..];
                    let is_type_position = !follows_selector(preceding)
                        && !is_composite_key(preceding, following);
                    match self.subst.get_name(name) {
                        Some(bound) if is_type_position => {
                            if let TypeExpr::Name(replacement) = bound {
                                rewritten.push_ident(replacement);
                            } else if follows_chan_keyword(preceding)
                                && matches!(bound, TypeExpr::Channel { .. })
                            {
                                rewritten.push_text(&format!("({})", bound));
                            } else {
                                rewritten.push_text(&bound.to_string());
                            }
                        }
                        _ => rewritten.push_ident(name),
                    }
                }
                Segment::Text(text) => rewritten.push_text(text),
            }
        }

        rewritten
    }
}

fn follows_selector(preceding: &[Segment]) -> bool {
    match preceding.last() {
        Some(Segment::Text(text)) => text.ends_with('.') && !text.ends_with("..."),
        _ => false,
    }
}

/// `{Name: v}` or `, Name: v`, but not a `case a, Name:` clause
fn is_composite_key(preceding: &[Segment], following: &[Segment]) -> bool {
    let before_colon = match following.first() {
        Some(Segment::Text(text)) => {
            let text = text.trim_start();
            text.starts_with(':') && !text.starts_with(":=")
        }
        _ => false,
    };
    let opens_element = match preceding.last() {
        Some(Segment::Text(text)) => matches!(text.trim_end().chars().last(), Some('{' | ',')),
        _ => false,
    };
    if !before_colon || !opens_element {
        return false;
    }

    for segment in preceding.iter().rev() {
        match segment {
            Segment::Ident(keyword) if keyword == "case" => return false,
            Segment::Text(text) if text.contains(['\n', ';', '{']) => break,
            _ => {}
        }
    }
    true
}

/// `chan T`, `chan<- T` and `<-chan T` all put the keyword right before `T`
fn follows_chan_keyword(preceding: &[Segment]) -> bool {
    match preceding {
        [.., Segment::Ident(keyword), Segment::Text(between)] => {
            keyword == "chan" && matches!(between.trim(), "" | "<-")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substitution::Binding;
    use goast_parser::{parse_module, parse_type_expr, print_module, ChanDir};
    use pretty_assertions::assert_eq;

    fn ty(source: &str) -> TypeExpr {
        parse_type_expr(source).unwrap()
    }

    fn subst(bindings: &[(&str, &str)]) -> Substitution {
        let mut subst = Substitution::new();
        for (name, expr) in bindings {
            subst.bind(Binding::name(*name), ty(expr)).unwrap();
        }
        subst
    }

    #[test]
    fn test_rewrite_replaces_bound_names() {
        let subst = subst(&[("K", "string"), ("V", "[]int")]);
        let rewriter = Rewriter::new(&subst);

        assert_eq!(
            rewriter.rewrite_expr(&ty("map[K]V")),
            ty("map[string][]int")
        );
        assert_eq!(
            rewriter.rewrite_expr(&ty("func(k K) (V, error)")),
            ty("func(k string) ([]int, error)")
        );
    }

    #[test]
    fn test_replacements_are_not_rescanned() {
        let subst = subst(&[("A", "B"), ("B", "int")]);
        let rewriter = Rewriter::new(&subst);

        assert_eq!(rewriter.rewrite_expr(&ty("[]A")), ty("[]B"));
    }

    #[test]
    fn test_channel_of_substituted_channel_is_parenthesized() {
        let subst = subst(&[("I", "<-chan int")]);
        let rewriter = Rewriter::new(&subst);

        let rewritten = rewriter.rewrite_expr(&ty("<-chan I"));
        assert_eq!(
            rewritten,
            TypeExpr::channel(
                ChanDir::Recv,
                TypeExpr::Paren(Box::new(ty("<-chan int")))
            )
        );
        assert_eq!(rewritten.to_string(), "<-chan (<-chan int)");
    }

    #[test]
    fn test_universal_binding_replaces_inline_empty_interfaces() {
        let mut subst = Substitution::new();
        subst.bind(Binding::Universal, ty("float64")).unwrap();
        let rewriter = Rewriter::new(&subst);

        assert_eq!(
            rewriter.rewrite_expr(&ty("struct { id interface{} }")),
            ty("struct { id float64 }")
        );
        assert_eq!(
            Rewriter::new(&Substitution::new()).rewrite_expr(&ty("interface{}")),
            ty("interface{}")
        );
    }

    #[test]
    fn test_rewrite_body_respects_selectors_and_variadics() {
        let source = "package p\n\nfunc F(arg ...T) {\n\tx := pkg.T{}\n\tvar s []T\n\tf := func(rest ...T) T { return s[0] }\n\t_ = append(s, arg...)\n}\n";
        let module = parse_module(source).unwrap();
        let subst = subst(&[("T", "int")]);
        let rewritten = Rewriter::new(&subst).rewrite_module(&module);

        assert_eq!(
            print_module(&rewritten),
            "package p\n\nfunc F(arg ...int) {\n\tx := pkg.T{}\n\tvar s []int\n\tf := func(rest ...int) int { return s[0] }\n\t_ = append(s, arg...)\n}\n"
        );
    }

    #[test]
    fn test_rewrite_body_keeps_composite_literal_keys() {
        let source = "package p\n\nfunc (b Box) Copy() T {\n\tc := Box{T: b.T}\n\td := Box{\n\t\tT: b.T,\n\t}\n\tpairs := []Pair{{1, T(0)}, {T: 2}}\n\tswitch any(c).(type) {\n\tcase int, T:\n\t\treturn Box{T: d.T}.T\n\t}\n\treturn T(0)\n}\n";
        let module = parse_module(source).unwrap();
        let subst = subst(&[("T", "int"), ("Box", "IntBox")]);
        let rewritten = Rewriter::new(&subst).rewrite_module(&module);

        assert_eq!(
            print_module(&rewritten),
            "package p\n\nfunc (b IntBox) Copy() int {\n\tc := IntBox{T: b.T}\n\td := IntBox{\n\t\tT: b.T,\n\t}\n\tpairs := []Pair{{1, int(0)}, {T: 2}}\n\tswitch any(c).(type) {\n\tcase int, int:\n\t\treturn IntBox{T: d.T}.T\n\t}\n\treturn int(0)\n}\n"
        );
    }

    #[test]
    fn test_rewrite_body_parenthesizes_channel_after_chan_keyword() {
        let source = "package p\n\nfunc F() {\n\tout := make(chan I)\n\tin := make(<-chan I)\n\tvar x I\n}\n";
        let module = parse_module(source).unwrap();
        let subst = subst(&[("I", "<-chan int")]);
        let rewritten = Rewriter::new(&subst).rewrite_module(&module);

        let body = rewritten.func_decls().next().unwrap().body.as_ref().unwrap();
        assert_eq!(
            body.to_string(),
            "{\n\tout := make(chan (<-chan int))\n\tin := make(<-chan (<-chan int))\n\tvar x <-chan int\n}"
        );
    }

    #[test]
    fn test_type_declarations_are_renamed() {
        let module = parse_module("package p\n\ntype _Fan []Pipeline\n").unwrap();
        let subst = subst(&[("Pipeline", "IntPipe"), ("_Fan", "IntPipeFan")]);
        let rewritten = Rewriter::new(&subst).rewrite_module(&module);

        assert_eq!(
            print_module(&rewritten),
            "package p\n\ntype IntPipeFan []IntPipe\n"
        );
    }

    #[test]
    fn test_rewrite_leaves_template_untouched() {
        let module = parse_module("package p\n\ntype S []T\n\nfunc (s S) Len() int {\n\treturn len(s)\n}\n").unwrap();
        let before = module.clone();
        let subst = subst(&[("T", "int"), ("S", "Ints")]);

        let rewritten = Rewriter::new(&subst).rewrite_module(&module);

        assert_eq!(module, before);
        assert_ne!(rewritten, before);
    }
}
