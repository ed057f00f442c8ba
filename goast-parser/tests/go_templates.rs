// Template parsing tests
// Realistic generic templates and providers as they appear next to go:generate lines

use goast_parser::{ast::*, parse_module, print_module};

const FAN_IN: &str = r#"package main

import (
	"sync"
)

type E interface{}
type Fan []<-chan E

func (f Fan) FanIn(done <-chan struct{}) <-chan E {
	var wg sync.WaitGroup
	out := make(chan E)

	output := func(c <-chan E) {
		defer wg.Done()
		for n := range c {
			select {
			case out <- n:
			case <-done:
				return
			}
		}
	}

	wg.Add(len(f))
	for _, c := range f {
		go output(c)
	}

	go func() {
		wg.Wait()
		close(out)
	}()

	return out
}
"#;

const PIPELINE: &str = r#"package gen

import (
	"sync"
)

//Any Recv Chan type matches can implement Pipeline
type X interface{}
type Pipeline <-chan X

//Related type is generated for you
type _Fan []Pipeline

func (pip Pipeline) Fan(done <-chan bool, workers int, fn func(X) X) Pipeline {
	return pip.FanOut(done, workers, fn).FanIn(done)
}

func (fan _Fan) FanIn(done <-chan bool) Pipeline {
	var wg sync.WaitGroup
	out := make(chan X)
	wg.Add(len(fan))
	go func() {
		wg.Wait()
		close(out)
	}()
	return out
}
"#;

const VARIADIC: &str = r#"package main

type T interface{}
type Variadic func(...T) T

func (v Variadic) Bind(b T) (bound Variadic) {
	bound = func(arg ...T) T {
		args := append([]T{b}, arg...)
		return v(args...)
	}
	return
}
"#;

const MAP_UTIL: &str = r#"package gen

type K interface{}
type V interface{}
type Map map[K]V

func (mp Map) Copy() Map {
	var newMap Map = make(map[K]V)
	for k, v := range mp {
		newMap[k] = v
	}
	return newMap
}

func (mp *Map) Init() {
	var newMap Map = make(map[K]V)
	mp = &newMap
}
"#;

const PROVIDER: &str = r#"package main

import (
	"fmt"
	"runtime"
)

//go:generate goast write impl fanin.go

type IntChans []<-chan int
type Ints []int

func main() {
	runtime.GOMAXPROCS(8)
	done := make(chan struct{})
	defer close(done)
	fmt.Println(len(Ints{1, 2, 3}))
}
"#;

fn type_names(module: &Module) -> Vec<&str> {
    module.type_decls().map(|decl| decl.name.as_str()).collect()
}

#[test]
fn test_parse_fan_in_template() {
    let module = parse_module(FAN_IN).unwrap();

    assert_eq!(module.package, "main");
    assert_eq!(module.imports[0].path, "sync");
    assert_eq!(type_names(&module), vec!["E", "Fan"]);

    let fan = module.type_decls().nth(1).unwrap();
    assert_eq!(
        fan.ty,
        TypeExpr::slice(TypeExpr::channel(ChanDir::Recv, TypeExpr::name("E")))
    );

    let fan_in = module.func_decls().next().unwrap();
    assert_eq!(fan_in.name, "FanIn");
    assert_eq!(
        fan_in.params.fields[0].ty,
        TypeExpr::channel(ChanDir::Recv, TypeExpr::Struct(FieldList::default()))
    );
    let body = fan_in.body.as_ref().unwrap();
    assert_eq!(body.identifiers().filter(|ident| *ident == "E").count(), 2);
}

#[test]
fn test_parse_pipeline_template_with_related_type() {
    let module = parse_module(PIPELINE).unwrap();

    assert_eq!(type_names(&module), vec!["X", "Pipeline", "_Fan"]);

    let methods: Vec<&str> = module.func_decls().map(|func| func.name.as_str()).collect();
    assert_eq!(methods, vec!["Fan", "FanIn"]);

    let fan = module.func_decls().next().unwrap();
    assert_eq!(fan.params.num_fields(), 3);
    assert!(matches!(
        fan.params.fields[2].ty,
        TypeExpr::Function { .. }
    ));
}

#[test]
fn test_parse_variadic_template() {
    let module = parse_module(VARIADIC).unwrap();
    let variadic = module.type_decls().nth(1).unwrap();

    match &variadic.ty {
        TypeExpr::Function { params, results } => {
            assert_eq!(
                params.fields[0].ty,
                TypeExpr::Variadic(Box::new(TypeExpr::name("T")))
            );
            assert_eq!(results.fields[0].ty, TypeExpr::name("T"));
        }
        other => panic!("Expected function type, got {:?}", other),
    }

    let bind = module.func_decls().next().unwrap();
    assert_eq!(bind.results.fields[0].names, vec!["bound".to_string()]);
}

#[test]
fn test_parse_map_template_with_pointer_receiver() {
    let module = parse_module(MAP_UTIL).unwrap();

    assert_eq!(type_names(&module), vec!["K", "V", "Map"]);
    let init = module.func_decls().nth(1).unwrap();
    let receiver = init.receiver.as_ref().unwrap();
    assert_eq!(receiver.fields[0].ty, TypeExpr::pointer(TypeExpr::name("Map")));
}

#[test]
fn test_parse_provider_with_functions_and_comments() {
    let module = parse_module(PROVIDER).unwrap();

    assert_eq!(type_names(&module), vec!["IntChans", "Ints"]);
    assert_eq!(module.imports.len(), 2);
    assert_eq!(module.func_decls().count(), 1);
}

#[test]
fn test_templates_survive_print_and_reparse() {
    for source in [FAN_IN, PIPELINE, VARIADIC, MAP_UTIL, PROVIDER] {
        let module = parse_module(source).unwrap();
        let printed = print_module(&module);
        let reparsed = parse_module(&printed).unwrap();

        let before: Vec<&TypeDecl> = module.type_decls().collect();
        let after: Vec<&TypeDecl> = reparsed.type_decls().collect();
        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(after.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.ty, b.ty);
        }

        let bodies_before: Vec<String> = module
            .func_decls()
            .filter_map(|func| func.body.as_ref().map(|body| body.to_string()))
            .collect();
        let bodies_after: Vec<String> = reparsed
            .func_decls()
            .filter_map(|func| func.body.as_ref().map(|body| body.to_string()))
            .collect();
        assert_eq!(bodies_before, bodies_after);
    }
}
