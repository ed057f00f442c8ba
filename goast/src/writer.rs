//! Output file naming and writing

use crate::config::Settings;
use crate::error::{CliError, CliResult};
use goast_parser::print_module;
use goast_specializer::Specialization;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A rendered specialization and where it goes
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: String,
}

/// `lowercase(prefix + candidate + "_" + template + suffix + ".go")`
pub fn output_file_name(prefix: &str, candidate: &str, template: &str, suffix: &str) -> String {
    format!("{}{}_{}{}.go", prefix, candidate, template, suffix).to_lowercase()
}

/// `name.go` becomes `name_<index>.go`
fn indexed(name: &str, index: usize) -> String {
    match name.strip_suffix(".go") {
        Some(stem) => format!("{}_{}.go", stem, index),
        None => format!("{}_{}", name, index),
    }
}

/// Name and render every specialization. Later outputs whose name is taken get
/// their position appended, counting up until the name is free.
pub fn plan_outputs(
    outputs: &[Specialization],
    template_path: &Path,
    directory: &Path,
    settings: &Settings,
) -> Vec<OutputFile> {
    let template = template_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut taken = HashSet::new();
    outputs
        .iter()
        .enumerate()
        .map(|(index, output)| {
            let mut name =
                output_file_name(&settings.prefix, &output.name, &template, &settings.suffix);
            if !taken.insert(name.clone()) {
                let base = name;
                let mut attempt = index;
                name = indexed(&base, attempt);
                while !taken.insert(name.clone()) {
                    attempt += 1;
                    name = indexed(&base, attempt);
                }
            }
            OutputFile {
                path: directory.join(name),
                contents: print_module(&output.module),
            }
        })
        .collect()
}

pub fn write_outputs(files: &[OutputFile]) -> CliResult<()> {
    for file in files {
        if let Some(parent) = file.path.parent() {
            fs::create_dir_all(parent).map_err(|source| CliError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&file.path, &file.contents).map_err(|source| CliError::Write {
            path: file.path.clone(),
            source,
        })?;
        info!(path = %file.path.display(), "wrote specialization");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use goast_parser::Module;
    use goast_specializer::{SpecializeOptions, Substitution};
    use tempfile::TempDir;

    fn settings(prefix: &str, suffix: &str) -> Settings {
        Settings {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            output_dir: None,
            options: SpecializeOptions::default(),
        }
    }

    fn specialization(name: &str) -> Specialization {
        Specialization {
            name: name.to_string(),
            module: Module::new("main"),
            substitution: Substitution::new(),
        }
    }

    #[test]
    fn test_output_file_name_is_lowercase() {
        assert_eq!(
            output_file_name("", "IntChans", "fanin", ""),
            "intchans_fanin.go"
        );
        assert_eq!(
            output_file_name("Gen_", "StringInts", "maputil", "_Impl"),
            "gen_stringints_maputil_impl.go"
        );
    }

    #[test]
    fn test_plan_outputs_uses_template_stem_and_directory() {
        let outputs = vec![specialization("IntChans"), specialization("Ints")];
        let files = plan_outputs(
            &outputs,
            Path::new("gen/sendslice.go"),
            Path::new("out"),
            &settings("", ""),
        );

        let paths: Vec<PathBuf> = files.iter().map(|file| file.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/intchans_sendslice.go"),
                PathBuf::from("out/ints_sendslice.go"),
            ]
        );
        assert_eq!(files[0].contents, "package main\n");
    }

    #[test]
    fn test_colliding_names_are_indexed() {
        // Names differing only in case collide once lowercased
        let outputs = vec![
            specialization("Ints"),
            specialization("ints"),
            specialization("INTS"),
        ];
        let files = plan_outputs(&outputs, Path::new("slice.go"), Path::new("."), &settings("", ""));

        let names: Vec<String> = files
            .iter()
            .map(|file| file.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["ints_slice.go", "ints_slice_1.go", "ints_slice_2.go"]
        );
    }

    #[test]
    fn test_indexed_names_skip_names_already_taken() {
        let outputs = vec![
            specialization("Ints_2"),
            specialization("Ints"),
            specialization("ints"),
        ];
        let files = plan_outputs(&outputs, Path::new("2.go"), Path::new("."), &settings("", ""));

        let names: Vec<String> = files
            .iter()
            .map(|file| file.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["ints_2_2.go", "ints_2.go", "ints_2_3.go"]);
    }

    #[test]
    fn test_write_outputs_creates_directories() {
        let dir = TempDir::new().unwrap();
        let files = vec![OutputFile {
            path: dir.path().join("nested/out/ints_slice.go"),
            contents: "package main\n".to_string(),
        }];

        write_outputs(&files).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("nested/out/ints_slice.go")).unwrap(),
            "package main\n"
        );
    }
}
