//! Include-discovery tests over real files.

use indoc::indoc;

use crate::pp::{LangOptions, Preprocessor};
use crate::source::SourceManager;

fn write(dir: &std::path::Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn discovers_transitive_includes() {
    let dir = tempfile::tempdir().unwrap();
    let sys = tempfile::tempdir().unwrap();
    write(dir.path(), "a.h", "#include \"c.h\"\nint a;\n");
    write(dir.path(), "c.h", "int c;\n");
    write(sys.path(), "b.h", "int b;\n");
    let main = write(
        dir.path(),
        "main.c",
        indoc! {r#"
            #include "a.h"
            #include <b.h>
            int main(void) { return 0; }
        "#},
    );

    let mut sm = SourceManager::new();
    let main_id = sm.load_file(&main).unwrap();
    let mut pp = Preprocessor::new(sm, main_id, LangOptions::default());
    pp.add_include_dir(sys.path());
    pp.enter_main_source_file();

    assert_eq!(pp.source_manager().file_count(), 4);
    assert!(pp.source_manager().lookup(&dir.path().join("a.h")).is_some());
    assert!(pp.source_manager().lookup(&dir.path().join("c.h")).is_some());
    assert!(pp.source_manager().lookup(&sys.path().join("b.h")).is_some());
}

#[test]
fn unresolvable_include_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(dir.path(), "main.c", "#include <no_such_header.h>\nint x;\n");

    let mut sm = SourceManager::new();
    let main_id = sm.load_file(&main).unwrap();
    let mut pp = Preprocessor::new(sm, main_id, LangOptions::default());
    pp.enter_main_source_file();

    assert_eq!(pp.source_manager().file_count(), 1);
}

#[test]
fn include_cycles_terminate() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "x.h", "#include \"y.h\"\n");
    write(dir.path(), "y.h", "#include \"x.h\"\n");
    let main = write(dir.path(), "main.c", "#include \"x.h\"\n");

    let mut sm = SourceManager::new();
    let main_id = sm.load_file(&main).unwrap();
    let mut pp = Preprocessor::new(sm, main_id, LangOptions::default());
    pp.enter_main_source_file();

    assert_eq!(pp.source_manager().file_count(), 3);
}

#[test]
fn quoted_includes_prefer_the_including_directory() {
    let dir = tempfile::tempdir().unwrap();
    let sys = tempfile::tempdir().unwrap();
    write(dir.path(), "dup.h", "int local;\n");
    write(sys.path(), "dup.h", "int system;\n");
    let main = write(dir.path(), "main.c", "#include \"dup.h\"\n");

    let mut sm = SourceManager::new();
    let main_id = sm.load_file(&main).unwrap();
    let mut pp = Preprocessor::new(sm, main_id, LangOptions::default());
    pp.add_include_dir(sys.path());
    pp.enter_main_source_file();

    assert!(pp.source_manager().lookup(&dir.path().join("dup.h")).is_some());
    assert!(pp.source_manager().lookup(&sys.path().join("dup.h")).is_none());
}

#[test]
fn lookup_identifier_interns_once() {
    let mut sm = SourceManager::new();
    let id = sm.add_buffer("/main.c", "foo foo bar");
    let mut pp = Preprocessor::new(sm, id, LangOptions::default());

    let text = pp.source_manager().file(id).text().unwrap().clone();
    let mut lex = crate::lexer::RawLexer::new(&text, id);
    let a = lex.lex_raw();
    let b = lex.lex_raw();
    let c = lex.lex_raw();

    let ia = pp.lookup_identifier(&a);
    let ib = pp.lookup_identifier(&b);
    let ic = pp.lookup_identifier(&c);
    assert_eq!(ia, ib);
    assert_ne!(ia, ic);
    assert_eq!(pp.spelling(&c), "bar");
    assert_eq!(pp.ident_table().name(ic), "bar");
}
