//! Working-directory scoping against real subprocesses.
//!
//! Each test builds a throwaway source tree whose `configure`, `make`,
//! `ocaml`, `git`, and `ocamlbuild` are small shell scripts, then runs the
//! steps through `SystemRunner`.

#![cfg(unix)]

use fimage_bootstrap::error::BootstrapError;
use fimage_bootstrap::models::{BootstrapConfig, DependencyConfig, SmokeBuildConfig};
use fimage_bootstrap::orchestrator::{build_dependency, smoke_build, Bootstrap, BootstrapPhase};
use fimage_bootstrap::system::{SystemRunner, WorkdirGuard};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

static CWD_LOCK: Mutex<()> = Mutex::new(());

fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
    let mut perms = fs::metadata(path).expect("Failed to stat script").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("Failed to chmod script");
}

fn cwd() -> PathBuf {
    std::env::current_dir()
        .and_then(|dir| dir.canonicalize())
        .expect("cwd should be readable")
}

/// Source tree with an `llvm/` whose configure/make scripts record their arguments.
fn create_tree(configure_exit: i32) -> TempDir {
    let tree = TempDir::new().expect("Failed to create temp dir");
    let llvm = tree.path().join("llvm");
    let src = tree.path().join("src");
    fs::create_dir(&llvm).unwrap();
    fs::create_dir(&src).unwrap();

    write_script(
        &llvm.join("configure"),
        &format!("echo \"$@\" > configured.txt\nexit {}", configure_exit),
    );
    write_script(&llvm.join("fake-make"), "echo \"$@\" > built.txt");
    write_script(&src.join("fake-ocamlbuild"), "echo \"$@\" > target.txt");
    write_script(
        &tree.path().join("fake-ocaml"),
        "echo 'The OCaml toplevel, version 3.12.1'",
    );
    write_script(&tree.path().join("fake-git"), "echo \"$@\" > submodules.txt");
    tree
}

fn test_config() -> BootstrapConfig {
    let mut config = BootstrapConfig::default();
    config.toolchain.program = "./fake-ocaml".to_string();
    config.submodules.program = "./fake-git".to_string();
    config.dependency.build_program = "./fake-make".to_string();
    config.smoke.build_tool = "./fake-ocamlbuild".to_string();
    config
}

fn with_tree<T>(configure_exit: i32, test: impl FnOnce(&Path) -> T) -> T {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let tree = create_tree(configure_exit);
    let root = tree.path().canonicalize().unwrap();
    let _guard = WorkdirGuard::enter(&root).unwrap();
    test(&root)
}

// ============================================================================
// WorkdirGuard
// ============================================================================

#[test]
fn test_guard_restores_on_drop() {
    with_tree(0, |root| {
        {
            let guard = WorkdirGuard::enter("llvm").unwrap();
            assert_eq!(cwd(), root.join("llvm"));
            assert_eq!(guard.previous().canonicalize().unwrap(), root);
        }
        assert_eq!(cwd(), root);
    });
}

#[test]
fn test_nested_guards_unwind_in_order() {
    with_tree(0, |root| {
        fs::create_dir(root.join("llvm/tools")).unwrap();
        {
            let _outer = WorkdirGuard::enter("llvm").unwrap();
            {
                let _inner = WorkdirGuard::enter("tools").unwrap();
                assert_eq!(cwd(), root.join("llvm/tools"));
            }
            assert_eq!(cwd(), root.join("llvm"));
        }
        assert_eq!(cwd(), root);
    });
}

#[test]
fn test_guard_restores_on_early_return() {
    fn fails_inside(dir: &str) -> fimage_bootstrap::Result<()> {
        let _guard = WorkdirGuard::enter(dir)?;
        Err(BootstrapError::CommandFailed {
            command: "make -j12".to_string(),
            code: Some(2),
        })
    }

    with_tree(0, |root| {
        assert!(fails_inside("llvm").is_err());
        assert_eq!(cwd(), root);
    });
}

#[test]
fn test_entering_missing_directory_leaves_cwd_alone() {
    with_tree(0, |root| {
        let result = WorkdirGuard::enter("does-not-exist");
        match result {
            Err(BootstrapError::Workdir { path, .. }) => {
                assert_eq!(path, PathBuf::from("does-not-exist"));
            }
            other => panic!("expected workdir error, got: {:?}", other.map(|_| ())),
        }
        assert_eq!(cwd(), root);
    });
}

// ============================================================================
// Steps with SystemRunner
// ============================================================================

#[test]
fn test_build_dependency_runs_configure_then_build_in_directory() {
    with_tree(0, |root| {
        let dependency = DependencyConfig {
            build_program: "./fake-make".to_string(),
            ..DependencyConfig::default()
        };

        build_dependency(&SystemRunner::new(), &dependency)
            .expect("dependency build should succeed");

        assert_eq!(cwd(), root);
        assert_eq!(
            fs::read_to_string(root.join("llvm/configured.txt")).unwrap(),
            "--enable-assertions --enable-targets=all\n"
        );
        assert_eq!(fs::read_to_string(root.join("llvm/built.txt")).unwrap(), "-j12\n");
    });
}

#[test]
fn test_failed_configure_skips_build_and_restores_directory() {
    with_tree(3, |root| {
        let dependency = DependencyConfig {
            build_program: "./fake-make".to_string(),
            ..DependencyConfig::default()
        };

        let err = build_dependency(&SystemRunner::new(), &dependency).unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert!(root.join("llvm/configured.txt").exists());
        assert!(!root.join("llvm/built.txt").exists());
        assert_eq!(cwd(), root);
    });
}

#[test]
fn test_smoke_build_runs_in_source_directory() {
    with_tree(0, |root| {
        let smoke = SmokeBuildConfig {
            build_tool: "./fake-ocamlbuild".to_string(),
            ..SmokeBuildConfig::default()
        };

        smoke_build(&SystemRunner::new(), &smoke).expect("smoke build should succeed");

        assert_eq!(
            fs::read_to_string(root.join("src/target.txt")).unwrap(),
            "fimage.top\n"
        );
        assert_eq!(cwd(), root);
    });
}

#[test]
fn test_end_to_end_with_real_processes() {
    with_tree(0, |root| {
        let mut out = Vec::new();
        let phase = {
            let mut bootstrap =
                Bootstrap::with_output(test_config(), SystemRunner::new(), &mut out);
            bootstrap.run().expect("bootstrap should succeed");
            bootstrap.state().phase
        };

        assert_eq!(phase, BootstrapPhase::Completed);
        assert_eq!(
            fs::read_to_string(root.join("submodules.txt")).unwrap(),
            "submodule update --init --recursive\n"
        );
        assert!(root.join("llvm/built.txt").exists());
        assert!(root.join("src/target.txt").exists());
        assert_eq!(cwd(), root);

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("The OCaml toplevel, version 3.12.1\n...OK!\n"));
    });
}
