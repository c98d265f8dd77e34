//! Bootstrap phases: one module per step of the run.
//!
//! - **Step 1: Version gate** (`version`) - toolchain version marker check
//! - **Step 2: Submodule sync** (`submodules`) - `git submodule update --init`
//! - **Step 3: Dependency build** (`dependency`) - configure + make in the dependency tree
//! - **Step 4: Smoke build** (`smoke`) - build tool against a project target
//!
//! Each phase is independently testable against any `CommandRunner`.

pub mod dependency;
pub mod smoke;
pub mod submodules;
pub mod version;

pub use dependency::build_dependency;
pub use smoke::smoke_build;
pub use submodules::sync_submodules;
pub use version::{check_toolchain_version, extract_version, version_matches};
