// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Hand-off to an external schema compiler.
//!
//! The written files are passed as absolute paths after the configured
//! arguments. Nothing the compiler produces is read back.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

/// External compiler invocation, e.g. `protoc --java_out=gen`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCompiler {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl SchemaCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Command line for `files`, each made absolute against the current directory.
    pub fn command<P: AsRef<Path>>(&self, files: &[P]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command.args(files.iter().map(|f| absolute(f.as_ref())));
        command
    }

    /// Run the compiler and wait for it.
    pub fn invoke<P: AsRef<Path>>(&self, files: &[P]) -> Result<(), CompilerError> {
        info!(program = %self.program, files = files.len(), "invoking schema compiler");
        let status = self
            .command(files)
            .status()
            .map_err(|source| CompilerError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(CompilerError::Failed {
                program: self.program.clone(),
                status,
            })
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_uses_absolute_paths() {
        let compiler = SchemaCompiler::new("protoc").arg("--java_out=gen");
        let command = compiler.command(&["acme.proto"]);
        let args: Vec<PathBuf> = command.get_args().map(PathBuf::from).collect();
        assert_eq!(args[0], PathBuf::from("--java_out=gen"));
        assert!(args[1].is_absolute());
        assert!(args[1].ends_with("acme.proto"));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let compiler = SchemaCompiler::new("wiremodel-no-such-compiler");
        let err = compiler.invoke(&["a.proto"]).unwrap_err();
        assert!(matches!(err, CompilerError::Spawn { .. }));
    }
}
