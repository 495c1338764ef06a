//! Compile a C file with gcc and run the result.

use crate::core::error::PxError;
use crate::core::executor::bashx;
use std::path::Path;
use tracing::info;

pub const OPT_LEVELS: [&str; 7] = ["0", "1", "2", "3", "s", "g", "fast"];

/// `gcc -O<level> <file> -o a.out && ./a.out`
pub fn build_command(file: &Path, level: &str) -> Result<String, PxError> {
    if !OPT_LEVELS.contains(&level) {
        return Err(PxError::Input(format!(
            "invalid optimization level {:?}, expected one of {}",
            level,
            OPT_LEVELS.join(", ")
        )));
    }
    let file = shell_quote(&file.to_string_lossy());
    Ok(format!("gcc -O{} {} -o a.out && ./a.out", level, file))
}

/// Compile and run `file`, streaming output. Returns the shell's exit code.
pub fn compile_and_run(file: &Path, level: &str) -> Result<i32, PxError> {
    which::which("gcc").map_err(|_| PxError::MissingTool("gcc".to_string()))?;
    if !file.is_file() {
        return Err(PxError::Input(format!("{} is not a file", file.display())));
    }
    let cmd = build_command(file, level)?;
    info!(command = %cmd, "runc");
    bashx(&cmd)
}

fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+'));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}
