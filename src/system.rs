use std::env;
use std::path::Path;
use std::process::Command;

/// Shell families, each with its own "run this string" flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Cmd,        // Windows Command Prompt
    PowerShell, // Windows PowerShell or PowerShell Core
    UnixLike,   // Bash, Zsh, Sh, etc.
    Fish,
}

impl ShellType {
    fn command_flag(self) -> &'static str {
        match self {
            ShellType::Cmd => "/C",
            ShellType::PowerShell => "-Command",
            ShellType::UnixLike | ShellType::Fish => "-c",
        }
    }
}

/// The shell used to run command strings, plus a one-line OS description
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os_info: String,
    pub shell_path: String,
    pub shell_type: ShellType,
}

impl SystemInfo {
    pub fn detect() -> Self {
        let info = os_info::get();
        let os_info = format!("{} {} {}", info.os_type(), info.version(), info.bitness());
        let (shell_path, shell_type) = detect_shell();

        SystemInfo {
            os_info,
            shell_path,
            shell_type,
        }
    }

    /// Build a `Command` that hands `script` to the shell verbatim.
    pub fn shell_command(&self, script: &str) -> Command {
        let mut cmd = Command::new(&self.shell_path);
        cmd.arg(self.shell_type.command_flag()).arg(script);
        cmd
    }
}

fn detect_shell() -> (String, ShellType) {
    if cfg!(target_os = "windows") {
        if env::var("PSModulePath").is_ok() {
            if let Ok(posh_path) = env::var("POSH_EXECUTABLE") {
                if Path::new(&posh_path).exists() {
                    return (posh_path, ShellType::PowerShell);
                }
            }
            return ("powershell.exe".to_string(), ShellType::PowerShell);
        }
        (
            env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string()),
            ShellType::Cmd,
        )
    } else {
        // Shells we don't know how to drive fall back to /bin/sh.
        let shell_path = env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
        let shell_name = Path::new(&shell_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("sh")
            .to_lowercase();

        match shell_name.as_str() {
            "fish" => (shell_path, ShellType::Fish),
            "sh" | "bash" | "zsh" | "dash" | "ksh" => (shell_path, ShellType::UnixLike),
            _ => ("/bin/sh".to_string(), ShellType::UnixLike),
        }
    }
}
