use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_PACKAGE: &str = "ebs_backup_lambda";
const LAMBDA_BINARIES: [&str; 2] = ["region_sweep_lambda", "tag_snapshot_lambda"];
const DIST_DIR: &str = "infra/dist";

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the EBS snapshot automation workspace",
    long_about = "A unified CLI for CI checks and Lambda packaging in the\n\
                  EBS snapshot automation workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci,
    /// Build and package both Lambda binaries as deployment zips
    ServerlessPackage {
        /// Compilation target triple for Lambda binaries
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for binaries
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    fn as_cargo_flag(self) -> Option<&'static str> {
        match self {
            Self::Debug => None,
            Self::Release => Some("--release"),
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

/// One Lambda binary and the deployment zip built from it.
struct LambdaArtifact {
    bin_name: &'static str,
    binary_path: PathBuf,
    zip_path: PathBuf,
}

impl LambdaArtifact {
    fn new(bin_name: &'static str, target: &str, profile: BuildProfile) -> Self {
        let executable = if target.contains("windows") {
            format!("{bin_name}.exe")
        } else {
            bin_name.to_string()
        };
        Self {
            bin_name,
            binary_path: Path::new("target")
                .join(target)
                .join(profile.dir_name())
                .join(executable),
            zip_path: Path::new(DIST_DIR).join(format!("{bin_name}.zip")),
        }
    }

    /// Writes the binary into the zip root as `bootstrap`, the entry point
    /// Lambda custom runtimes execute.
    fn package(&self) -> Result<(), String> {
        let binary = match fs::read(&self.binary_path) {
            Ok(binary) => binary,
            Err(error) => {
                let path = self.binary_path.display();
                return Err(format!("expected {} binary at '{path}': {error}", self.bin_name));
            }
        };
        match self.write_zip(&binary) {
            Ok(()) => Ok(()),
            Err(error) => Err(format!("failed to write '{}': {error}", self.zip_path.display())),
        }
    }

    fn write_zip(&self, binary: &[u8]) -> zip::result::ZipResult<()> {
        let mut zip = ZipWriter::new(fs::File::create(&self.zip_path)?);
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o755);
        zip.start_file("bootstrap", options)?;
        zip.write_all(binary)?;
        zip.finish()?;
        Ok(())
    }
}

fn package_serverless_lambdas(target: &str, profile: BuildProfile) -> Result<(), String> {
    check_target_installed(target)?;

    step("Build lambda binaries");
    let mut cargo_args = vec!["build", "-p", LAMBDA_PACKAGE, "--target", target];
    for bin_name in LAMBDA_BINARIES {
        cargo_args.extend(["--bin", bin_name]);
    }
    if let Some(flag) = profile.as_cargo_flag() {
        cargo_args.push(flag);
    }
    run_cargo(&cargo_args);

    step("Package lambda zip artifacts");
    if let Err(error) = fs::create_dir_all(DIST_DIR) {
        return Err(format!("failed to create {DIST_DIR}: {error}"));
    }
    for bin_name in LAMBDA_BINARIES {
        let artifact = LambdaArtifact::new(bin_name, target, profile);
        artifact.package()?;
        eprintln!("- {}", artifact.zip_path.display());
    }
    Ok(())
}

/// Fails early when the cross target is missing. Without rustup the build
/// itself reports the problem.
fn check_target_installed(target: &str) -> Result<(), String> {
    let Ok(output) = Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
    else {
        eprintln!("warning: rustup not available; skipping target check for {target}");
        return Ok(());
    };

    let installed = String::from_utf8_lossy(&output.stdout);
    if installed.lines().any(|line| line.trim() == target) {
        return Ok(());
    }
    Err(format!("rust target `{target}` is missing; run `rustup target add {target}`"))
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test ebs_backup_core");
    run_cargo(&["test", "-p", "ebs_backup_core"]);

    step("Test ebs_backup_lambda");
    run_cargo(&["test", "-p", LAMBDA_PACKAGE]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci => ci_check(),
        Commands::ServerlessPackage { target, profile } => {
            if let Err(message) = package_serverless_lambdas(&target, profile) {
                eprintln!("error: {message}");
                exit(1);
            }
        }
    }
}
