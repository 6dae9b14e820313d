// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: package name
fn name_arg() -> Arg {
    Arg::new("name").required(true).help("Package name")
}

/// Common argument: optional version
fn version_arg() -> Arg {
    Arg::new("version").help("Version (default: the recipe's default version)")
}

fn build_cli() -> Command {
    Command::new("pantry")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Pantry Contributors")
        .about("Package build recipes with pinned source checksums")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .global(true)
                .env("PANTRY_CONFIG")
                .help("Configuration file (default: ~/.config/pantry/config.toml)"),
        )
        .arg(
            Arg::new("recipes")
                .long("recipes")
                .value_name("DIR")
                .global(true)
                .action(ArgAction::Append)
                .help("Additional recipe directory, scanned after the configured ones"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (-v debug, -vv trace); RUST_LOG takes precedence"),
        )
        .subcommand(Command::new("list").about("List known recipes"))
        .subcommand(
            Command::new("info")
                .about("Show a recipe's metadata, versions and dependencies")
                .arg(name_arg()),
        )
        .subcommand(
            Command::new("url")
                .about("Print the source archive URL for a version")
                .arg(name_arg())
                .arg(version_arg()),
        )
        .subcommand(
            Command::new("checksum")
                .about("Print the SHA-256 of a file")
                .arg(Arg::new("file").required(true).help("File to hash")),
        )
        .subcommand(
            Command::new("verify")
                .about("Verify a local archive against a recipe's declared checksum")
                .arg(name_arg())
                .arg(Arg::new("version").required(true).help("Version the archive claims to be"))
                .arg(Arg::new("archive").required(true).help("Archive to verify")),
        )
        .subcommand(
            Command::new("fetch")
                .about("Download and verify a source archive into the source cache")
                .arg(name_arg())
                .arg(version_arg())
                .arg(
                    Arg::new("source_cache")
                        .long("source-cache")
                        .value_name("DIR")
                        .help("Source cache directory (overrides the configuration)"),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Download even if a verified copy is cached"),
                ),
        )
        .subcommand(
            Command::new("configure")
                .about("Show the configure invocation for a recipe")
                .arg(name_arg())
                .arg(
                    Arg::new("prefix")
                        .long("prefix")
                        .default_value("/usr/local")
                        .help("Installation prefix"),
                )
                .arg(Arg::new("compiler").long("compiler").help("Compiler (name or name@version)"))
                .arg(Arg::new("target").long("target").help("Target triple"))
                .arg(
                    Arg::new("variant")
                        .long("variant")
                        .action(ArgAction::Append)
                        .help("Variant setting (+name, ~name)"),
                ),
        )
        .subcommand(
            Command::new("deps")
                .about("Check a recipe's dependencies against installed packages")
                .arg(name_arg())
                .arg(
                    Arg::new("installed")
                        .long("installed")
                        .value_name("NAME@VERSION")
                        .num_args(1..)
                        .help("Installed packages as name@version"),
                )
                .arg(
                    Arg::new("phase")
                        .long("phase")
                        .value_parser(["build", "link", "run", "test"])
                        .help("Only check dependencies of this phase"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate recipe files")
                .arg(Arg::new("dir").help("Recipe directory (default: every configured recipe)")),
        )
        .subcommand(
            Command::new("lock")
                .about("Record published checksums in the lock file")
                .arg(
                    Arg::new("check")
                        .long("check")
                        .action(ArgAction::SetTrue)
                        .help("Only check for changed checksums, do not write"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("pantry.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
