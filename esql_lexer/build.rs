// build.rs - turns config/<profile>.toml into compile-time lexer limits
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

#[derive(serde::Deserialize)]
struct LimitsFile {
    lexical: LexicalSection,
    logging: LoggingSection,
}

#[derive(serde::Deserialize)]
struct LexicalSection {
    max_input_size: usize,
    max_token_count: usize,
    max_mode_depth: usize,
    max_reported_diagnostics: usize,
}

#[derive(serde::Deserialize)]
struct LoggingSection {
    log_buffer_size: usize,
    max_log_message_length: usize,
    security_min_log_level: u8,
}

/// Hard ceilings no profile may exceed
const CEILINGS: &[(&str, usize)] = &[
    ("max_input_size", 1_000_000_000),
    ("max_token_count", 100_000_000),
    ("max_mode_depth", 65_536),
    ("max_reported_diagnostics", 1_000_000),
    ("log_buffer_size", 100_000),
    ("max_log_message_length", 1_048_576),
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    for var in ["ESQL_BUILD_PROFILE", "ESQL_CONFIG_DIR"] {
        println!("cargo:rerun-if-env-changed={}", var);
    }

    let profile = env::var("ESQL_BUILD_PROFILE").unwrap_or_else(|_| "development".into());
    let path = profile_path(&profile);
    println!("cargo:rerun-if-changed={}", path.display());

    let text = fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Cannot read lexer profile {} ({}). Set ESQL_CONFIG_DIR or ESQL_BUILD_PROFILE.",
            path.display(),
            e
        )
    });
    let limits: LimitsFile = toml::from_str(&text)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", path.display(), e));

    if let Err(problem) = check_limits(&limits, &profile) {
        panic!("SECURITY: {} in {}", problem, path.display());
    }

    let out = PathBuf::from(env::var("OUT_DIR").expect("cargo sets OUT_DIR"));
    fs::write(out.join("constants.rs"), render(&limits, &profile))
        .expect("Failed to write generated constants");
}

/// `<workspace>/<ESQL_CONFIG_DIR or config>/<profile>.toml`
fn profile_path(profile: &str) -> PathBuf {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR"));
    let workspace = crate_dir.parent().map(PathBuf::from).unwrap_or(crate_dir);
    let config_dir = env::var("ESQL_CONFIG_DIR").unwrap_or_else(|_| "config".into());
    workspace.join(config_dir).join(format!("{}.toml", profile))
}

fn check_limits(limits: &LimitsFile, profile: &str) -> Result<(), String> {
    let values = [
        ("max_input_size", limits.lexical.max_input_size),
        ("max_token_count", limits.lexical.max_token_count),
        ("max_mode_depth", limits.lexical.max_mode_depth),
        ("max_reported_diagnostics", limits.lexical.max_reported_diagnostics),
        ("log_buffer_size", limits.logging.log_buffer_size),
        ("max_log_message_length", limits.logging.max_log_message_length),
    ];

    for (name, value) in values {
        let ceiling = CEILINGS
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, max)| *max)
            .unwrap_or(usize::MAX);
        if value == 0 || value > ceiling {
            return Err(format!("{} = {} must be within 1..={}", name, value, ceiling));
        }
    }

    if limits.logging.security_min_log_level > 2 {
        return Err("security_min_log_level must be 0 (error), 1 (warning), or 2 (info)".into());
    }
    if profile == "production" && limits.lexical.max_input_size > 50_000_000 {
        return Err("max_input_size above 50 MB is not allowed for production".into());
    }
    Ok(())
}

fn render(limits: &LimitsFile, profile: &str) -> String {
    let mut code = String::new();
    let _ = writeln!(code, "// Generated by build.rs from the `{}` profile; do not edit", profile);
    code.push_str("pub mod compile_time {\n    pub mod lexical {\n");
    for (name, value) in [
        ("MAX_INPUT_SIZE", limits.lexical.max_input_size),
        ("MAX_TOKEN_COUNT", limits.lexical.max_token_count),
        ("MAX_MODE_DEPTH", limits.lexical.max_mode_depth),
        ("MAX_REPORTED_DIAGNOSTICS", limits.lexical.max_reported_diagnostics),
    ] {
        let _ = writeln!(code, "        pub const {}: usize = {};", name, value);
    }
    code.push_str("    }\n\n    pub mod logging {\n");
    let _ = writeln!(code, "        pub const LOG_BUFFER_SIZE: usize = {};", limits.logging.log_buffer_size);
    let _ = writeln!(
        code,
        "        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};",
        limits.logging.max_log_message_length
    );
    let _ = writeln!(
        code,
        "        pub const SECURITY_MIN_LOG_LEVEL: u8 = {};",
        limits.logging.security_min_log_level
    );
    code.push_str("    }\n}\n");
    code
}
