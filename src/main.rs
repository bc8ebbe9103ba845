use std::{
    fs,
    io::{self, Read},
    process::ExitCode,
};

use clap::Parser;
use retread::{Config, DEFAULT_MAX_CALL_DEPTH, error::EXIT_SCRIPT_ERROR, run};
use tracing_subscriber::EnvFilter;

/// retread runs scripts written in a small imperative language by replaying
/// their token stream.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells retread to treat `contents` as the path of a script file.
    #[arg(short, long, requires = "contents")]
    file: bool,

    /// Maximum depth of nested procedure calls.
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Raise the log level: once for debug, twice for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// The script itself, or its path with `--file`. Read from standard
    /// input when absent.
    contents: Option<String>,
}

fn install_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter)
                                     .with_writer(io::stderr)
                                     .try_init();
}

fn read_script(args: &Args) -> io::Result<String> {
    match &args.contents {
        Some(path) if args.file => fs::read_to_string(path),
        Some(contents) => Ok(contents.clone()),
        None => {
            let mut script = String::new();
            io::stdin().read_to_string(&mut script)?;
            Ok(script)
        },
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    install_tracing(args.verbose);

    let script = match read_script(&args) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Failed to read the script: {e}");
            return ExitCode::from(EXIT_SCRIPT_ERROR);
        },
    };

    let config = Config { max_call_depth: args.max_call_depth };
    let stdout = io::stdout();
    match run(&script, &config, stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_flag_reads_contents_as_a_path() {
        let path = std::env::temp_dir().join(format!("retread-cli-{}.rt", std::process::id()));
        fs::write(&path, "eval 1;").unwrap();

        let args = Args::try_parse_from(["retread", "-f", path.to_str().unwrap()]).unwrap();
        assert!(args.file);
        assert_eq!(read_script(&args).unwrap(), "eval 1;");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn positional_contents_is_the_script() {
        let args = Args::try_parse_from(["retread", "--max-call-depth", "8", "eval 2;"]).unwrap();
        assert!(!args.file);
        assert_eq!(args.max_call_depth, 8);
        assert_eq!(read_script(&args).unwrap(), "eval 2;");
    }

    #[test]
    fn file_flag_needs_a_path() {
        assert!(Args::try_parse_from(["retread", "--file"]).is_err());
    }
}
