use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use neander_asm::config::DEFAULT_OUTPUT;
use neander_asm::{AsmError, ErrorKind, assemble_reader, tui};

#[derive(Parser, Debug)]
#[command(version, about = "Assembler for the Neander teaching CPU", long_about = None)]
struct Args {
    /// Assembly source file
    source: PathBuf,

    /// Output memory image
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Open the interactive workbench instead of writing the image
    #[arg(long)]
    tui: bool,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[arg(short, long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let subscriber = tracing_subscriber::fmt().with_max_level(args.log_level);
    if args.tui {
        // stderr would draw over the alternate screen
        subscriber.with_writer(io::sink).init();
    } else {
        subscriber.with_writer(io::stderr).init();
    }

    let result = if args.tui {
        tui::run(&args.source, &args.output).map_err(AsmError::Io)
    } else {
        assemble_file(&args.source, &args.output)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e, args.tui, io::stderr()),
    }
}

fn assemble_file(source: &Path, output: &Path) -> Result<(), AsmError> {
    let input = File::open(source)?;
    let image = assemble_reader(BufReader::new(input))?;
    image.save(output)?;
    Ok(())
}

// The workbench logs to a sink, so its final error goes straight to stderr
// once the terminal has been restored.
fn report<W: Write>(err: &AsmError, tui: bool, mut stderr: W) -> ExitCode {
    if tui {
        let _ = writeln!(stderr, "neander-asm: {err}");
    } else {
        tracing::error!("{err}");
    }
    ExitCode::from(exit_status(err.kind()))
}

// 2 is left to clap for usage errors.
fn exit_status(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Io => 1,
        ErrorKind::Grammar => 3,
        ErrorKind::Semantic => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("neander-asm-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_exit_status_per_error_kind() {
        assert_eq!(exit_status(ErrorKind::Io), 1);
        assert_eq!(exit_status(ErrorKind::Grammar), 3);
        assert_eq!(exit_status(ErrorKind::Semantic), 4);
    }

    #[test]
    fn test_exactly_one_source() {
        assert!(Args::try_parse_from(["neander-asm"]).is_err());
        assert!(Args::try_parse_from(["neander-asm", "a.asm", "b.asm"]).is_err());

        let args = Args::try_parse_from(["neander-asm", "a.asm"]).unwrap();
        assert_eq!(args.source, PathBuf::from("a.asm"));
        assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT));
        assert!(!args.tui);
        assert_eq!(args.log_level, Level::INFO);
    }

    #[test]
    fn test_usage_error_is_exit_two() {
        let err = Args::try_parse_from(["neander-asm"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_assemble_file_writes_image() {
        let dir = scratch_dir("ok");
        let source = dir.join("ok.asm");
        let output = dir.join("bytecode.mem");
        fs::write(&source, ".CODE\nLDA 0x0A\nHLT\n").unwrap();

        assemble_file(&source, &output).unwrap();
        assert_eq!(
            fs::read(&output).unwrap(),
            vec![0x03, 0x4E, 0x44, 0x52, 0x20, 0, 0x0A, 0, 0xF0, 0]
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_translation_writes_nothing() {
        let dir = scratch_dir("bad");
        let output = dir.join("bytecode.mem");

        for (name, text, kind) in [
            ("semantic.asm", "NOP\nXYZ\n", ErrorKind::Semantic),
            ("grammar.asm", ".DATA\n5\n", ErrorKind::Grammar),
        ] {
            let source = dir.join(name);
            fs::write(&source, text).unwrap();
            let err = assemble_file(&source, &output).unwrap_err();
            assert_eq!(err.kind(), kind);
            assert!(!output.exists(), "{}", name);
        }

        let err = assemble_file(&dir.join("missing.asm"), &output).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!output.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_workbench_error_reaches_stderr() {
        let err = AsmError::Io(io::Error::new(io::ErrorKind::Other, "no tty"));
        let mut stderr = Vec::new();
        report(&err, true, &mut stderr);
        assert_eq!(
            String::from_utf8(stderr).unwrap(),
            "neander-asm: failed to read source: no tty\n"
        );

        let mut quiet = Vec::new();
        report(&err, false, &mut quiet);
        assert!(quiet.is_empty());
    }
}
