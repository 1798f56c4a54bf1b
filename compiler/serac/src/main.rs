//! Sera serializer resolution CLI.

use std::error::Error;

fn main() {
    serac::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let Some(first) = args.first() else {
        print_usage();
        return;
    };
    match first.as_str() {
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "version" | "--version" | "-V" => {
            println!("serac {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        _ => {}
    }

    match serac::parse_args(&args).and_then(|options| serac::run(&options)) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            let usage = matches!(err, serac::DriverError::Usage(_));
            report(&err);
            if usage {
                eprintln!();
                eprintln!("Run `serac --help` for usage.");
            }
            std::process::exit(1);
        }
    }
}

/// Print `err` and its causes, outermost first.
fn report(err: &dyn Error) {
    eprintln!("error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}

fn print_usage() {
    println!("Sera serializer resolution");
    println!();
    println!("Usage: serac <model.json> [options]");
    println!();
    println!("Reads a JSON model description, resolves a serializer for every");
    println!("serializable type of its current module, and prints the manifest.");
    println!();
    println!("Options:");
    println!("  --platform=<tag>         Platform tag copied into the manifest (default: Windows)");
    println!("  --freeze=<profile>       Freeze a profile after referenced registrations load");
    println!("  --system-prefix=<name>   Skip referenced modules with this name prefix");
    println!("  --key-container=<name>   Treat static fields of this generic type as keys");
    println!("  --format=<text|json>     Output format (default: text)");
    println!("  help, --help             Show this help message");
    println!("  version, --version       Show version information");
    println!();
    println!("Logging:");
    println!("  RUST_LOG=sera_resolve=debug serac model.json");
}
