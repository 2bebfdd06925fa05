use std::error::Error;
use std::io::{self, Write};

use tracing::{info, warn};

use genix::cli::{self, CliArgs, ConfigFile};
use genix::config::Config;
use genix::logging;
use genix::shell::Shell;
use genix::term::{Console, Styler};
use genix::vfs::Vfs;

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("genix: {e}");
            eprintln!("{}", cli::USAGE);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("genix: {e}");
        std::process::exit(1);
    }
}

fn load_config(which: &ConfigFile) -> Config {
    let path = match which {
        ConfigFile::Skip => return Config::default(),
        ConfigFile::Explicit(p) => Some(p.clone()),
        ConfigFile::Search => cli::find_user_config(),
    };
    let Some(path) = path else { return Config::default() };

    match Config::load_file(&path) {
        Ok((config, errors)) => {
            for e in errors {
                eprintln!("genix: warning: {}: {e}", path.display());
            }
            config
        }
        Err(e) => {
            eprintln!("genix: warning: {}: {e}", path.display());
            Config::default()
        }
    }
}

fn run(args: CliArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args.config);
    logging::init(config.log.as_deref(), args.debug);

    let root = cli::resolve_root(args.root.as_ref(), config.root.as_ref());
    let vfs = Vfs::open(&root)?;
    info!(root = %root.display(), "project root");

    let shell = Shell::new(vfs);
    let styler = Styler::detect(config.color);

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    let mut err = io::stderr();
    let mut con = Console::new(&mut input, &mut out, &mut err, styler);

    match args.command {
        Some(cmd) => {
            shell.execute(&cmd, &mut con)?;
        }
        None => {
            if !args.quiet {
                print_banner(&mut con)?;
            }
            shell.run(&mut con)?;
        }
    }

    if let Err(e) = con.out.flush() {
        warn!(error = %e, "flushing stdout");
    }
    Ok(())
}

fn print_banner(con: &mut Console<'_>) -> io::Result<()> {
    let ver = env!("CARGO_PKG_VERSION");
    writeln!(con.out, "Genix shell {ver}")?;
    writeln!(con.out, "Type 'help' for commands, 'exit' to quit.")
}
