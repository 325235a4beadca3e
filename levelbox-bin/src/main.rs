use std::num::NonZeroU32;
use std::path::PathBuf;

use levelbox::FileType;
use structopt::StructOpt;

mod commands;

use structopt::clap::AppSettings::*;

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(
        name = "c",
        visible_alias = "create",
        about = "Pack a database directory into a new archive"
    )]
    Create {
        #[structopt(
            short = "A",
            long,
            help = "Align stored files by specified bytes [unsigned 32-bit int, default: 0]"
        )]
        alignment: Option<NonZeroU32>,

        #[structopt(
            name = "archive",
            parse(from_os_str),
            help = "Path to the archive to create"
        )]
        path: PathBuf,

        #[structopt(
            name = "dbdir",
            parse(from_os_str),
            help = "Path to the database directory"
        )]
        db_dir: PathBuf,
    },

    #[structopt(
        name = "l",
        visible_alias = "list",
        about = "List database files of an archive"
    )]
    List {
        #[structopt(
            short = "t",
            long = "type",
            number_of_values = 1,
            help = "Only list files of this type (manifest, journal, table, temp); repeatable"
        )]
        types: Vec<FileType>,

        #[structopt(name = "archive", parse(from_os_str), help = "Path to the archive")]
        path: PathBuf,
    },

    #[structopt(name = "current", about = "Show the current manifest of an archived database")]
    Current {
        #[structopt(name = "archive", parse(from_os_str), help = "Path to the archive")]
        path: PathBuf,
    },

    #[structopt(name = "cat", about = "Write one database file to stdout")]
    Cat {
        #[structopt(name = "archive", parse(from_os_str), help = "Path to the archive")]
        path: PathBuf,

        #[structopt(name = "file", help = "Database file name, e.g. 000005.ldb")]
        file: String,
    },

    #[structopt(
        name = "v",
        visible_alias = "validate",
        about = "Verify the checksum of every stored file"
    )]
    Validate {
        #[structopt(name = "archive", parse(from_os_str), help = "Path to the archive")]
        path: PathBuf,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "levelbox",
    about = "Pack LevelDB databases into read-only archives and inspect them.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands],
)]
struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    verbose: bool,

    #[structopt(subcommand)]
    cmd: Commands,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let opts = CliOpts::from_iter(wild::args_os());
    init_tracing(opts.verbose);

    let result = match opts.cmd {
        Commands::Create {
            alignment,
            path,
            db_dir,
        } => commands::create(path, db_dir, alignment, opts.verbose),
        Commands::List { types, path } => commands::list(path, types),
        Commands::Current { path } => commands::current(path),
        Commands::Cat { path, file } => commands::cat(path, &file),
        Commands::Validate { path } => commands::validate(path, opts.verbose),
    };

    if let Err(e) = result {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
