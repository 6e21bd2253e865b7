use clap::Parser;
use miette::Result;
use lqc::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    lqc::logging::init_logging(cli.global.verbose, cli.global.quiet);

    let global = cli.global;
    match cli.command {
        Commands::Init(args) => lqc::cli::commands::init::run(args),
        Commands::Range(cmd) => lqc::cli::commands::range::run(cmd, &global),
        Commands::Case(cmd) => lqc::cli::commands::case::run(cmd, &global),
        Commands::Workload(args) => lqc::cli::commands::workload::run(args, &global),
        Commands::Export(args) => lqc::cli::commands::export::run(args),
        Commands::Stain(cmd) => lqc::cli::commands::stain::run(cmd, &global),
        Commands::Completions(args) => lqc::cli::commands::completions::run(args),
    }
}
