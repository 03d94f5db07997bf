mod content;
mod error;
mod html;
mod logging;
mod nav;
mod parse;
mod render;
mod serve;
mod site;
mod viewer;
mod web_assets;

use std::{
    io,
    path::{Path, PathBuf},
    process,
};

use clap::{Parser, Subcommand};

use error::{ContentError, SiteError};

/// Explicit subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse the portfolio in the terminal (the default)
    View {
        /// Portfolio content file (YAML); the built-in sample when omitted
        #[arg(long)]
        content: Option<PathBuf>,
        /// Append logs to this file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Serve the portfolio page over HTTP
    Serve {
        /// Portfolio content file (YAML); the built-in sample when omitted
        #[arg(long)]
        content: Option<PathBuf>,
        /// Directory of static files (resume, images); defaults to
        /// `public/` beside the content file
        #[arg(long)]
        public: Option<PathBuf>,
        /// Interface address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Starting port number for the HTTP server
        #[arg(long, default_value = "3333")]
        port: u16,
    },
    /// Write the page as a static site
    Build {
        /// Portfolio content file (YAML); the built-in sample when omitted
        #[arg(long)]
        content: Option<PathBuf>,
        /// Directory of static files to copy alongside the page
        #[arg(long)]
        public: Option<PathBuf>,
        /// Output directory
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the validated content as JSON
    Export {
        /// Portfolio content file (YAML); the built-in sample when omitted
        #[arg(long)]
        content: Option<PathBuf>,
    },
}

#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "A single-page portfolio for the terminal and the browser",
    after_help = "INVOCATION FORMS:\n  folio                                  Browse the built-in sample\n  folio view --content FILE              Browse FILE in the terminal\n  folio serve --content FILE [OPTIONS]   Serve FILE over HTTP\n  folio build --content FILE --out DIR   Write a static site to DIR"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::View {
        content: None,
        log_file: None,
    }) {
        Commands::View { content, log_file } => {
            if let Some(path) = &log_file {
                logging::init_file(path)?;
            }
            let portfolio = load_or_exit(content.as_deref());
            viewer::run_viewer(portfolio)
        }
        Commands::Serve {
            content,
            public,
            bind,
            port,
        } => {
            logging::init_stderr();
            // Fail before binding so a broken file is reported once, plainly.
            load_or_exit(content.as_deref());
            let rt = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            rt.block_on(serve::run_serve(serve::ServeOptions {
                content,
                public,
                bind,
                port,
            }))
        }
        Commands::Build {
            content,
            public,
            out,
        } => {
            logging::init_stderr();
            match site::build(content.as_deref(), public.as_deref(), &out) {
                Ok(report) => {
                    println!(
                        "wrote {} files ({} copied) to {}",
                        report.generated.len() + report.copied.len(),
                        report.copied.len(),
                        out.display()
                    );
                    Ok(())
                }
                Err(SiteError::Content(e)) => exit_with_content_error(&e),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            }
        }
        Commands::Export { content } => {
            let portfolio = load_or_exit(content.as_deref());
            let json = site::export_json(&portfolio)?;
            println!("{json}");
            Ok(())
        }
    }
}

/// Load content, or print why not and exit with status 1.
fn load_or_exit(path: Option<&Path>) -> content::Portfolio {
    content::load(path).unwrap_or_else(|e| exit_with_content_error(&e))
}

fn exit_with_content_error(e: &ContentError) -> ! {
    match e {
        ContentError::Read { path, source } if source.kind() == io::ErrorKind::NotFound => {
            eprintln!("Error: file not found: {}", path.display());
        }
        ContentError::Read { path, source }
            if source.kind() == io::ErrorKind::PermissionDenied =>
        {
            eprintln!("Error: permission denied: {}", path.display());
        }
        other => eprintln!("Error: {other}"),
    }
    process::exit(1);
}
