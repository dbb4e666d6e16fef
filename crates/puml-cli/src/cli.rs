//! Command-line interface for the puml utility
//!
//! Reads diagram sources, renders them through a PlantUML server and writes
//! the returned bytes next to the requested destination.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use puml::client::PlantUmlClient;
use puml::{ClientConfig, RenderKind, StatusPolicy, DEFAULT_SERVER_URL};

/// Environment variable overriding the default service URL
pub const SERVER_URL_ENV: &str = "PUML_SERVER_URL";

/// puml - Render PlantUML diagrams through a PlantUML server
#[derive(Parser)]
#[command(name = "puml")]
#[command(about = "CLI for PlantUML: encode diagrams and render them through a PlantUML server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a diagram and save it as <DEST>.<render-type>
    Render {
        /// Diagram source file
        src: PathBuf,

        /// Destination path, without extension
        dest: PathBuf,

        /// Output format requested from the server
        #[arg(short = 't', long, value_enum, default_value_t = KindChoice::Png)]
        render_type: KindChoice,

        /// PlantUML server URL (defaults to $PUML_SERVER_URL or the public server)
        #[arg(short, long)]
        url: Option<String>,

        /// Fail when the server answers with a non-2xx status
        #[arg(long)]
        strict: bool,

        /// Abort the request after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Print the transport token for a diagram without contacting the server
    Encode {
        /// Diagram source file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Render type used in the request URL
        #[arg(short = 't', long, value_enum, default_value_t = KindChoice::Png)]
        render_type: KindChoice,

        /// PlantUML server URL used with --url-only
        #[arg(short, long)]
        url: Option<String>,

        /// Print the full request URL instead of the token
        #[arg(long)]
        url_only: bool,
    },

    /// Decode a transport token back into diagram text
    Decode {
        /// File containing the token (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Show supported render types
    Kinds {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Render types accepted on the command line
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum KindChoice {
    Svg,
    Png,
    Ascii,
}

impl From<KindChoice> for RenderKind {
    fn from(value: KindChoice) -> Self {
        match value {
            KindChoice::Svg => RenderKind::Svg,
            KindChoice::Png => RenderKind::Png,
            KindChoice::Ascii => RenderKind::Ascii,
        }
    }
}

#[derive(Serialize)]
struct KindInfo {
    name: &'static str,
    extension: &'static str,
    description: &'static str,
}

/// Main CLI application
pub struct PumlApp {
    server_url: String,
}

impl PumlApp {
    /// Create an application using `$PUML_SERVER_URL` or the public server
    pub fn new() -> Self {
        let server_url =
            std::env::var(SERVER_URL_ENV).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self::with_server_url(server_url)
    }

    /// Create an application with an explicit default server URL
    pub fn with_server_url(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        if cli.verbose {
            eprintln!("puml v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render {
                src,
                dest,
                render_type,
                url,
                strict,
                timeout,
            } => self.render_command(
                &src,
                &dest,
                render_type.into(),
                url,
                strict,
                timeout,
                cli.verbose,
            ),
            Commands::Encode {
                input,
                render_type,
                url,
                url_only,
            } => {
                let content = self.read_input(input)?;
                let kind = url_only.then(|| render_type.into());
                let line = self.encode_text(&content, kind, url)?;
                self.write_stdout(&line)
            }
            Commands::Decode { input } => {
                let token = self.read_input(input)?;
                let text = puml::decode_diagram(&token)?;
                self.write_stdout(&text)
            }
            Commands::Kinds { json } => {
                let listing = Self::kinds_listing(json)?;
                self.write_stdout(&listing)
            }
        }
    }

    /// Handle the render command
    #[allow(clippy::too_many_arguments)]
    fn render_command(
        &self,
        src: &Path,
        dest: &Path,
        kind: RenderKind,
        url: Option<String>,
        strict: bool,
        timeout: Option<u64>,
        verbose: bool,
    ) -> Result<()> {
        let client = self.build_client(url, strict, timeout)?;

        if verbose {
            eprintln!("Rendering {} as {} via {}", src.display(), kind, client.base_url());
        }

        let rendered = client.render_file(kind, src)?;
        println!("{}", rendered.url);

        if verbose {
            eprintln!("Server answered {} with {} bytes", rendered.status, rendered.body.len());
        }

        let path = output_path(dest, kind);
        write_output_file(&path, &rendered.body)?;
        println!("the diagram was saved at: {}", path.display());
        Ok(())
    }

    fn build_client(
        &self,
        url: Option<String>,
        strict: bool,
        timeout: Option<u64>,
    ) -> Result<PlantUmlClient> {
        let mut config = ClientConfig::new();
        if strict {
            config = config.with_status_policy(StatusPolicy::Strict);
        }
        if let Some(secs) = timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        let url = url.unwrap_or_else(|| self.server_url.clone());
        debug!(url = %url, strict, ?timeout, "Building client");
        Ok(PlantUmlClient::with_config(&url, config)?)
    }

    /// Produce the token for `content`, or the request URL when `kind` is given
    pub fn encode_text(
        &self,
        content: &str,
        kind: Option<RenderKind>,
        url: Option<String>,
    ) -> Result<String> {
        match kind {
            Some(kind) => {
                let client = self.build_client(url, false, None)?;
                Ok(client.request_url(kind, content.as_bytes())?)
            }
            None => Ok(puml::encode_diagram(content)?),
        }
    }

    fn kinds_listing(json: bool) -> Result<String> {
        if json {
            let kinds: Vec<KindInfo> = RenderKind::ALL
                .iter()
                .map(|kind| KindInfo {
                    name: kind.as_str(),
                    extension: kind.extension(),
                    description: kind.description(),
                })
                .collect();
            let listing = serde_json::json!({
                "render_kinds": kinds,
                "total": kinds.len(),
            });
            return Ok(serde_json::to_string_pretty(&listing)?);
        }

        let mut out = String::from("Supported render types:\n");
        for kind in RenderKind::ALL {
            out.push_str(&format!("  {:<6} - {}\n", kind.as_str(), kind.description()));
        }
        Ok(out)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    fn write_stdout(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        if !content.is_empty() && !content.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()?;
        Ok(())
    }
}

impl Default for PumlApp {
    fn default() -> Self {
        Self::new()
    }
}

/// `<dest>.<kind>`, keeping any dots already in `dest`
pub fn output_path(dest: &Path, kind: RenderKind) -> PathBuf {
    let mut path = OsString::from(dest.as_os_str());
    path.push(".");
    path.push(kind.extension());
    PathBuf::from(path)
}

/// Write rendered bytes, leaving the file world-writable on unix
pub fn write_output_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes)
        .with_context(|| format!("Failed to write output file '{}'", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o666))
            .with_context(|| format!("Failed to set permissions on '{}'", path.display()))?;
    }

    Ok(())
}
