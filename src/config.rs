// Command-line and environment configuration
//
// Every setting has a flag and an environment variable. Provider selection
// happens once at startup; requests can only narrow it to local-only mode.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Turns free-text seed wishes into structured seed-search configs
#[derive(Parser, Debug)]
#[command(name = "seedgenie", version)]
#[command(about = "Prompt-to-config synthesizer for seed searches")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Synthesize one config and print the result as JSON
    Generate(GenerateArgs),
    /// Manage the Anthropic API key stored in the OS keychain
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen address; nearby ports are tried when it is taken
    #[arg(long, default_value = "0.0.0.0:3000", env = "GENIE_LISTEN")]
    pub listen: SocketAddr,

    /// Directory with index.html and src/ assets
    #[arg(long, default_value = "public", env = "GENIE_STATIC_DIR")]
    pub static_dir: PathBuf,

    /// Longest accepted prompt, in characters
    #[arg(long, default_value = "1000", env = "GENIE_MAX_PROMPT_CHARS")]
    pub max_prompt_chars: usize,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// The wish to turn into a config
    pub prompt: String,

    /// Skip the AI provider even when one is configured
    #[arg(long)]
    pub local: bool,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ProviderArgs {
    /// Completion provider to call before the local generator
    #[arg(long, value_enum, default_value_t = ProviderKind::None, env = "GENIE_PROVIDER")]
    pub provider: ProviderKind,

    /// Model name; each provider has its own default
    #[arg(long, env = "GENIE_MODEL")]
    pub model: Option<String>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: Option<String>,

    /// Read the Anthropic API key from the OS keychain when none is given
    #[arg(long)]
    pub use_keychain: bool,

    /// Ollama base URL
    #[arg(long, env = "OLLAMA_HOST")]
    pub ollama_host: Option<String>,

    /// Upper bound on one provider call, in milliseconds
    #[arg(long, default_value = "8000", env = "GENIE_PROVIDER_TIMEOUT_MS")]
    pub provider_timeout_ms: u64,
}

impl ProviderArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }
}

impl Default for ProviderArgs {
    fn default() -> Self {
        Self {
            provider: ProviderKind::None,
            model: None,
            anthropic_api_key: None,
            use_keychain: false,
            ollama_host: None,
            provider_timeout_ms: 8000,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    None,
    Claude,
    Ollama,
}

#[derive(Subcommand, Debug, Clone)]
pub enum KeyAction {
    /// Store a key
    Set { key: String },
    /// Remove the stored key
    Delete,
    /// Report whether a key is stored
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["seedgenie", "serve"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.max_prompt_chars, 1000);
        assert_eq!(args.listen.port(), 3000);
        assert_eq!(args.static_dir, PathBuf::from("public"));
        assert_eq!(args.provider.timeout(), Duration::from_millis(8000));
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "seedgenie",
            "generate",
            "Perkeo with Observatory",
            "--local",
            "--provider",
            "ollama",
            "--model",
            "mistral",
        ])
        .unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert!(args.local);
        assert_eq!(args.prompt, "Perkeo with Observatory");
        assert_eq!(args.provider.provider, ProviderKind::Ollama);
        assert_eq!(args.provider.model.as_deref(), Some("mistral"));
    }

    #[test]
    fn test_key_commands() {
        let cli = Cli::try_parse_from(["seedgenie", "key", "set", "sk-ant-test"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Key { action: KeyAction::Set { ref key } } if key == "sk-ant-test"
        ));
    }
}
