//! Command line arguments.

use clap::Parser;
use dungeon_core::SessionConfig;
use std::path::PathBuf;

/// A tool server for dungeon crawling adventures.
#[derive(Parser, Debug)]
#[command(name = "mcp-dungeon", version)]
pub struct Args {
    /// Path to the dungeon file (YAML, or JSON with a `.json` extension)
    #[arg(long, env = "DUNGEON_FILE", default_value = "data/crystal_caverns.yaml")]
    pub dungeon_file: PathBuf,

    /// Path to the player file; a default player is used when omitted
    #[arg(long, env = "PLAYER_FILE")]
    pub player_file: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 9090)]
    pub port: u16,

    /// Write a sample player file and exit
    #[arg(long)]
    pub generate_player: bool,
}

impl Args {
    pub fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::new(&self.dungeon_file);
        match &self.player_file {
            Some(path) => config.with_player_file(path),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_player_flag() {
        let args = Args::try_parse_from(["mcp-dungeon", "--generate-player"]).unwrap();
        assert!(args.generate_player);

        let args = Args::try_parse_from(["mcp-dungeon"]).unwrap();
        assert!(!args.generate_player);
    }

    #[test]
    fn test_player_file_flows_into_config() {
        let args = Args::try_parse_from([
            "mcp-dungeon",
            "--dungeon-file",
            "caves.json",
            "--player-file",
            "hero.json",
            "--port",
            "8080",
        ])
        .unwrap();

        let config = args.session_config();
        assert_eq!(config.dungeon_file, PathBuf::from("caves.json"));
        assert_eq!(config.player_file, Some(PathBuf::from("hero.json")));
        assert_eq!(args.port, 8080);
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Args::try_parse_from(["mcp-dungeon", "--port", "lots"]).is_err());
    }
}
