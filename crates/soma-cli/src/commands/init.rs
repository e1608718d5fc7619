//! Initialize a new Soma project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing Soma project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        Config::default().save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    println!();
    println!("{} Soma project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} soma run --output snapshot.json", "1.".blue());
    println!("  {} soma validate snapshot.json", "2.".blue());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_default_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("sorting");
        run(Some(project.display().to_string())).unwrap();

        let path = project.join(CONFIG_FILE);
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        std::fs::write(&path, "[cells]\ncount = 8\n").unwrap();
        run(Some(project.display().to_string())).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().cells.count, 8);
    }
}
