use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Icon shown for games that do not bring their own
pub const DEFAULT_ICON: &str = "🎮";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("game metadata is missing a {field}")]
    MissingField { field: &'static str },

    #[error("a game is already registered under directory {directory:?}")]
    DuplicateDirectory { directory: String },
}

/// What the loader knows about one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    /// Identifier of the game's directory; also its catalog key
    pub directory: String,
    /// Entry resource, relative to the directory
    pub entry: String,
}

impl GameMetadata {
    pub fn new(name: &str, icon: Option<&str>, directory: &str, entry: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.map(str::to_string),
            directory: directory.to_string(),
            entry: entry.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let fields = [
            ("name", &self.name),
            ("directory", &self.directory),
            ("entry", &self.entry),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(CatalogError::MissingField { field });
            }
        }
        Ok(())
    }

    pub fn icon(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_ICON)
    }

    /// Menu and header label: icon followed by name
    pub fn label(&self) -> String {
        format!("{} {}", self.icon(), self.name)
    }

    /// Path of the entry resource, `<directory>/<entry>`
    pub fn entry_path(&self) -> String {
        format!("{}/{}", self.directory, self.entry)
    }
}

/// Where a menu entry leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuTarget {
    Home,
    Game(String),
    /// Placeholder for a game that does not exist yet
    ComingSoon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub target: MenuTarget,
}

impl MenuEntry {
    pub fn is_selectable(&self) -> bool {
        self.target != MenuTarget::ComingSoon
    }
}

/// Registered games, in registration order
#[derive(Debug, Clone, Default)]
pub struct GameCatalog {
    games: Vec<GameMetadata>,
}

impl GameCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, skipping (and logging) any game with bad metadata
    pub fn from_metadata(games: impl IntoIterator<Item = GameMetadata>) -> Self {
        let mut catalog = Self::new();
        for game in games {
            let directory = game.directory.clone();
            if let Err(err) = catalog.register(game) {
                warn!(%directory, error = %err, "skipping game");
            }
        }
        catalog
    }

    pub fn register(&mut self, game: GameMetadata) -> Result<(), CatalogError> {
        game.validate()?;
        if self.get(&game.directory).is_some() {
            return Err(CatalogError::DuplicateDirectory {
                directory: game.directory,
            });
        }

        info!(name = %game.name, directory = %game.directory, "loaded game");
        self.games.push(game);
        Ok(())
    }

    pub fn get(&self, directory: &str) -> Option<&GameMetadata> {
        self.games.iter().find(|game| game.directory == directory)
    }

    pub fn games(&self) -> &[GameMetadata] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Home, then every game, then one "coming soon" placeholder
    pub fn menu_entries(&self) -> Vec<MenuEntry> {
        let mut entries = vec![MenuEntry {
            label: "🏠 Home".to_string(),
            target: MenuTarget::Home,
        }];

        entries.extend(self.games.iter().map(|game| MenuEntry {
            label: game.label(),
            target: MenuTarget::Game(game.directory.clone()),
        }));

        entries.push(MenuEntry {
            label: format!("🚀 Game {} (Coming Soon)", self.games.len() + 1),
            target: MenuTarget::ComingSoon,
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake() -> GameMetadata {
        GameMetadata::new("Snake", Some("🐍"), "snake", "index.html")
    }

    #[test]
    fn test_label_and_default_icon() {
        assert_eq!(snake().label(), "🐍 Snake");
        assert_eq!(snake().entry_path(), "snake/index.html");

        let kart = GameMetadata::new("Kart", None, "kart", "index.html");
        assert_eq!(kart.label(), "🎮 Kart");
    }

    #[test]
    fn test_invalid_games_skipped() {
        let catalog = GameCatalog::from_metadata([
            GameMetadata::new("", None, "broken", "index.html"),
            snake(),
            GameMetadata::new("Kart", None, "kart", " "),
            GameMetadata::new("Snake Again", None, "snake", "index.html"),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("snake"), Some(&snake()));
        assert!(catalog.get("kart").is_none());
    }

    #[test]
    fn test_register_errors() {
        let mut catalog = GameCatalog::new();
        catalog.register(snake()).unwrap();

        assert_eq!(
            catalog.register(snake()),
            Err(CatalogError::DuplicateDirectory {
                directory: "snake".to_string()
            })
        );
        assert_eq!(
            catalog.register(GameMetadata::new("X", None, "", "a")),
            Err(CatalogError::MissingField { field: "directory" })
        );
    }

    #[test]
    fn test_menu_entries() {
        let catalog = GameCatalog::from_metadata([snake()]);
        let entries = catalog.menu_entries();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].target, MenuTarget::Home);
        assert_eq!(entries[1].label, "🐍 Snake");
        assert_eq!(entries[1].target, MenuTarget::Game("snake".to_string()));
        assert_eq!(entries[2].label, "🚀 Game 2 (Coming Soon)");
        assert!(!entries[2].is_selectable());
    }

    #[test]
    fn test_metadata_deserializes_without_icon() {
        let game: GameMetadata =
            serde_json::from_str(r#"{"name":"Snake","directory":"snake","entry":"index.html"}"#)
                .unwrap();
        assert_eq!(game.icon, None);
    }
}
