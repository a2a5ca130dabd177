//! In-game menu.

/// Commands that open the game menu instead of reaching the terminal.
const MENU_COMMANDS: [&str; 2] = ["!menu", "!m"];

/// Whether the player's input opens the game menu.
pub fn is_menu_command(input: &str) -> bool {
    let input = input.trim();
    MENU_COMMANDS.iter().any(|c| input.eq_ignore_ascii_case(c))
}

/// A choice in the game menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// `S`: save and keep playing.
    Save,
    /// `R`: back to the terminal.
    Return,
    /// `Q`: save and leave to the main menu.
    SaveAndQuit,
    /// `X`: leave to the main menu without saving.
    QuitWithoutSaving,
}

impl MenuAction {
    /// Parse the player's choice. Anything unrecognized returns to the game.
    pub fn parse(input: &str) -> Self {
        match input.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('s') => Self::Save,
            Some('q') => Self::SaveAndQuit,
            Some('x') => Self::QuitWithoutSaving,
            _ => Self::Return,
        }
    }

    /// Whether the session is persisted before the action completes.
    pub fn saves(self) -> bool {
        matches!(self, Self::Save | Self::SaveAndQuit)
    }
}

/// Where play continues after a menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Keep playing this session.
    Continue,
    /// Leave to the main menu.
    Leave,
}

impl From<MenuAction> for MenuOutcome {
    fn from(action: MenuAction) -> Self {
        match action {
            MenuAction::Save | MenuAction::Return => Self::Continue,
            MenuAction::SaveAndQuit | MenuAction::QuitWithoutSaving => Self::Leave,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_commands() {
        assert!(is_menu_command("!menu"));
        assert!(is_menu_command("  !M "));
        assert!(is_menu_command("!MENU"));
        assert!(!is_menu_command("menu"));
        assert!(!is_menu_command("!mx"));
    }

    #[test]
    fn parse_choices() {
        assert_eq!(MenuAction::parse("s"), MenuAction::Save);
        assert_eq!(MenuAction::parse("Q"), MenuAction::SaveAndQuit);
        assert_eq!(MenuAction::parse(" x\n"), MenuAction::QuitWithoutSaving);
        assert_eq!(MenuAction::parse("r"), MenuAction::Return);
        assert_eq!(MenuAction::parse("?"), MenuAction::Return);
        assert_eq!(MenuAction::parse(""), MenuAction::Return);
    }

    #[test]
    fn outcomes() {
        assert_eq!(MenuOutcome::from(MenuAction::Save), MenuOutcome::Continue);
        assert_eq!(MenuOutcome::from(MenuAction::QuitWithoutSaving), MenuOutcome::Leave);
        assert!(MenuAction::SaveAndQuit.saves());
        assert!(!MenuAction::QuitWithoutSaving.saves());
    }
}
