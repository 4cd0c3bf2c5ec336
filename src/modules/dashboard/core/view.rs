// What a viewer's page currently shows.

use crate::modules::dashboard::core::renderer::TableBody;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Dashboard { user_label: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub screen: Screen,
    pub table: TableBody,
    pub flash: Option<Flash>,
    /// Value echoed back into the name field; cleared after a successful submit.
    pub name_input: String,
    /// Bumped on every change so long polls can tell old pages from new ones.
    pub revision: u64,
    /// Gate generation this view was built for.
    pub generation: u64,
}

impl PageView {
    pub fn landing(generation: u64) -> Self {
        Self {
            screen: Screen::Landing,
            table: TableBody::Cleared,
            flash: None,
            name_input: String::new(),
            revision: 0,
            generation,
        }
    }

    pub fn is_dashboard(&self) -> bool {
        matches!(self.screen, Screen::Dashboard { .. })
    }
}

/// User answer to a destructive action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Granted,
    Withheld,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Granted
        } else {
            Confirmation::Withheld
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    Cancelled,
}
