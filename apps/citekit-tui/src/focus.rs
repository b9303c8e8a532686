//! Which panel receives keyboard input

/// The focused panel
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The DOI input line
    #[default]
    Input,
    /// The four formatted citations
    Result,
    /// Past lookups
    History,
}

impl std::fmt::Display for Focus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Focus::Input => write!(f, "INPUT"),
            Focus::Result => write!(f, "RESULT"),
            Focus::History => write!(f, "HISTORY"),
        }
    }
}

impl Focus {
    /// Next panel in Tab order
    pub fn next(&self) -> Self {
        match self {
            Focus::Input => Focus::Result,
            Focus::Result => Focus::History,
            Focus::History => Focus::Input,
        }
    }

    /// Whether keys are typed into a text field
    pub fn is_text_input(&self) -> bool {
        matches!(self, Focus::Input)
    }
}
