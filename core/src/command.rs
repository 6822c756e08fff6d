use rondo_proto::{NodePath, ScalarValue};

/// Commands carried by event envelopes. The first group is the named
/// commands that appear in token payloads (`"Edit$"`, `"Page$Next"`);
/// the second group is the notifications components raise toward the
/// host after handling or translating a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select,
    Edit,
    Cancel,
    Update,
    Delete,
    Sort,
    Page,
    Login,

    SelectionChanged,
    VisibleDateChanged,
    ItemClicked,
    RowSelected,
    RowEdit,
    RowEditCancelled,
    RowUpdated,
    RowDeleted,
    SortChanged,
    PageChanged,
    Authenticated,
}

impl Command {
    /// Parse the named-command portion of a token payload. Matching is
    /// case-insensitive; only wire-level commands parse, notifications do
    /// not.
    pub fn parse_named(name: &str) -> Option<Command> {
        const NAMED: [(&str, Command); 8] = [
            ("Select", Command::Select),
            ("Edit", Command::Edit),
            ("Cancel", Command::Cancel),
            ("Update", Command::Update),
            ("Delete", Command::Delete),
            ("Sort", Command::Sort),
            ("Page", Command::Page),
            ("Login", Command::Login),
        ];
        NAMED.iter().find(|(text, _)| text.eq_ignore_ascii_case(name)).map(|(_, command)| *command)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Select => "Select",
            Command::Edit => "Edit",
            Command::Cancel => "Cancel",
            Command::Update => "Update",
            Command::Delete => "Delete",
            Command::Sort => "Sort",
            Command::Page => "Page",
            Command::Login => "Login",
            Command::SelectionChanged => "SelectionChanged",
            Command::VisibleDateChanged => "VisibleDateChanged",
            Command::ItemClicked => "ItemClicked",
            Command::RowSelected => "RowSelected",
            Command::RowEdit => "RowEdit",
            Command::RowEditCancelled => "RowEditCancelled",
            Command::RowUpdated => "RowUpdated",
            Command::RowDeleted => "RowDeleted",
            Command::SortChanged => "SortChanged",
            Command::PageChanged => "PageChanged",
            Command::Authenticated => "Authenticated",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.as_str()) }
}

/// A transient notification produced by a node in response to a decoded
/// token and consumed during bubbling. Never serialized; `origin` is
/// stamped by the router with the path of the node that raised it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub command: Command,
    pub argument: ScalarValue,
    pub origin: NodePath,
}

impl Envelope {
    pub fn new(command: Command, argument: impl Into<ScalarValue>) -> Self {
        Self { command, argument: argument.into(), origin: NodePath::root() }
    }

    /// Translate this envelope into a more specific one, keeping the
    /// origin of the node that raised the original.
    pub fn translate(self, command: Command, argument: impl Into<ScalarValue>) -> Self {
        Self { command, argument: argument.into(), origin: self.origin }
    }
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Envelope({} {:?} from {})", self.command, self.argument, self.origin)
    }
}
