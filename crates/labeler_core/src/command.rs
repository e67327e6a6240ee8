/// A label addressed either by name or by its position in the class list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelRef {
    Name(String),
    Index(usize),
}

impl From<&str> for LabelRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for LabelRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for LabelRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// User intents the presentation layer hands to [`Session::dispatch`](crate::Session::dispatch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Toggle(LabelRef),
    Save,
}

/// Interpret the shortcut text field: only its last character counts, and a
/// digit `d` toggles class `d`.
pub fn command_from_keystroke(input: &str) -> Option<Command> {
    let digit = input.chars().last()?.to_digit(10)?;
    Some(Command::Toggle(LabelRef::Index(digit as usize)))
}
