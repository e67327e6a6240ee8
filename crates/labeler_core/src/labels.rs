/// Label states for the image on screen.
///
/// Keeps insertion order so a parsed field renders back unchanged. Inactive
/// entries are remembered (a multiclass toggle-off shows as `false`) but never
/// written to the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    entries: Vec<(String, bool)>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a space-delimited labels field; every listed label is active.
    pub fn parse(field: &str) -> Self {
        let mut set = Self::new();
        for label in field.split(' ').filter(|l| !l.is_empty()) {
            set.set(label, true);
        }
        set
    }

    pub fn get(&self, label: &str) -> bool {
        self.entries
            .iter()
            .find(|(name, _)| name == label)
            .is_some_and(|(_, active)| *active)
    }

    pub fn set(&mut self, label: &str, active: bool) {
        match self.entries.iter_mut().find(|(name, _)| name == label) {
            Some(entry) => entry.1 = active,
            None => self.entries.push((label.to_string(), active)),
        }
    }

    /// Flip one label and return its new state.
    pub fn toggle(&mut self, label: &str) -> bool {
        let next = !self.get(label);
        self.set(label, next);
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(name, active)| (name.as_str(), *active))
    }

    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, active)| *active).map(|(name, _)| name)
    }

    pub fn has_active(&self) -> bool {
        self.entries.iter().any(|(_, active)| *active)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Active labels joined by single spaces, as stored in the table.
    pub fn to_field(&self) -> String {
        self.active().collect::<Vec<_>>().join(" ")
    }
}
